use std::fs;

use clap::Parser;
use visibility_windows::scenario::{CoordinateArgs, ScenarioArgs, ScenarioError, VisibilityArgs};
use vw_config::{ConfigError, DEFAULT_MAX_INTERVALS, DEFAULT_TIME_FORMAT, load_scenario};
use vw_core::search::{
    Aberration, CoordinateSystem, KeywordError, OccultationType, Relation, ShapeModel,
};

#[derive(Parser, Debug)]
struct CoordinateFlags {
    #[command(flatten)]
    coordinate: CoordinateArgs,
}

#[test]
fn shipped_yaml_scenario_loads() {
    let scenario = load_scenario("configs/mex_dss14.yaml").expect("scenario yaml");
    assert_eq!(scenario.window.start, "2004 MAY 2 TDB");
    assert_eq!(scenario.window.step_seconds, 300.0);

    let visibility = scenario.visibility.expect("visibility section");
    assert_eq!(visibility.station_frame, "DSS-14_TOPO");
    assert_eq!(visibility.aberration, Aberration::ConvergedStellar);
    let occultation = visibility.occultation.expect("occultation section");
    assert_eq!(
        occultation.shapes,
        vec![ShapeModel::Ellipsoid, ShapeModel::DskUnprioritized]
    );

    let coordinate = scenario.coordinate.expect("coordinate section");
    assert_eq!(coordinate.coordinate_system, CoordinateSystem::Latitudinal);
    assert_eq!(coordinate.relation, Relation::Less);
}

#[test]
fn shipped_toml_scenario_fills_defaults() {
    let scenario = load_scenario("configs/mex_shadow.toml").expect("scenario toml");
    assert_eq!(scenario.window.max_intervals, DEFAULT_MAX_INTERVALS);
    assert!(scenario.visibility.is_none());
    let shadow = scenario.shadow.expect("shadow section");
    assert_eq!(shadow.light_source, "SUN");
    assert_eq!(shadow.light_source_frame, "IAU_SUN");
}

#[test]
fn invalid_values_are_reported_by_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        "meta_kernel: mex.tm\nstart: 2004 MAY 2 TDB\nstop: 2004 MAY 6 TDB\nstep_seconds: -5\n",
    )
    .unwrap();
    assert!(matches!(
        load_scenario(&path),
        Err(ConfigError::Invalid {
            field: "step_seconds",
            ..
        })
    ));

    fs::write(
        &path,
        "meta_kernel: mex.tm
start: 2004 MAY 2 TDB
stop: 2004 MAY 6 TDB
visibility:
  target: MEX
  station: DSS-14
  station_frame: DSS-14_TOPO
  elevation_limit_deg: 6
  occultation:
    blocker: MARS
    blocker_frame: IAU_MARS
    shapes: [POINT]
",
    )
    .unwrap();
    assert!(matches!(
        load_scenario(&path),
        Err(ConfigError::Invalid {
            field: "visibility.occultation.shapes",
            ..
        })
    ));
}

#[test]
fn unparsable_files_surface_parser_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml = dir.path().join("broken.yaml");
    fs::write(&yaml, "meta_kernel: [unclosed\n").unwrap();
    assert!(matches!(load_scenario(&yaml), Err(ConfigError::Parse(_))));

    let toml = dir.path().join("broken.toml");
    fs::write(&toml, "meta_kernel = \n").unwrap();
    assert!(matches!(load_scenario(&toml), Err(ConfigError::Toml(_))));

    assert!(matches!(
        load_scenario(dir.path().join("missing.yaml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn command_line_flags_override_the_scenario() {
    let args = ScenarioArgs {
        config: Some("configs/mex_dss14.yaml".into()),
        stop: Some("2004 MAY 3 TDB".to_string()),
        step: Some(60.0),
        ..ScenarioArgs::default()
    };
    let scenario = args.load().expect("load").expect("scenario present");
    let run = args.resolve(Some(&scenario)).expect("resolve");
    assert_eq!(run.window.start, "2004 MAY 2 TDB");
    assert_eq!(run.window.stop, "2004 MAY 3 TDB");
    assert_eq!(run.window.step_seconds, 60.0);
    assert_eq!(run.meta_kernel, std::path::PathBuf::from("data/spice/mex.tm"));

    let visibility = VisibilityArgs {
        elevation: Some(10.0),
        shapes: vec![ShapeModel::DskUnprioritized],
        ..VisibilityArgs::default()
    }
    .resolve(scenario.visibility.as_ref())
    .expect("visibility");
    assert_eq!(visibility.elevation_limit_deg, 10.0);
    assert_eq!(visibility.target, "MEX");
    assert_eq!(
        visibility.occultation.expect("blocker").shapes,
        vec![ShapeModel::DskUnprioritized]
    );
}

#[test]
fn flags_alone_need_every_required_value() {
    let args = ScenarioArgs {
        meta_kernel: Some("mex.tm".into()),
        start: Some("2004 MAY 2 TDB".to_string()),
        ..ScenarioArgs::default()
    };
    assert!(matches!(args.resolve(None), Err(ScenarioError::Missing("stop"))));

    let args = ScenarioArgs {
        stop: Some("2004 MAY 6 TDB".to_string()),
        ..args
    };
    let run = args.resolve(None).expect("resolve");
    assert_eq!(run.time_format, DEFAULT_TIME_FORMAT);
    assert_eq!(run.window.max_intervals, DEFAULT_MAX_INTERVALS);

    let missing = VisibilityArgs {
        target: Some("MEX".to_string()),
        ..VisibilityArgs::default()
    }
    .resolve(None);
    assert!(matches!(missing, Err(ScenarioError::Missing("station"))));
}

#[test]
fn keywords_parse_without_regard_to_case() {
    assert_eq!("cn + s".parse::<Aberration>(), Ok(Aberration::ConvergedStellar));
    assert_eq!("XLT".parse::<Aberration>(), Ok(Aberration::TransmitLightTime));
    assert_eq!("absmax".parse::<Relation>(), Ok(Relation::AbsoluteMaximum));
    assert_eq!("ra/dec".parse::<CoordinateSystem>(), Ok(CoordinateSystem::RaDec));
    assert_eq!("any".parse::<OccultationType>(), Ok(OccultationType::Any));
    assert_eq!(
        " dsk/unprioritized ".parse::<ShapeModel>(),
        Ok(ShapeModel::DskUnprioritized)
    );

    let err: KeywordError = ">=".parse::<Relation>().unwrap_err();
    assert_eq!(err.kind, "relation");
    assert_eq!(err.value, ">=");
    assert!(err.expected.contains("LOCMIN"));
    assert!("CN+".parse::<Aberration>().is_err());
}

#[test]
fn coordinate_flags_use_the_keyword_parsers() {
    let flags = CoordinateFlags::try_parse_from([
        "geometry_find",
        "--relation",
        "absmin",
        "--coordinate-system",
        "latitudinal",
        "--aberration",
        "lt+s",
        "--reference-value",
        "-12.5",
    ])
    .expect("flags parse");
    assert_eq!(flags.coordinate.relation, Some(Relation::AbsoluteMinimum));
    assert_eq!(
        flags.coordinate.coordinate_system,
        Some(CoordinateSystem::Latitudinal)
    );
    assert_eq!(flags.coordinate.aberration, Some(Aberration::LightTimeStellar));
    assert_eq!(flags.coordinate.reference_value, Some(-12.5));

    let rejected = CoordinateFlags::try_parse_from(["geometry_find", "--relation", "between"]);
    assert!(rejected.is_err());
}

#[test]
fn coordinate_flags_reject_non_finite_reference_values() {
    let args = CoordinateArgs {
        target: Some("MEX".to_string()),
        observer: Some("MARS".to_string()),
        frame: Some("IAU_MARS".to_string()),
        coordinate_system: Some(CoordinateSystem::Latitudinal),
        coordinate: Some("LATITUDE".to_string()),
        relation: Some(Relation::Greater),
        reference_value: Some(f64::NAN),
        ..CoordinateArgs::default()
    };
    assert!(matches!(
        args.resolve(None),
        Err(ScenarioError::Config(ConfigError::Invalid {
            field: "coordinate.reference_value",
            ..
        }))
    ));

    let args = CoordinateArgs {
        reference_value: Some(0.0),
        adjustment: Some(f64::INFINITY),
        ..args
    };
    assert!(matches!(
        args.resolve(None),
        Err(ScenarioError::Config(ConfigError::Invalid {
            field: "coordinate.adjustment",
            ..
        }))
    ));

    let args = CoordinateArgs {
        adjustment: None,
        ..args
    };
    assert_eq!(args.resolve(None).expect("resolve").reference_value, 0.0);
}
