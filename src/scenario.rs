//! Command-line scenario resolution shared by the search binaries.
//!
//! Every binary accepts `--config <file>`; explicit flags override the values
//! the scenario file provides.

use std::path::{Path, PathBuf};

use clap::Args;
use thiserror::Error;
use vw_config::{
    ConfigError, CoordinateConfig, DEFAULT_MAX_INTERVALS, DEFAULT_STEP_SECONDS,
    DEFAULT_TIME_FORMAT, OccultationConfig, Scenario, SearchWindowConfig, ShadowConfig,
    VisibilityConfig, load_scenario,
};
use vw_core::search::{Aberration, CoordinateSystem, Relation, ShapeModel};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("`{0}` is required: pass it on the command line or set it in the scenario file")]
    Missing(&'static str),
}

/// Search window flags common to every binary.
#[derive(Debug, Clone, Default, Args)]
pub struct ScenarioArgs {
    /// Scenario file (YAML, or TOML when the extension is `.toml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Meta-kernel listing the kernels to furnish
    #[arg(long)]
    pub meta_kernel: Option<PathBuf>,

    /// Search window start (e.g. "2004 MAY 2 TDB")
    #[arg(long)]
    pub start: Option<String>,

    /// Search window stop
    #[arg(long)]
    pub stop: Option<String>,

    /// Coarse search step in seconds
    #[arg(long)]
    pub step: Option<f64>,

    /// Maximum number of intervals a search may return
    #[arg(long)]
    pub max_intervals: Option<usize>,

    /// Output picture string (SPICE `timout` syntax)
    #[arg(long)]
    pub time_format: Option<String>,
}

/// Fully resolved run parameters.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub meta_kernel: PathBuf,
    pub window: SearchWindowConfig,
    pub time_format: String,
}

impl ScenarioArgs {
    pub fn load(&self) -> Result<Option<Scenario>, ScenarioError> {
        self.config
            .as_deref()
            .map(load_scenario::<&Path>)
            .transpose()
            .map_err(ScenarioError::from)
    }

    pub fn resolve(&self, scenario: Option<&Scenario>) -> Result<RunSettings, ScenarioError> {
        let meta_kernel = self
            .meta_kernel
            .clone()
            .or_else(|| scenario.map(|s| s.meta_kernel.clone()))
            .ok_or(ScenarioError::Missing("meta-kernel"))?;
        let base = scenario.map(|s| &s.window);
        let window = SearchWindowConfig {
            start: pick(&self.start, base.map(|w| &w.start)).ok_or(ScenarioError::Missing("start"))?,
            stop: pick(&self.stop, base.map(|w| &w.stop)).ok_or(ScenarioError::Missing("stop"))?,
            step_seconds: self
                .step
                .or(base.map(|w| w.step_seconds))
                .unwrap_or(DEFAULT_STEP_SECONDS),
            max_intervals: self
                .max_intervals
                .or(base.map(|w| w.max_intervals))
                .unwrap_or(DEFAULT_MAX_INTERVALS),
        };
        window.validate()?;
        let time_format = pick(&self.time_format, scenario.map(|s| &s.time_format))
            .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string());
        Ok(RunSettings {
            meta_kernel,
            window,
            time_format,
        })
    }
}

/// Flags for elevation-limited visibility searches.
#[derive(Debug, Clone, Default, Args)]
pub struct VisibilityArgs {
    /// Target body or spacecraft (e.g. MEX)
    #[arg(long)]
    pub target: Option<String>,

    /// Observing surface location (e.g. DSS-14)
    #[arg(long)]
    pub station: Option<String>,

    /// Topocentric frame of the station (e.g. DSS-14_TOPO)
    #[arg(long)]
    pub station_frame: Option<String>,

    /// Elevation limit in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub elevation: Option<f64>,

    /// Aberration correction (NONE, LT, LT+S, CN, CN+S, ...)
    #[arg(long)]
    pub aberration: Option<Aberration>,

    /// Blocking body whose occultations are removed (e.g. MARS)
    #[arg(long)]
    pub blocker: Option<String>,

    /// Body-fixed frame of the blocking body (e.g. IAU_MARS)
    #[arg(long)]
    pub blocker_frame: Option<String>,

    /// Blocker shape model; repeat to compare several (ELLIPSOID, DSK/UNPRIORITIZED)
    #[arg(long = "shape")]
    pub shapes: Vec<ShapeModel>,
}

impl VisibilityArgs {
    pub fn resolve(&self, base: Option<&VisibilityConfig>) -> Result<VisibilityConfig, ScenarioError> {
        let base_occultation = base.and_then(|b| b.occultation.as_ref());
        let occultation = match pick(&self.blocker, base_occultation.map(|o| &o.blocker)) {
            Some(blocker) => Some(OccultationConfig {
                blocker,
                blocker_frame: pick(&self.blocker_frame, base_occultation.map(|o| &o.blocker_frame))
                    .ok_or(ScenarioError::Missing("blocker-frame"))?,
                shapes: if self.shapes.is_empty() {
                    base_occultation
                        .map(|o| o.shapes.clone())
                        .unwrap_or_else(|| vec![ShapeModel::Ellipsoid])
                } else {
                    self.shapes.clone()
                },
            }),
            None => None,
        };
        let config = VisibilityConfig {
            target: pick(&self.target, base.map(|b| &b.target)).ok_or(ScenarioError::Missing("target"))?,
            station: pick(&self.station, base.map(|b| &b.station))
                .ok_or(ScenarioError::Missing("station"))?,
            station_frame: pick(&self.station_frame, base.map(|b| &b.station_frame))
                .ok_or(ScenarioError::Missing("station-frame"))?,
            aberration: self
                .aberration
                .or(base.map(|b| b.aberration))
                .unwrap_or_default(),
            elevation_limit_deg: self
                .elevation
                .or(base.map(|b| b.elevation_limit_deg))
                .ok_or(ScenarioError::Missing("elevation"))?,
            occultation,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Flags for shadow searches.
#[derive(Debug, Clone, Default, Args)]
pub struct ShadowArgs {
    /// Spacecraft in (or out of) shadow (e.g. MEX)
    #[arg(long)]
    pub spacecraft: Option<String>,

    /// Shadowing body (e.g. MARS)
    #[arg(long)]
    pub body: Option<String>,

    /// Body-fixed frame of the shadowing body (e.g. IAU_MARS)
    #[arg(long)]
    pub body_frame: Option<String>,

    /// Light source (defaults to SUN)
    #[arg(long)]
    pub light_source: Option<String>,

    /// Body-fixed frame of the light source (defaults to IAU_SUN)
    #[arg(long)]
    pub light_source_frame: Option<String>,

    /// Aberration correction (NONE, LT, LT+S, CN, CN+S, ...)
    #[arg(long)]
    pub aberration: Option<Aberration>,
}

impl ShadowArgs {
    pub fn resolve(&self, base: Option<&ShadowConfig>) -> Result<ShadowConfig, ScenarioError> {
        Ok(ShadowConfig {
            spacecraft: pick(&self.spacecraft, base.map(|b| &b.spacecraft))
                .ok_or(ScenarioError::Missing("spacecraft"))?,
            body: pick(&self.body, base.map(|b| &b.body)).ok_or(ScenarioError::Missing("body"))?,
            body_frame: pick(&self.body_frame, base.map(|b| &b.body_frame))
                .ok_or(ScenarioError::Missing("body-frame"))?,
            light_source: pick(&self.light_source, base.map(|b| &b.light_source))
                .unwrap_or_else(|| "SUN".to_string()),
            light_source_frame: pick(&self.light_source_frame, base.map(|b| &b.light_source_frame))
                .unwrap_or_else(|| "IAU_SUN".to_string()),
            aberration: self
                .aberration
                .or(base.map(|b| b.aberration))
                .unwrap_or_default(),
        })
    }
}

/// Flags for generic coordinate searches.
#[derive(Debug, Clone, Default, Args)]
pub struct CoordinateArgs {
    /// Target body or spacecraft
    #[arg(long)]
    pub target: Option<String>,

    /// Observing body
    #[arg(long)]
    pub observer: Option<String>,

    /// Reference frame of the position vector
    #[arg(long)]
    pub frame: Option<String>,

    /// Aberration correction (NONE, LT, LT+S, CN, CN+S, ...)
    #[arg(long)]
    pub aberration: Option<Aberration>,

    /// Coordinate system (RECTANGULAR, LATITUDINAL, RA/DEC, SPHERICAL, ...)
    #[arg(long)]
    pub coordinate_system: Option<CoordinateSystem>,

    /// Coordinate name (e.g. LATITUDE, RANGE, Z)
    #[arg(long)]
    pub coordinate: Option<String>,

    /// Relation: >, <, =, ABSMAX, ABSMIN, LOCMAX, LOCMIN
    #[arg(long)]
    pub relation: Option<Relation>,

    /// Reference value (degrees for angular coordinates, km otherwise)
    #[arg(long, allow_negative_numbers = true)]
    pub reference_value: Option<f64>,

    /// Adjustment value for ABSMAX/ABSMIN searches
    #[arg(long)]
    pub adjustment: Option<f64>,
}

impl CoordinateArgs {
    pub fn resolve(&self, base: Option<&CoordinateConfig>) -> Result<CoordinateConfig, ScenarioError> {
        let config = CoordinateConfig {
            target: pick(&self.target, base.map(|b| &b.target)).ok_or(ScenarioError::Missing("target"))?,
            observer: pick(&self.observer, base.map(|b| &b.observer))
                .ok_or(ScenarioError::Missing("observer"))?,
            frame: pick(&self.frame, base.map(|b| &b.frame)).ok_or(ScenarioError::Missing("frame"))?,
            aberration: self
                .aberration
                .or(base.map(|b| b.aberration))
                .unwrap_or_default(),
            coordinate_system: self
                .coordinate_system
                .or(base.map(|b| b.coordinate_system))
                .ok_or(ScenarioError::Missing("coordinate-system"))?,
            coordinate: pick(&self.coordinate, base.map(|b| &b.coordinate))
                .ok_or(ScenarioError::Missing("coordinate"))?,
            relation: self
                .relation
                .or(base.map(|b| b.relation))
                .ok_or(ScenarioError::Missing("relation"))?,
            reference_value: self
                .reference_value
                .or(base.map(|b| b.reference_value))
                .unwrap_or(0.0),
            adjustment: self.adjustment.or(base.map(|b| b.adjustment)).unwrap_or(0.0),
        };
        config.validate()?;
        Ok(config)
    }
}

fn pick(flag: &Option<String>, fallback: Option<&String>) -> Option<String> {
    flag.clone().or_else(|| fallback.cloned())
}
