use vw_core::Window;
use vw_core::time::{CalendarPattern, parse_tdb};
use vw_report::{Banner, NO_EVENTS, Reporter};

fn pattern() -> CalendarPattern {
    CalendarPattern::parse("YYYY MON DD HR:MN:SC.### (TDB) ::TDB").unwrap()
}

fn window(pairs: &[(&str, &str)]) -> Window {
    Window::from_pairs(
        pairs
            .iter()
            .map(|(b, e)| (parse_tdb(b).unwrap(), parse_tdb(e).unwrap())),
    )
    .unwrap()
}

#[test]
fn empty_window_reports_no_events() {
    let pattern = pattern();
    let reporter = Reporter::new(&pattern);
    let report = reporter
        .labeled("Visibility times of MEX as seen from DSS-14:", "Visibility", &Window::new())
        .unwrap();
    assert_eq!(report.to_string(), format!("{NO_EVENTS}\n"));

    let paired = reporter.paired("heading", &[("Ell", &Window::new())]).unwrap();
    assert_eq!(paired.to_string(), "No events were found.\n");
}

#[test]
fn labeled_report_marks_window_boundaries() {
    let pattern = pattern();
    let w = window(&[
        ("2004 MAY 2 TDB", "2004 MAY 2 09:21:08 TDB"),
        ("2004 MAY 3 12:00:00 TDB", "2004 MAY 3 18:30:00.250 TDB"),
    ]);
    let report = Reporter::new(&pattern)
        .labeled("Visibility times of MEX as seen from DSS-14:", "Visibility", &w)
        .unwrap();

    let expected = "\
Visibility times of MEX as seen from DSS-14:

Visibility or window start time:  2004 MAY 02 00:00:00.000 (TDB)
Visibility stop time:             2004 MAY 02 09:21:08.000 (TDB)
 
Visibility start time:            2004 MAY 03 12:00:00.000 (TDB)
Visibility or window stop time:   2004 MAY 03 18:30:00.250 (TDB)
 
";
    assert_eq!(report.to_string(), expected);
}

#[test]
fn single_interval_uses_both_boundary_labels() {
    let pattern = pattern();
    let w = window(&[("2004 MAY 3 TDB", "2004 MAY 4 TDB")]);
    let report = Reporter::new(&pattern).labeled("Penumbra:", "Penumbra", &w).unwrap();
    let lines = report.lines();
    assert!(lines[1].starts_with("Penumbra or window start time:  2004 MAY 03"));
    assert!(lines[2].starts_with("Penumbra or window stop time:   2004 MAY 04"));
}

#[test]
fn paired_report_interleaves_shape_models() {
    let pattern = pattern();
    let ellipsoid = window(&[
        ("2004 MAY 2 01:00 TDB", "2004 MAY 2 02:00 TDB"),
        ("2004 MAY 3 01:00 TDB", "2004 MAY 3 02:00 TDB"),
    ]);
    let dsk = window(&[("2004 MAY 2 01:00:30 TDB", "2004 MAY 2 02:00 TDB")]);
    let report = Reporter::new(&pattern)
        .paired("Visibility start and stop times:", &[("Ell", &ellipsoid), ("DSK", &dsk)])
        .unwrap();

    let expected = "\
Visibility start and stop times:

 Ell: 2004 MAY 02 01:00:00.000 (TDB) : 2004 MAY 02 02:00:00.000 (TDB)
 DSK: 2004 MAY 02 01:00:30.000 (TDB) : 2004 MAY 02 02:00:00.000 (TDB)

 Ell: 2004 MAY 03 01:00:00.000 (TDB) : 2004 MAY 03 02:00:00.000 (TDB)

";
    assert_eq!(report.to_string(), expected);
}

#[test]
fn banner_aligns_labels() {
    let banner = Banner::new("Inputs for target visibility search:")
        .row("Target", "MEX")
        .row("Observer's reference frame", "DSS-14_TOPO")
        .value("Elevation limit (degrees)", 6.0);
    let expected = "
Inputs for target visibility search:

   Target                       = MEX
   Observer's reference frame   = DSS-14_TOPO
   Elevation limit (degrees)    = 6.000000
 
";
    assert_eq!(banner.to_string(), expected);
}
