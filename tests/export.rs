use std::path::Path;

use vw_core::time::{CalendarPattern, parse_tdb};
use vw_core::{Interval, Window};
use vw_export::{
    ExportError, ExportFormat, WindowDocument, export_window, read_window_document, write_csv,
};

fn sample() -> (Interval, Window, CalendarPattern) {
    let begin = parse_tdb("2004 MAY 1 TDB").unwrap();
    let confinement = Interval::new(begin, begin + 5.0 * 86_400.0).unwrap();
    let window = Window::from_pairs([
        (begin + 86_400.0, begin + 90_000.0),
        (begin + 2.0 * 86_400.0, begin + 2.5 * 86_400.0),
    ])
    .unwrap();
    let pattern = CalendarPattern::parse("YYYY-MM-DDTHR:MN:SC ::TDB").unwrap();
    (confinement, window, pattern)
}

#[test]
fn format_follows_extension() {
    assert_eq!(ExportFormat::from_path(Path::new("out/windows.json")), ExportFormat::Json);
    assert_eq!(ExportFormat::from_path(Path::new("out/windows.JSON")), ExportFormat::Json);
    assert_eq!(ExportFormat::from_path(Path::new("out/windows.csv")), ExportFormat::Csv);
    assert_eq!(ExportFormat::from_path(Path::new("-")), ExportFormat::Csv);
}

#[test]
fn csv_rows_carry_both_numeric_and_calendar_epochs() {
    let (confinement, window, pattern) = sample();
    let document = WindowDocument::new("visibility", Some(confinement), &window, &pattern).unwrap();

    let mut buffer = Vec::new();
    write_csv(&mut buffer, &document).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "begin_et,end_et,begin,end,duration_s");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("2004-05-02T00:00:00,2004-05-02T01:00:00,3600"));
    assert!(lines[2].contains("2004-05-03T00:00:00,2004-05-03T12:00:00,43200"));
}

#[test]
fn empty_window_still_writes_a_header() {
    let (confinement, _, pattern) = sample();
    let document = WindowDocument::new("none", Some(confinement), &Window::new(), &pattern).unwrap();
    let mut buffer = Vec::new();
    write_csv(&mut buffer, &document).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "begin_et,end_et,begin,end,duration_s\n");
}

#[test]
fn json_documents_read_back_into_the_same_window() {
    let (confinement, window, pattern) = sample();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("visibility.json");

    let document = WindowDocument::new("visibility", Some(confinement), &window, &pattern).unwrap();
    export_window(&path, &document).unwrap();

    let loaded = read_window_document(&path).unwrap();
    assert_eq!(loaded.label, "visibility");
    assert_eq!(loaded.confinement, Some(confinement));
    assert_eq!(loaded.window().unwrap(), window);
}

#[test]
fn malformed_documents_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"label":"bad","intervals":[{"begin_et":10.0,"end_et":5.0,"begin":"","end":"","duration_s":-5.0}]}"#,
    )
    .unwrap();
    assert!(matches!(read_window_document(&path), Err(ExportError::Window(_))));

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(read_window_document(&path), Err(ExportError::Json(_))));
}

#[test]
fn formatter_failures_name_the_epoch() {
    let (confinement, window, _) = sample();
    let utc = CalendarPattern::parse("YYYY-MM-DD ::UTC").unwrap();
    assert!(matches!(
        WindowDocument::new("utc", Some(confinement), &window, &utc),
        Err(ExportError::Format { .. })
    ));
}
