use chrono::NaiveDate;
use vw_core::time::{
    CalendarPattern, EpochFormatter, Rounding, TimeError, TimeSystem, datetime_to_et,
    et_to_datetime, parse_tdb, time_system_of,
};
use vw_ephem_spice::{EphemerisError, parse_epoch};

const REPORT_FORMAT: &str = "YYYY MON DD HR:MN:SC.### (TDB) ::TDB";

#[test]
fn j2000_is_the_zero_epoch() {
    assert_eq!(parse_tdb("2000 JAN 01 12:00:00 TDB").unwrap(), 0.0);
    assert_eq!(parse_tdb("2000-01-01T12:00:00").unwrap(), 0.0);
}

#[test]
fn accepted_calendar_forms_agree() {
    let expected = datetime_to_et(
        NaiveDate::from_ymd_opt(2004, 5, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    );
    for input in [
        "2004 MAY 2 TDB",
        "2004 May 02 00:00:00.000 (TDB)",
        "2004-05-02T00:00:00 TDB",
        "2004-05-02 00:00",
        "2004-123T00:00:00",
        "2004-123",
        "2004 MAY 2",
    ] {
        assert_eq!(parse_tdb(input).unwrap(), expected, "{input}");
    }
}

#[test]
fn report_pattern_renders_tdb_calendar() {
    let pattern = CalendarPattern::parse(REPORT_FORMAT).unwrap();
    assert_eq!(pattern.time_system(), TimeSystem::Tdb);
    assert_eq!(pattern.fraction_digits(), 3);

    let et = parse_tdb("2004 MAY 06 20:15:00.000 (TDB)").unwrap();
    assert_eq!(pattern.format(et).unwrap(), "2004 MAY 06 20:15:00.000 (TDB)");
}

#[test]
fn fraction_truncates_unless_rounding_is_requested() {
    let et = parse_tdb("2004 MAY 06 20:15:00 TDB").unwrap() + 0.9996;

    let truncate = CalendarPattern::parse("YYYY MON DD HR:MN:SC.### ::TDB").unwrap();
    assert_eq!(truncate.rounding(), Rounding::Truncate);
    assert_eq!(truncate.format(et).unwrap(), "2004 MAY 06 20:15:00.999");

    let round = CalendarPattern::parse("YYYY MON DD HR:MN:SC.### ::TDB ::RND").unwrap();
    assert_eq!(round.rounding(), Rounding::Round);
    assert_eq!(round.format(et).unwrap(), "2004 MAY 06 20:15:01.000");
}

#[test]
fn format_then_parse_recovers_the_epoch_to_pattern_precision() {
    let pattern = CalendarPattern::parse("YYYY-MM-DDTHR:MN:SC.###### ::TDB").unwrap();
    let base = parse_tdb("2004 MAY 2 TDB").unwrap();
    for offset in [0.0, 0.5, 1_234.567_891, 86_399.999_999_4, 3.0 * 86_400.0 + 17.25] {
        let et = base + offset;
        let text = pattern.format(et).unwrap();
        let back = parse_tdb(&text).unwrap();
        assert!((back - et).abs() < 1e-6, "{text}: {back} vs {et}");
    }
}

#[test]
fn title_case_month_and_day_of_year_tokens() {
    let pattern = CalendarPattern::parse("Mon DD, YYYY (DOY) ::TDB").unwrap();
    let et = parse_tdb("2004 MAY 2 TDB").unwrap();
    assert_eq!(pattern.format_epoch(et).unwrap(), "May 02, 2004 (123)");
}

#[test]
fn epochs_before_j2000_format_correctly() {
    let pattern = CalendarPattern::parse("YYYY MON DD HR:MN:SC ::TDB").unwrap();
    assert_eq!(pattern.format(-43_200.0).unwrap(), "2000 JAN 01 00:00:00");
    assert_eq!(
        et_to_datetime(-43_200.0).unwrap(),
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
}

#[test]
fn utc_needs_a_spice_session() {
    assert_eq!(time_system_of("2004 MAY 2 12:00:00 UTC"), Some(TimeSystem::Utc));
    assert_eq!(time_system_of("2004 MAY 2"), None);
    assert!(matches!(
        parse_tdb("2004 MAY 2 12:00:00 UTC"),
        Err(TimeError::UnsupportedTimeSystem(TimeSystem::Utc))
    ));
    assert!(matches!(
        parse_epoch(None, "2004 MAY 2 12:00:00 UTC"),
        Err(EphemerisError::MalformedTime { .. })
    ));

    let utc = CalendarPattern::parse("YYYY-MM-DDTHR:MN:SC.###::UTC").unwrap();
    assert!(matches!(
        utc.format(0.0),
        Err(TimeError::UnsupportedTimeSystem(TimeSystem::Utc))
    ));
}

#[test]
fn malformed_inputs_are_rejected() {
    for input in ["", "2004 FOO 2", "2004 FEB 30", "2004-05-02T25:00:00", "yesterday TDB"] {
        assert!(
            matches!(parse_tdb(input), Err(TimeError::MalformedTime { .. })),
            "{input}"
        );
    }
    assert!(matches!(
        CalendarPattern::parse("SC.########## ::TDB"),
        Err(TimeError::InvalidPattern { .. })
    ));
    assert!(matches!(
        CalendarPattern::parse("SC.### SC.## ::TDB"),
        Err(TimeError::InvalidPattern { .. })
    ));
    assert!(matches!(
        CalendarPattern::parse("YYYY ::GPS"),
        Err(TimeError::InvalidPattern { .. })
    ));
}
