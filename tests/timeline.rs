use std::fs;

use visibility_windows::timeline::{
    INVISIBLE, SIMULTANEOUS, Segment, TimelineError, TimelineLayout, render,
};
use vw_core::time::{CalendarPattern, parse_tdb};
use vw_core::{Interval, Window};

fn day(n: f64) -> f64 {
    parse_tdb("2004 MAY 1 TDB").unwrap() + (n - 1.0) * 86_400.0
}

fn layout() -> TimelineLayout {
    let simultaneous = Window::from_bounds(day(3.0), day(4.0)).unwrap();
    let invisible = Window::from_pairs([(day(1.0), day(2.0)), (day(5.0), day(6.0))]).unwrap();
    TimelineLayout::new(
        &[(SIMULTANEOUS, &simultaneous), (INVISIBLE, &invisible)],
        Some(Interval::new(day(1.0), day(6.0)).unwrap()),
    )
    .unwrap()
}

#[test]
fn segments_land_on_their_category_rows() {
    let layout = layout();
    assert_eq!(layout.categories, vec!["simultaneous", "invisible"]);
    assert_eq!(layout.x_range_days(), 0.0..5.0);
    assert_eq!(
        layout.segments,
        vec![
            Segment {
                row: 0,
                begin_et: day(3.0),
                end_et: day(4.0)
            },
            Segment {
                row: 1,
                begin_et: day(1.0),
                end_et: day(2.0)
            },
            Segment {
                row: 1,
                begin_et: day(5.0),
                end_et: day(6.0)
            },
        ]
    );
    // First category on top.
    assert!(layout.row_y(0) > layout.row_y(1));
    assert!(layout.y_range().contains(&layout.row_y(0)));
    assert!(layout.y_range().contains(&layout.row_y(1)));
}

#[test]
fn axis_falls_back_to_the_window_hull() {
    let a = Window::from_bounds(day(2.0), day(2.5)).unwrap();
    let b = Window::from_bounds(day(4.0), day(4.25)).unwrap();
    let layout = TimelineLayout::new(&[("a", &a), ("b", &b)], None).unwrap();
    assert_eq!(layout.span, Interval::new(day(2.0), day(4.25)).unwrap());

    let point = Window::from(Interval::instant(day(2.0)).unwrap());
    let layout = TimelineLayout::new(&[("point", &point)], None).unwrap();
    assert_eq!(layout.span.duration(), 7_200.0);

    let empty = Window::new();
    assert!(matches!(
        TimelineLayout::new(&[("empty", &empty)], None),
        Err(TimelineError::Empty)
    ));
}

#[test]
fn timeline_renders_png_and_svg() {
    let layout = layout();
    let ticks = CalendarPattern::parse("MON DD HR:MN ::TDB").unwrap();
    let dir = tempfile::tempdir().expect("tempdir");

    for name in ["timeline.png", "timeline.svg"] {
        let path = dir.path().join(name);
        match render(&layout, &path, (640, 320), &ticks) {
            Ok(()) => {
                let metadata = fs::metadata(&path).expect("plot metadata");
                assert!(metadata.len() > 0, "{name} should not be empty");
            }
            Err(TimelineError::Font(reason)) => {
                eprintln!("Skipping timeline render: no usable font ({reason})");
                return;
            }
            Err(err) => panic!("render {name} failed: {err}"),
        }
    }
}
