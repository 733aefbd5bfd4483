use vw_core::time::parse_tdb;
use vw_core::{Interval, Window, WindowError};

fn day(n: f64) -> f64 {
    parse_tdb("2004 MAY 1 TDB").expect("day one") + (n - 1.0) * 86_400.0
}

fn window(pairs: &[(f64, f64)]) -> Window {
    Window::from_pairs(pairs.iter().map(|&(b, e)| (day(b), day(e)))).expect("valid window")
}

fn confinement() -> Interval {
    Interval::new(day(1.0), day(5.0)).expect("confinement")
}

#[test]
fn overlapping_windows_combine_as_expected() {
    let a = window(&[(2.0, 3.0)]);
    let b = window(&[(2.5, 4.0)]);

    assert_eq!(a.intersect_within(&b, confinement()), window(&[(2.5, 3.0)]));
    assert_eq!(a.union(&b), window(&[(2.0, 4.0)]));
    assert_eq!(
        a.neither_within(&b, confinement()),
        window(&[(1.0, 2.0), (4.0, 5.0)])
    );
}

#[test]
fn empty_first_window_leaves_second_untouched() {
    let a = Window::new();
    let b = window(&[(2.0, 3.0)]);

    assert!(a.intersect_within(&b, confinement()).is_empty());
    assert_eq!(a.union(&b), b);
    assert_eq!(
        a.neither_within(&b, confinement()),
        window(&[(1.0, 2.0), (3.0, 5.0)])
    );
}

#[test]
fn identities_with_the_empty_window() {
    let a = window(&[(1.5, 2.0), (3.0, 4.25)]);
    let empty = Window::new();

    assert_eq!(a.union(&empty), a);
    assert!(a.intersect(&empty).is_empty());
    assert!(a.difference(&a).is_empty());
    assert_eq!(a.difference(&empty), a);
}

#[test]
fn union_and_intersection_commute() {
    let a = window(&[(1.0, 1.5), (2.0, 3.0), (4.0, 4.5)]);
    let b = window(&[(1.25, 2.25), (2.75, 3.5)]);

    assert_eq!(a.union(&b), b.union(&a));
    assert_eq!(a.intersect(&b), b.intersect(&a));
    assert_eq!(a.intersect(&b), window(&[(1.25, 1.5), (2.0, 2.25), (2.75, 3.0)]));
}

#[test]
fn de_morgan_holds_for_distinct_endpoints() {
    let c = confinement();
    let a = window(&[(1.2, 1.8), (2.5, 3.3), (4.1, 4.4)]);
    let b = window(&[(1.6, 2.1), (3.0, 3.9)]);

    let lhs = Window::from(c).difference(&a.union(&b));
    let rhs = a.complement(c).intersect(&b.complement(c));
    assert_eq!(lhs, rhs);
    assert_eq!(lhs, window(&[(1.0, 1.2), (2.1, 2.5), (3.9, 4.1), (4.4, 5.0)]));
}

#[test]
fn results_stay_inside_the_confinement() {
    let c = Interval::new(day(2.0), day(4.0)).unwrap();
    let a = window(&[(1.0, 2.5), (3.5, 6.0)]);
    let b = window(&[(1.5, 3.75)]);

    for result in [
        a.intersect_within(&b, c),
        a.neither_within(&b, c),
        a.clip(c),
        a.complement(c),
    ] {
        assert!(result.is_subset_of(&Window::from(c)), "{result} escapes {c}");
        assert!(result.iter().all(|iv| iv.begin() <= iv.end()));
    }
}

#[test]
fn insert_merges_overlapping_and_touching_intervals() {
    let mut w = Window::new();
    w.insert(day(3.0), day(4.0)).unwrap();
    w.insert(day(1.0), day(2.0)).unwrap();
    assert_eq!(w.cardinality(), 2);

    // Touching at day 2 merges.
    w.insert(day(2.0), day(2.5)).unwrap();
    assert_eq!(w, window(&[(1.0, 2.5), (3.0, 4.0)]));

    // Spanning both merges everything.
    w.insert(day(2.25), day(3.5)).unwrap();
    assert_eq!(w, window(&[(1.0, 4.0)]));
}

#[test]
fn singleton_overlap_is_kept_and_shared_endpoints_survive_difference() {
    let a = window(&[(1.0, 2.0)]);
    let b = window(&[(2.0, 3.0)]);

    let touch = a.intersect(&b);
    assert_eq!(touch.cardinality(), 1);
    assert!(touch.fetch(0).unwrap().is_singleton());

    assert_eq!(a.difference(&b), a);
    let point = Window::from(Interval::instant(day(1.5)).unwrap());
    assert_eq!(a.difference(&point), a);
}

#[test]
fn invalid_intervals_are_rejected() {
    assert!(matches!(
        Interval::new(day(2.0), day(1.0)),
        Err(WindowError::InvalidInterval { .. })
    ));
    assert!(Interval::new(f64::NAN, 0.0).is_err());
    assert!(Interval::new(0.0, f64::INFINITY).is_err());
    assert!(Window::from_pairs([(0.0, 1.0), (3.0, 2.0)]).is_err());
}

#[test]
fn queries_report_measure_membership_and_indexing() {
    let w = window(&[(1.0, 1.5), (2.0, 3.0)]);
    assert_eq!(w.cardinality(), 2);
    assert_eq!(w.measure(), 1.5 * 86_400.0);
    assert!(w.contains(day(1.25)));
    assert!(w.contains(day(3.0)));
    assert!(!w.contains(day(1.75)));
    assert_eq!(w.first().unwrap().begin(), day(1.0));
    assert_eq!(w.last().unwrap().end(), day(3.0));
    assert_eq!(w.span().unwrap(), Interval::new(day(1.0), day(3.0)).unwrap());
    assert_eq!(
        w.fetch(2),
        Err(WindowError::IndexOutOfRange {
            index: 2,
            cardinality: 2
        })
    );
}

#[test]
fn unsorted_pairs_are_normalised() {
    let w = Window::from_pairs([(5.0, 6.0), (0.0, 2.0), (1.0, 3.0)]).unwrap();
    assert_eq!(w, Window::from_pairs([(0.0, 3.0), (5.0, 6.0)]).unwrap());
    assert_eq!(w.to_string(), "{[0, 3], [5, 6]}");
}
