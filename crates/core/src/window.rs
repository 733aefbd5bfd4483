//! Time windows: ordered, disjoint sets of closed intervals and their set algebra.
//!
//! Endpoint conventions:
//! - inserting or uniting intervals that overlap *or touch* merges them;
//! - an intersection that collapses to a single instant is kept as a singleton interval;
//! - a difference keeps the endpoints it shares with the subtracted window, so the
//!   result is the closure of the set difference.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or indexing windows.
#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("invalid interval [{begin}, {end}]: endpoints must be finite and ordered")]
    InvalidInterval { begin: f64, end: f64 },
    #[error("interval index {index} out of range for window of cardinality {cardinality}")]
    IndexOutOfRange { index: usize, cardinality: usize },
}

/// Closed time interval in ephemeris seconds past J2000 TDB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr")]
pub struct Interval {
    begin: f64,
    end: f64,
}

#[derive(Deserialize)]
struct IntervalRepr {
    begin: f64,
    end: f64,
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = WindowError;

    fn try_from(value: IntervalRepr) -> Result<Self, Self::Error> {
        Interval::new(value.begin, value.end)
    }
}

impl Interval {
    pub fn new(begin: f64, end: f64) -> Result<Self, WindowError> {
        if !begin.is_finite() || !end.is_finite() || begin > end {
            return Err(WindowError::InvalidInterval { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Degenerate interval holding a single instant.
    pub fn instant(at: f64) -> Result<Self, WindowError> {
        Self::new(at, at)
    }

    #[inline]
    pub fn begin(&self) -> f64 {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the interval in seconds.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.begin
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.begin == self.end
    }

    pub fn contains(&self, t: f64) -> bool {
        self.begin <= t && t <= self.end
    }

    /// Common part of two intervals, if any. Touching intervals share one instant.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        (begin <= end).then_some(Interval { begin, end })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}

/// Ordered set of disjoint closed intervals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct Window {
    intervals: Vec<Interval>,
}

impl From<Vec<Interval>> for Window {
    fn from(intervals: Vec<Interval>) -> Self {
        intervals.into_iter().collect()
    }
}

impl From<Window> for Vec<Interval> {
    fn from(window: Window) -> Self {
        window.intervals
    }
}

impl From<Interval> for Window {
    fn from(interval: Interval) -> Self {
        Self {
            intervals: vec![interval],
        }
    }
}

impl FromIterator<Interval> for Window {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut intervals: Vec<Interval> = iter.into_iter().collect();
        intervals.sort_by(|a, b| a.begin.total_cmp(&b.begin));
        let mut window = Window::new();
        for interval in intervals {
            window.push_merged(interval);
        }
        window
    }
}

impl<'a> IntoIterator for &'a Window {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl Window {
    /// Empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Window holding the single interval `[begin, end]`.
    pub fn from_bounds(begin: f64, end: f64) -> Result<Self, WindowError> {
        Interval::new(begin, end).map(Self::from)
    }

    /// Build a window from `(begin, end)` pairs in any order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, WindowError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        pairs
            .into_iter()
            .map(|(begin, end)| Interval::new(begin, end))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from)
    }

    /// Insert `[begin, end]`, merging with every interval it overlaps or touches.
    pub fn insert(&mut self, begin: f64, end: f64) -> Result<(), WindowError> {
        let interval = Interval::new(begin, end)?;
        let start = self.intervals.partition_point(|iv| iv.end < interval.begin);
        let stop = self.intervals.partition_point(|iv| iv.begin <= interval.end);
        let merged = self.intervals[start..stop]
            .iter()
            .fold(interval, |acc, iv| Interval {
                begin: acc.begin.min(iv.begin),
                end: acc.end.max(iv.end),
            });
        self.intervals.splice(start..stop, std::iter::once(merged));
        Ok(())
    }

    /// Number of intervals.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total duration covered by the window in seconds.
    pub fn measure(&self) -> f64 {
        self.intervals.iter().map(Interval::duration).sum()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Fetch the `index`-th interval (zero based).
    pub fn fetch(&self, index: usize) -> Result<Interval, WindowError> {
        self.intervals
            .get(index)
            .copied()
            .ok_or(WindowError::IndexOutOfRange {
                index,
                cardinality: self.intervals.len(),
            })
    }

    pub fn first(&self) -> Option<Interval> {
        self.intervals.first().copied()
    }

    pub fn last(&self) -> Option<Interval> {
        self.intervals.last().copied()
    }

    /// Smallest interval covering the whole window.
    pub fn span(&self) -> Option<Interval> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Some(Interval {
                begin: first.begin,
                end: last.end,
            }),
            _ => None,
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        let idx = self.intervals.partition_point(|iv| iv.end < t);
        self.intervals.get(idx).is_some_and(|iv| iv.contains(t))
    }

    /// True when every interval of `self` lies inside some interval of `other`.
    pub fn is_subset_of(&self, other: &Window) -> bool {
        self.intervals.iter().all(|iv| {
            other
                .intervals
                .iter()
                .any(|o| o.begin <= iv.begin && iv.end <= o.end)
        })
    }

    /// Instants where at least one of the windows holds.
    pub fn union(&self, other: &Window) -> Window {
        let mut merged = Window::new();
        let (mut a, mut b) = (self.intervals.iter().peekable(), other.intervals.iter().peekable());
        loop {
            let next = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) if x.begin <= y.begin => a.next(),
                (Some(_), Some(_)) => b.next(),
                (Some(_), None) => a.next(),
                (None, Some(_)) => b.next(),
                (None, None) => break,
            };
            if let Some(interval) = next {
                merged.push_merged(*interval);
            }
        }
        merged
    }

    /// Instants where both windows hold.
    pub fn intersect(&self, other: &Window) -> Window {
        let mut result = Window::new();
        let (mut i, mut j) = (0, 0);
        while i < self.intervals.len() && j < other.intervals.len() {
            let a = self.intervals[i];
            let b = other.intervals[j];
            if let Some(common) = a.intersection(&b) {
                result.push_merged(common);
            }
            if a.end < b.end {
                i += 1;
            } else {
                j += 1;
            }
        }
        result
    }

    /// Instants where `self` holds and `other` does not.
    ///
    /// Singleton intervals of `other` remove nothing from the closure.
    pub fn difference(&self, other: &Window) -> Window {
        let mut result = Window::new();
        let removals: Vec<Interval> = other
            .intervals
            .iter()
            .filter(|iv| !iv.is_singleton())
            .copied()
            .collect();

        for a in &self.intervals {
            let mut cursor = a.begin;
            let mut consumed = false;
            let first = removals.partition_point(|b| b.end < a.begin);
            for b in removals[first..].iter().take_while(|b| b.begin <= a.end) {
                if b.begin > cursor {
                    result.push_merged(Interval {
                        begin: cursor,
                        end: b.begin,
                    });
                }
                cursor = cursor.max(b.end);
                if cursor >= a.end {
                    consumed = true;
                    break;
                }
            }
            if !consumed {
                result.push_merged(Interval {
                    begin: cursor,
                    end: a.end,
                });
            }
        }
        result
    }

    /// Portion of `confinement` not covered by this window.
    pub fn complement(&self, confinement: Interval) -> Window {
        Window::from(confinement).difference(self)
    }

    /// Restrict the window to `confinement`.
    pub fn clip(&self, confinement: Interval) -> Window {
        self.intersect(&Window::from(confinement))
    }

    /// Both windows hold, restricted to `confinement`.
    pub fn intersect_within(&self, other: &Window, confinement: Interval) -> Window {
        self.intersect(other).clip(confinement)
    }

    /// Neither window holds within `confinement`.
    pub fn neither_within(&self, other: &Window, confinement: Interval) -> Window {
        self.union(other).complement(confinement)
    }

    fn push_merged(&mut self, interval: Interval) {
        match self.intervals.last_mut() {
            Some(last) if interval.begin <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => self.intervals.push(interval),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, interval) in self.intervals.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{interval}")?;
        }
        write!(f, "}}")
    }
}
