//! Console reports: search input banners and window listings.

use std::fmt;

use vw_core::Window;
use vw_core::time::EpochFormatter;

/// Line printed in place of a listing when a window is empty.
pub const NO_EVENTS: &str = "No events were found.";

const BANNER_LABEL_WIDTH: usize = 28;

/// Aligned block of search inputs printed before a search runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    title: String,
    rows: Vec<(String, String)>,
}

impl Banner {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, label: impl Into<String>, value: impl fmt::Display) -> Self {
        self.rows.push((label.into(), value.to_string()));
        self
    }

    /// Numeric row with six decimals.
    pub fn value(self, label: impl Into<String>, value: f64) -> Self {
        self.row(label, format!("{value:.6}"))
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        for (label, value) in &self.rows {
            writeln!(f, "   {label:<width$} = {value}", width = BANNER_LABEL_WIDTH)?;
        }
        writeln!(f, " ")
    }
}

/// Rendered report; print it with `{}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Renders windows as calendar strings through an [`EpochFormatter`].
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'f, F> {
    formatter: &'f F,
}

impl<'f, F: EpochFormatter> Reporter<'f, F> {
    pub fn new(formatter: &'f F) -> Self {
        Self { formatter }
    }

    /// One begin/end pair per interval; the first begin and the last end are
    /// labeled as window boundaries.
    ///
    /// ```text
    /// Visibility or window start time:  2004 MAY 02 00:00:00.000 (TDB)
    /// Visibility stop time:             2004 MAY 02 09:21:08.417 (TDB)
    /// ```
    pub fn labeled(&self, heading: &str, noun: &str, window: &Window) -> Result<Report, F::Error> {
        let mut report = Report::default();
        if window.is_empty() {
            report.push(NO_EVENTS);
            return Ok(report);
        }
        report.push(format!("{heading}\n"));

        let width = noun.len() + " or window start time:".len();
        let label = |text: String| format!("{text:<width$}");
        let last = window.cardinality() - 1;
        for (index, interval) in window.iter().enumerate() {
            let begin_label = if index == 0 {
                label(format!("{noun} or window start time:"))
            } else {
                label(format!("{noun} start time:"))
            };
            let end_label = if index == last {
                label(format!("{noun} or window stop time:"))
            } else {
                label(format!("{noun} stop time:"))
            };
            report.push(format!(
                "{begin_label}  {}",
                self.formatter.format_epoch(interval.begin())?
            ));
            report.push(format!(
                "{end_label}  {}",
                self.formatter.format_epoch(interval.end())?
            ));
            report.push(" ");
        }
        Ok(report)
    }

    /// Interval-by-interval comparison of several tagged windows.
    ///
    /// Row `i` lists the `i`-th interval of every window that has one; a blank
    /// line separates rows.
    pub fn paired(&self, heading: &str, windows: &[(&str, &Window)]) -> Result<Report, F::Error> {
        let mut report = Report::default();
        if windows.iter().all(|(_, window)| window.is_empty()) {
            report.push(NO_EVENTS);
            return Ok(report);
        }
        report.push(format!("{heading}\n"));

        let rows = windows
            .iter()
            .map(|(_, window)| window.cardinality())
            .max()
            .unwrap_or(0);
        for index in 0..rows {
            for (tag, window) in windows {
                if let Some(interval) = window.intervals().get(index) {
                    report.push(format!(
                        " {tag}: {} : {}",
                        self.formatter.format_epoch(interval.begin())?,
                        self.formatter.format_epoch(interval.end())?
                    ));
                }
            }
            report.push("");
        }
        Ok(report)
    }
}
