//! Timeline chart of labeled windows: time on X, one category row per window,
//! each interval drawn as a segment with point markers at its ends.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use vw_core::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR};
use vw_core::time::{EpochFormatter, days_between};
use vw_core::{Interval, Window};

/// Row label for intervals where both windows hold.
pub const SIMULTANEOUS: &str = "simultaneous";
/// Row label for intervals where neither window holds.
pub const INVISIBLE: &str = "invisible";

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("nothing to plot: every window is empty and no confinement was given")]
    Empty,
    #[error("output path contains invalid UTF-8: {0}")]
    InvalidPath(String),
    #[error("failed to create output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("font unavailable: {0}")]
    Font(String),
    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// One interval placed on a category row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub row: usize,
    pub begin_et: f64,
    pub end_et: f64,
}

/// Everything needed to draw the chart, independent of any backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub categories: Vec<String>,
    pub span: Interval,
    pub segments: Vec<Segment>,
}

impl TimelineLayout {
    /// Lay out `series` top to bottom in the given order.
    ///
    /// The time axis covers `confinement` when given, otherwise the hull of all
    /// intervals. A degenerate axis is widened by an hour on each side.
    pub fn new(series: &[(&str, &Window)], confinement: Option<Interval>) -> Result<Self, TimelineError> {
        let extent = series
            .iter()
            .filter_map(|(_, window)| window.span())
            .reduce(hull);
        let span = confinement.or(extent).ok_or(TimelineError::Empty)?;
        let span = if span.is_singleton() {
            Interval::new(span.begin() - SECONDS_PER_HOUR, span.end() + SECONDS_PER_HOUR)
                .map_err(|err| TimelineError::Drawing(err.to_string()))?
        } else {
            span
        };

        let categories = series.iter().map(|(label, _)| label.to_string()).collect();
        let segments = series
            .iter()
            .enumerate()
            .flat_map(|(row, (_, window))| {
                window.iter().map(move |interval| Segment {
                    row,
                    begin_et: interval.begin(),
                    end_et: interval.end(),
                })
            })
            .collect();
        Ok(Self {
            categories,
            span,
            segments,
        })
    }

    /// X axis range in days since the start of the span.
    pub fn x_range_days(&self) -> Range<f64> {
        0.0..self.days(self.span.end())
    }

    /// Y axis range with half a row of padding around the categories.
    pub fn y_range(&self) -> Range<f64> {
        -0.5..(self.categories.len().max(1) as f64 - 0.5)
    }

    /// Y coordinate of a row; the first category is drawn at the top.
    pub fn row_y(&self, row: usize) -> f64 {
        let top = self.categories.len().saturating_sub(1);
        (top - row.min(top)) as f64
    }

    fn category_at(&self, y: f64) -> Option<&str> {
        let top = self.categories.len().checked_sub(1)? as f64;
        let rounded = y.round();
        if (y - rounded).abs() > 1e-6 || rounded < 0.0 || rounded > top {
            return None;
        }
        let row = (top - rounded) as usize;
        self.categories.get(row).map(String::as_str)
    }

    fn days(&self, et: f64) -> f64 {
        days_between(self.span.begin(), et)
    }
}

/// Render `layout` to `path`: SVG when the extension is `.svg`, PNG otherwise.
pub fn render<F: EpochFormatter>(
    layout: &TimelineLayout,
    path: &Path,
    size: (u32, u32),
    formatter: &F,
) -> Result<(), TimelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw(&root, layout, formatter).map_err(classify)
    } else {
        let output = path
            .to_str()
            .ok_or_else(|| TimelineError::InvalidPath(path.display().to_string()))?;
        let root = BitMapBackend::new(output, size).into_drawing_area();
        draw(&root, layout, formatter).map_err(classify)
    }
}

fn draw<DB: DrawingBackend, F: EpochFormatter>(
    root: &DrawingArea<DB, Shift>,
    layout: &TimelineLayout,
    formatter: &F,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 22.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 15.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption("Visibility timeline", caption_font)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(layout.x_range_days(), layout.y_range())?;

    let x_label = |days: &f64| {
        let et = layout.span.begin() + days * SECONDS_PER_DAY;
        formatter
            .format_epoch(et)
            .unwrap_or_else(|_| format!("{et:.0}"))
    };
    let y_label = |y: &f64| layout.category_at(*y).unwrap_or_default().to_string();

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Time")
        .label_style(label_font.clone())
        .x_labels(5)
        .y_labels(layout.categories.len().max(1) * 2 + 1)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    for segment in &layout.segments {
        let y = layout.row_y(segment.row);
        let points = vec![(layout.days(segment.begin_et), y), (layout.days(segment.end_et), y)];
        chart.draw_series(LineSeries::new(points, BLUE.stroke_width(2)).point_size(3))?;
    }

    root.present()?;
    Ok(())
}

fn classify<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> TimelineError {
    match err {
        DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(font)) => {
            TimelineError::Font(font.to_string())
        }
        other => TimelineError::Drawing(other.to_string()),
    }
}

fn hull(a: Interval, b: Interval) -> Interval {
    Interval::new(a.begin().min(b.begin()), a.end().max(b.end())).unwrap_or(a)
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}
