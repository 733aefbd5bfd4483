//! Export helpers for window CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vw_core::time::EpochFormatter;
use vw_core::{Interval, Window, WindowError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format epoch {et}: {message}")]
    Format { et: f64, message: String },
    #[error("document holds an invalid window: {0}")]
    Window(#[from] WindowError),
}

/// On-disk layout, chosen from the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` selects JSON; everything else, stdout included, is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// One exported interval; also the CSV row layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub begin_et: f64,
    pub end_et: f64,
    pub begin: String,
    pub end: String,
    pub duration_s: f64,
}

/// Labeled window with its confinement, as written to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDocument {
    pub label: String,
    #[serde(default)]
    pub confinement: Option<Interval>,
    pub intervals: Vec<IntervalRecord>,
}

impl WindowDocument {
    pub fn new<F: EpochFormatter>(
        label: impl Into<String>,
        confinement: Option<Interval>,
        window: &Window,
        formatter: &F,
    ) -> Result<Self, ExportError> {
        let format = |et: f64| {
            formatter
                .format_epoch(et)
                .map_err(|err| ExportError::Format {
                    et,
                    message: err.to_string(),
                })
        };
        let intervals = window
            .iter()
            .map(|interval| {
                Ok(IntervalRecord {
                    begin_et: interval.begin(),
                    end_et: interval.end(),
                    begin: format(interval.begin())?,
                    end: format(interval.end())?,
                    duration_s: interval.duration(),
                })
            })
            .collect::<Result<Vec<_>, ExportError>>()?;
        Ok(Self {
            label: label.into(),
            confinement,
            intervals,
        })
    }

    /// Rebuild the window from the numeric endpoints; calendar strings are ignored.
    pub fn window(&self) -> Result<Window, WindowError> {
        Window::from_pairs(self.intervals.iter().map(|r| (r.begin_et, r.end_et)))
    }
}

/// Write the document's intervals as CSV rows with a header.
pub fn write_csv<W: Write>(writer: W, document: &WindowDocument) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if document.intervals.is_empty() {
        csv_writer.write_record(["begin_et", "end_et", "begin", "end", "duration_s"])?;
    }
    for record in &document.intervals {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, document: &WindowDocument) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, document)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a document to `path` (or stdout for `-`) in the format its extension selects.
pub fn export_window(path: &Path, document: &WindowDocument) -> Result<(), ExportError> {
    let writer = writer_for_path(path)?;
    match ExportFormat::from_path(path) {
        ExportFormat::Csv => write_csv(writer, document),
        ExportFormat::Json => write_json(writer, document),
    }
}

/// Read a JSON window document written by [`export_window`].
pub fn read_window_document(path: &Path) -> Result<WindowDocument, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    let document: WindowDocument = serde_json::from_reader(reader)?;
    document.window()?;
    Ok(document)
}
