//! Window producers: sequences of geometry finder calls that yield visibility,
//! occultation, shadow, and coordinate windows.

pub mod coordinate;
pub mod elevation;
pub mod shadow;
pub mod visibility;

pub use coordinate::CoordinateSearch;
pub use elevation::ElevationSearch;
pub use shadow::{ShadowOutcome, ShadowSearch};
pub use visibility::{Blocker, ShapeWindows, VisibilityOutcome, VisibilitySearch};

use thiserror::Error;
use vw_config::SearchWindowConfig;
use vw_core::{Interval, WindowError};
use vw_ephem_spice::{EphemerisError, SpiceSession};

/// Step size and result capacity shared by every search of a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub step_seconds: f64,
    pub max_intervals: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            step_seconds: vw_config::DEFAULT_STEP_SECONDS,
            max_intervals: vw_config::DEFAULT_MAX_INTERVALS,
        }
    }
}

impl From<&SearchWindowConfig> for SearchSettings {
    fn from(config: &SearchWindowConfig) -> Self {
        Self {
            step_seconds: config.step_seconds,
            max_intervals: config.max_intervals,
        }
    }
}

/// Top-level search error.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("ephemeris query failed: {0}")]
    Ephemeris(#[from] EphemerisError),
    #[error("invalid window: {0}")]
    Window(#[from] WindowError),
    #[error("invalid search parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Resolve the scenario's start/stop strings into the confinement interval.
pub fn confinement(
    session: Option<&SpiceSession>,
    config: &SearchWindowConfig,
) -> Result<Interval, FinderError> {
    let begin = vw_ephem_spice::parse_epoch(session, &config.start)?;
    let end = vw_ephem_spice::parse_epoch(session, &config.stop)?;
    Interval::new(begin, end).map_err(|_| FinderError::InvalidParameter {
        name: "stop",
        reason: format!("`{}` precedes `{}`", config.stop, config.start),
    })
}
