//! Core time, window, and search vocabulary types shared across the visibility window workspace.

pub mod search;
pub mod time;
pub mod window;

pub use window::{Interval, Window, WindowError};

/// Physical and calendar constants.
pub mod constants {
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Radians per degree.
    pub const RADIANS_PER_DEGREE: f64 = std::f64::consts::PI / 180.0;
}

/// Angle conversion helpers.
pub mod units {
    use super::constants::RADIANS_PER_DEGREE;

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v * RADIANS_PER_DEGREE
    }
}
