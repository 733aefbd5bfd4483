//! View periods: target above an elevation limit in a station's topocentric frame.

use log::info;
use vw_config::VisibilityConfig;
use vw_core::Window;
use vw_core::search::{Aberration, CoordinateSystem, Relation};
use vw_core::units::deg_to_rad;
use vw_ephem_spice::{PositionSearch, SpiceSession};

use crate::{FinderError, SearchSettings};

/// Elevation-limited view period search.
///
/// Elevation is not a SPICE coordinate, so the search runs on the equivalent
/// `LATITUDE > limit` constraint in the latitudinal system of the topocentric frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSearch {
    pub target: String,
    pub station: String,
    pub station_frame: String,
    pub aberration: Aberration,
    pub elevation_limit_deg: f64,
    pub settings: SearchSettings,
}

impl ElevationSearch {
    pub fn from_config(config: &VisibilityConfig, settings: SearchSettings) -> Self {
        Self {
            target: config.target.clone(),
            station: config.station.clone(),
            station_frame: config.station_frame.clone(),
            aberration: config.aberration,
            elevation_limit_deg: config.elevation_limit_deg,
            settings,
        }
    }

    /// Parameters handed to `gfposc_c`.
    pub fn position_search(&self) -> Result<PositionSearch<'_>, FinderError> {
        if !(-90.0..=90.0).contains(&self.elevation_limit_deg) {
            return Err(FinderError::InvalidParameter {
                name: "elevation_limit_deg",
                reason: format!("{} is not a valid elevation", self.elevation_limit_deg),
            });
        }
        Ok(PositionSearch {
            target: &self.target,
            frame: &self.station_frame,
            aberration: self.aberration,
            observer: &self.station,
            coordinate_system: CoordinateSystem::Latitudinal,
            coordinate: "LATITUDE",
            relation: Relation::Greater,
            reference_value: deg_to_rad(self.elevation_limit_deg),
            adjustment: 0.0,
            step_seconds: self.settings.step_seconds,
            max_intervals: self.settings.max_intervals,
        })
    }

    pub fn run(&self, session: &SpiceSession, confinement: &Window) -> Result<Window, FinderError> {
        let search = self.position_search()?;
        let window = session.position_search(&search, confinement)?;
        info!(
            "{} above {:.1} deg from {}: {} view period(s)",
            self.target,
            self.elevation_limit_deg,
            self.station,
            window.cardinality()
        );
        Ok(window)
    }
}
