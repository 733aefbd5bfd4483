//! Generic coordinate relation searches.

use log::info;
use vw_config::CoordinateConfig;
use vw_core::Window;
use vw_core::search::{Aberration, CoordinateSystem, Relation};
use vw_core::units::deg_to_rad;
use vw_ephem_spice::{PositionSearch, SpiceSession};

use crate::{FinderError, SearchSettings};

/// Coordinate search with angles expressed in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSearch {
    pub target: String,
    pub observer: String,
    pub frame: String,
    pub aberration: Aberration,
    pub coordinate_system: CoordinateSystem,
    pub coordinate: String,
    pub relation: Relation,
    pub reference_value: f64,
    pub adjustment: f64,
    pub settings: SearchSettings,
}

impl CoordinateSearch {
    pub fn from_config(config: &CoordinateConfig, settings: SearchSettings) -> Self {
        Self {
            target: config.target.clone(),
            observer: config.observer.clone(),
            frame: config.frame.clone(),
            aberration: config.aberration,
            coordinate_system: config.coordinate_system,
            coordinate: config.coordinate.to_ascii_uppercase(),
            relation: config.relation,
            reference_value: config.reference_value,
            adjustment: config.adjustment,
            settings,
        }
    }

    /// Reference value in SPICE units.
    pub fn spice_reference_value(&self) -> f64 {
        if self.coordinate_system.is_angular(&self.coordinate) {
            deg_to_rad(self.reference_value)
        } else {
            self.reference_value
        }
    }

    pub fn position_search(&self) -> Result<PositionSearch<'_>, FinderError> {
        if self.adjustment < 0.0 {
            return Err(FinderError::InvalidParameter {
                name: "adjustment",
                reason: format!("must not be negative (got {})", self.adjustment),
            });
        }
        let adjustment = if self.relation.uses_adjustment() {
            self.spice_adjustment()
        } else {
            0.0
        };
        Ok(PositionSearch {
            target: &self.target,
            frame: &self.frame,
            aberration: self.aberration,
            observer: &self.observer,
            coordinate_system: self.coordinate_system,
            coordinate: &self.coordinate,
            relation: self.relation,
            reference_value: self.spice_reference_value(),
            adjustment,
            step_seconds: self.settings.step_seconds,
            max_intervals: self.settings.max_intervals,
        })
    }

    fn spice_adjustment(&self) -> f64 {
        if self.coordinate_system.is_angular(&self.coordinate) {
            deg_to_rad(self.adjustment)
        } else {
            self.adjustment
        }
    }

    pub fn run(&self, session: &SpiceSession, confinement: &Window) -> Result<Window, FinderError> {
        let search = self.position_search()?;
        let window = session.position_search(&search, confinement)?;
        info!(
            "{} {} {} {} from {}: {} interval(s)",
            self.target,
            self.coordinate,
            self.relation,
            self.reference_value,
            self.observer,
            window.cardinality()
        );
        Ok(window)
    }
}
