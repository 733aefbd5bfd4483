//! Visibility: view periods with occultations by a blocking body removed,
//! evaluated once per shape model of the blocker.

use log::info;
use vw_config::{OccultationConfig, VisibilityConfig};
use vw_core::Window;
use vw_core::search::{OccultationType, ShapeModel};
use vw_ephem_spice::{OccultationSearch, OccultingBody, SpiceSession};

use crate::{ElevationSearch, FinderError, SearchSettings};

/// Body that may pass in front of the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Blocker {
    pub name: String,
    pub frame: String,
    pub shapes: Vec<ShapeModel>,
}

impl From<&OccultationConfig> for Blocker {
    fn from(config: &OccultationConfig) -> Self {
        Self {
            name: config.blocker.clone(),
            frame: config.blocker_frame.clone(),
            shapes: config.shapes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySearch {
    pub elevation: ElevationSearch,
    pub blocker: Option<Blocker>,
}

/// Occultation and visibility windows for one shape model.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeWindows {
    pub shape: ShapeModel,
    pub occulted: Window,
    pub visible: Window,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOutcome {
    pub view_periods: Window,
    pub by_shape: Vec<ShapeWindows>,
}

impl VisibilitySearch {
    pub fn from_config(config: &VisibilityConfig, settings: SearchSettings) -> Self {
        Self {
            elevation: ElevationSearch::from_config(config, settings),
            blocker: config.occultation.as_ref().map(Blocker::from),
        }
    }

    pub fn run(
        &self,
        session: &SpiceSession,
        confinement: &Window,
    ) -> Result<VisibilityOutcome, FinderError> {
        let view_periods = self.elevation.run(session, confinement)?;
        let Some(blocker) = &self.blocker else {
            return Ok(VisibilityOutcome {
                view_periods,
                by_shape: Vec::new(),
            });
        };

        let mut by_shape = Vec::with_capacity(blocker.shapes.len());
        for &shape in &blocker.shapes {
            if shape == ShapeModel::Point {
                return Err(FinderError::InvalidParameter {
                    name: "shapes",
                    reason: format!("{} cannot be modelled as a point", blocker.name),
                });
            }
            // Occultations only matter inside view periods.
            let occulted = if view_periods.is_empty() {
                Window::new()
            } else {
                session.occultation_search(&self.occultation_search(blocker, shape), &view_periods)?
            };
            let visible = view_periods.difference(&occulted);
            info!(
                "{} occulted by {} ({}): {} interval(s); visible: {} interval(s)",
                self.elevation.target,
                blocker.name,
                shape,
                occulted.cardinality(),
                visible.cardinality()
            );
            by_shape.push(ShapeWindows {
                shape,
                occulted,
                visible,
            });
        }
        Ok(VisibilityOutcome {
            view_periods,
            by_shape,
        })
    }

    fn occultation_search<'a>(&'a self, blocker: &'a Blocker, shape: ShapeModel) -> OccultationSearch<'a> {
        OccultationSearch {
            occultation: OccultationType::Any,
            front: OccultingBody {
                name: &blocker.name,
                shape,
                frame: &blocker.frame,
            },
            back: OccultingBody {
                name: &self.elevation.target,
                shape: ShapeModel::Point,
                frame: " ",
            },
            aberration: self.elevation.aberration,
            observer: &self.elevation.station,
            step_seconds: self.elevation.settings.step_seconds,
            max_intervals: self.elevation.settings.max_intervals,
        }
    }
}
