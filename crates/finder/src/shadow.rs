//! Eclipses of a light source by a body, seen from a spacecraft.

use log::info;
use vw_config::ShadowConfig;
use vw_core::Window;
use vw_core::search::{Aberration, OccultationType, ShapeModel};
use vw_ephem_spice::{OccultationSearch, OccultingBody, SpiceSession};

use crate::{FinderError, SearchSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowSearch {
    pub spacecraft: String,
    pub body: String,
    pub body_frame: String,
    pub light_source: String,
    pub light_source_frame: String,
    pub aberration: Aberration,
    pub settings: SearchSettings,
}

/// Shadow windows of one search.
///
/// `eclipse` is the `ANY` occultation window (umbra or penumbra), `umbra` the
/// `FULL` window, and `penumbra` the partial-shadow remainder `eclipse - umbra`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowOutcome {
    pub eclipse: Window,
    pub umbra: Window,
    pub penumbra: Window,
}

impl ShadowOutcome {
    pub fn from_windows(eclipse: Window, umbra: Window) -> Self {
        let penumbra = eclipse.difference(&umbra);
        Self {
            eclipse,
            umbra,
            penumbra,
        }
    }
}

impl ShadowSearch {
    pub fn from_config(config: &ShadowConfig, settings: SearchSettings) -> Self {
        Self {
            spacecraft: config.spacecraft.clone(),
            body: config.body.clone(),
            body_frame: config.body_frame.clone(),
            light_source: config.light_source.clone(),
            light_source_frame: config.light_source_frame.clone(),
            aberration: config.aberration,
            settings,
        }
    }

    pub fn run(&self, session: &SpiceSession, confinement: &Window) -> Result<ShadowOutcome, FinderError> {
        let eclipse = session.occultation_search(&self.search(OccultationType::Any), confinement)?;
        let umbra = if eclipse.is_empty() {
            Window::new()
        } else {
            session.occultation_search(&self.search(OccultationType::Full), &eclipse)?
        };
        let outcome = ShadowOutcome::from_windows(eclipse, umbra);
        info!(
            "{} shadowed by {}: {} eclipse(s), {} umbra interval(s), {} penumbra interval(s)",
            self.spacecraft,
            self.body,
            outcome.eclipse.cardinality(),
            outcome.umbra.cardinality(),
            outcome.penumbra.cardinality()
        );
        Ok(outcome)
    }

    fn search(&self, occultation: OccultationType) -> OccultationSearch<'_> {
        OccultationSearch {
            occultation,
            front: OccultingBody {
                name: &self.body,
                shape: ShapeModel::Ellipsoid,
                frame: &self.body_frame,
            },
            back: OccultingBody {
                name: &self.light_source,
                shape: ShapeModel::Ellipsoid,
                frame: &self.light_source_frame,
            },
            aberration: self.aberration,
            observer: &self.spacecraft,
            step_seconds: self.settings.step_seconds,
            max_intervals: self.settings.max_intervals,
        }
    }
}
