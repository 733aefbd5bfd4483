//! Geometry finder searches (`gfposc_c`, `gfoclt_c`) over a loaded session.

use cspice_sys::{SpiceDouble, SpiceInt, gfoclt_c, gfposc_c};
use log::debug;
use vw_core::Window;
use vw_core::search::{Aberration, CoordinateSystem, OccultationType, Relation, ShapeModel};

use crate::cell::DoubleCell;
use crate::{EphemerisError, SpiceSession, check_for_spice_error, to_cstring};

/// Default bound on the number of intervals a search may return.
pub const DEFAULT_MAX_INTERVALS: usize = 1000;

/// Largest `max_intervals` whose result cell (two doubles per interval) SPICE can size.
pub const MAX_INTERVALS_LIMIT: usize = (SpiceInt::MAX / 2) as usize;

/// Coordinate-relation search on the observer-to-target position vector.
#[derive(Debug, Clone)]
pub struct PositionSearch<'a> {
    pub target: &'a str,
    pub frame: &'a str,
    pub aberration: Aberration,
    pub observer: &'a str,
    pub coordinate_system: CoordinateSystem,
    pub coordinate: &'a str,
    pub relation: Relation,
    /// Reference value in SPICE units (radians for angles, km for distances).
    pub reference_value: f64,
    pub adjustment: f64,
    pub step_seconds: f64,
    pub max_intervals: usize,
}

/// One body as seen in an occultation search.
#[derive(Debug, Clone, Copy)]
pub struct OccultingBody<'a> {
    pub name: &'a str,
    pub shape: ShapeModel,
    /// Body-fixed frame; ignored for point shapes.
    pub frame: &'a str,
}

/// Search for times when `front` occults `back` as seen by `observer`.
#[derive(Debug, Clone)]
pub struct OccultationSearch<'a> {
    pub occultation: OccultationType,
    pub front: OccultingBody<'a>,
    pub back: OccultingBody<'a>,
    pub aberration: Aberration,
    pub observer: &'a str,
    pub step_seconds: f64,
    pub max_intervals: usize,
}

impl SpiceSession {
    /// Run `gfposc_c` within `confinement`.
    pub fn position_search(
        &self,
        search: &PositionSearch<'_>,
        confinement: &Window,
    ) -> Result<Window, EphemerisError> {
        validate_step(search.step_seconds)?;
        let nintvls = result_capacity(search.max_intervals)?;
        debug!(
            "gfposc {} from {} in {}: {} {} {} {}",
            search.target,
            search.observer,
            search.frame,
            search.coordinate_system,
            search.coordinate,
            search.relation,
            search.reference_value
        );

        let target = to_cstring(search.target)?;
        let frame = to_cstring(search.frame)?;
        let abcorr = to_cstring(search.aberration.as_spice())?;
        let observer = to_cstring(search.observer)?;
        let crdsys = to_cstring(search.coordinate_system.as_spice())?;
        let coord = to_cstring(search.coordinate)?;
        let relate = to_cstring(search.relation.as_spice())?;

        let mut cnfine = DoubleCell::from_window(confinement)?;
        let mut result = DoubleCell::with_size(2 * search.max_intervals)?;
        unsafe {
            gfposc_c(
                target.as_ptr() as *mut i8,
                frame.as_ptr() as *mut i8,
                abcorr.as_ptr() as *mut i8,
                observer.as_ptr() as *mut i8,
                crdsys.as_ptr() as *mut i8,
                coord.as_ptr() as *mut i8,
                relate.as_ptr() as *mut i8,
                search.reference_value as SpiceDouble,
                search.adjustment as SpiceDouble,
                search.step_seconds as SpiceDouble,
                nintvls,
                cnfine.as_mut_ptr(),
                result.as_mut_ptr(),
            );
        }
        check_for_spice_error()?;
        result.to_window()
    }

    /// Run `gfoclt_c` within `confinement`.
    pub fn occultation_search(
        &self,
        search: &OccultationSearch<'_>,
        confinement: &Window,
    ) -> Result<Window, EphemerisError> {
        validate_step(search.step_seconds)?;
        result_capacity(search.max_intervals)?;
        debug!(
            "gfoclt {} {} ({}) behind {} ({}) from {}",
            search.occultation,
            search.back.name,
            search.back.shape,
            search.front.name,
            search.front.shape,
            search.observer
        );

        let occtyp = to_cstring(search.occultation.as_spice())?;
        let front = to_cstring(search.front.name)?;
        let fshape = to_cstring(search.front.shape.as_spice())?;
        let fframe = to_cstring(body_frame(&search.front))?;
        let back = to_cstring(search.back.name)?;
        let bshape = to_cstring(search.back.shape.as_spice())?;
        let bframe = to_cstring(body_frame(&search.back))?;
        let abcorr = to_cstring(search.aberration.as_spice())?;
        let observer = to_cstring(search.observer)?;

        let mut cnfine = DoubleCell::from_window(confinement)?;
        let mut result = DoubleCell::with_size(2 * search.max_intervals)?;
        unsafe {
            gfoclt_c(
                occtyp.as_ptr() as *mut i8,
                front.as_ptr() as *mut i8,
                fshape.as_ptr() as *mut i8,
                fframe.as_ptr() as *mut i8,
                back.as_ptr() as *mut i8,
                bshape.as_ptr() as *mut i8,
                bframe.as_ptr() as *mut i8,
                abcorr.as_ptr() as *mut i8,
                observer.as_ptr() as *mut i8,
                search.step_seconds as SpiceDouble,
                cnfine.as_mut_ptr(),
                result.as_mut_ptr(),
            );
        }
        check_for_spice_error()?;
        result.to_window()
    }
}

fn body_frame<'a>(body: &OccultingBody<'a>) -> &'a str {
    if body.shape.needs_frame() { body.frame } else { " " }
}

fn validate_step(step_seconds: f64) -> Result<(), EphemerisError> {
    if step_seconds.is_finite() && step_seconds > 0.0 {
        Ok(())
    } else {
        Err(EphemerisError::InvalidArgument {
            name: "step",
            reason: format!("step size must be positive and finite (got {step_seconds})"),
        })
    }
}

/// Check a result capacity and return it as the interval count handed to SPICE.
pub fn result_capacity(max_intervals: usize) -> Result<SpiceInt, EphemerisError> {
    if max_intervals == 0 {
        return Err(EphemerisError::InvalidArgument {
            name: "max_intervals",
            reason: "result capacity must hold at least one interval".to_string(),
        });
    }
    if max_intervals > MAX_INTERVALS_LIMIT {
        return Err(EphemerisError::InvalidArgument {
            name: "max_intervals",
            reason: format!(
                "{max_intervals} intervals exceed the SPICE cell limit of {MAX_INTERVALS_LIMIT}"
            ),
        });
    }
    SpiceInt::try_from(max_intervals).map_err(|_| EphemerisError::InvalidArgument {
        name: "max_intervals",
        reason: format!("{max_intervals} exceeds the SPICE integer range"),
    })
}
