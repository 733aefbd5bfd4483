//! Owned double-precision SPICE cells used to pass windows across the FFI boundary.

use std::ffi::c_void;

use cspice_sys::{
    _SpiceDataType_SPICE_DP, SpiceBoolean, SpiceCell, SpiceDouble, SpiceInt, wncard_c, wnfetd_c,
    wninsd_c,
};
use vw_core::Window;

use crate::{EphemerisError, check_for_spice_error};

/// Size of the control area preceding cell data (`SPICE_CELL_CTRLSZ`).
const CELL_CTRLSZ: usize = 6;

/// Heap-backed `SpiceCell` of doubles.
///
/// `storage` owns the control area and data; `cell` points into it. Moving the
/// struct moves the `Vec` header only, so the pointers stay valid.
pub(crate) struct DoubleCell {
    storage: Vec<SpiceDouble>,
    cell: SpiceCell,
}

impl DoubleCell {
    /// Allocate a cell holding up to `size` doubles (`size / 2` intervals).
    pub(crate) fn with_size(size: usize) -> Result<Self, EphemerisError> {
        let spice_size = SpiceInt::try_from(size).map_err(|_| EphemerisError::InvalidArgument {
            name: "cell size",
            reason: format!("{size} doubles exceed the SPICE integer range"),
        })?;
        let mut storage = vec![0.0 as SpiceDouble; CELL_CTRLSZ + size];
        let base = storage.as_mut_ptr();
        let cell = SpiceCell {
            dtype: _SpiceDataType_SPICE_DP,
            length: 0,
            size: spice_size,
            card: 0,
            isSet: 1 as SpiceBoolean,
            adjust: 0 as SpiceBoolean,
            init: 0 as SpiceBoolean,
            base: base as *mut c_void,
            // SAFETY: `storage` holds CELL_CTRLSZ + size elements.
            data: unsafe { base.add(CELL_CTRLSZ) } as *mut c_void,
        };
        Ok(Self { storage, cell })
    }

    /// Copy a window into a new cell sized for exactly its intervals.
    pub(crate) fn from_window(window: &Window) -> Result<Self, EphemerisError> {
        let mut cell = Self::with_size((2 * window.cardinality()).max(2))?;
        for interval in window {
            unsafe {
                wninsd_c(interval.begin(), interval.end(), cell.as_mut_ptr());
            }
            check_for_spice_error()?;
        }
        Ok(cell)
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut SpiceCell {
        debug_assert!(self.storage.len() >= CELL_CTRLSZ);
        &mut self.cell
    }

    /// Read the cell back as a window.
    pub(crate) fn to_window(&mut self) -> Result<Window, EphemerisError> {
        let cardinality = unsafe { wncard_c(self.as_mut_ptr()) };
        check_for_spice_error()?;
        let mut pairs = Vec::with_capacity(cardinality.max(0) as usize);
        for idx in 0..cardinality {
            let mut left: SpiceDouble = 0.0;
            let mut right: SpiceDouble = 0.0;
            unsafe {
                wnfetd_c(self.as_mut_ptr(), idx, &mut left, &mut right);
            }
            check_for_spice_error()?;
            pairs.push((left, right));
        }
        Ok(Window::from_pairs(pairs)?)
    }
}
