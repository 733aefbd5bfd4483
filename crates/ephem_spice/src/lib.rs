//! SPICE session handling, time conversion, and geometry searches built on the CSPICE toolkit.
//!
//! CSPICE keeps its kernel pool in process-global state. [`SpiceSession`] owns that
//! state for as long as it lives: opening one takes a process-wide lock and
//! furnishes the kernels, dropping it unloads them and releases the lock.

use std::ffi::{CStr, CString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cspice_sys::{
    SpiceBoolean, SpiceDouble, SpiceInt, erract_c, failed_c, furnsh_c, getmsg_c, reset_c,
    str2et_c, timout_c, unload_c,
};
use log::{debug, warn};
use thiserror::Error;
use vw_core::WindowError;
use vw_core::time::{CalendarPattern, EpochFormatter, TimeSystem};

mod cell;
pub mod geometry;
pub mod kernels;

use kernels::{KERNEL_CATALOG, KernelDescriptor};

pub use geometry::{
    DEFAULT_MAX_INTERVALS, MAX_INTERVALS_LIMIT, OccultationSearch, OccultingBody, PositionSearch,
    result_capacity,
};

/// Basic metadata describing a local SPICE kernel.
#[derive(Debug)]
pub struct KernelSummary {
    pub descriptor: &'static KernelDescriptor,
    pub path: PathBuf,
    pub file_size_bytes: u64,
}

/// Errors surfaced while loading kernels or querying the SPICE toolkit.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("failed to load meta-kernel {path}: {reason}")]
    ConfigurationLoad { path: PathBuf, reason: String },
    #[error("kernel `{name}` is missing at {path}")]
    MissingKernel { name: String, path: PathBuf },
    #[error("kernel `{name}` path contains invalid UTF-8: {path}")]
    InvalidKernelPath { name: String, path: PathBuf },
    #[error("failed to read metadata for kernel `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("window capacity exceeded: {message}")]
    CapacityExceeded { message: String },
    #[error("malformed time string `{input}`: {message}")]
    MalformedTime { input: String, message: String },
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("SPICE returned an invalid window: {0}")]
    Window(#[from] WindowError),
    #[error("SPICE call failed: {short}: {long}")]
    Spice { short: String, long: String },
}

static SESSION_LOCK: Mutex<()> = Mutex::new(());

/// Scoped ownership of the CSPICE kernel pool.
pub struct SpiceSession {
    loaded: Vec<CString>,
    _guard: MutexGuard<'static, ()>,
}

impl std::fmt::Debug for SpiceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpiceSession")
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl SpiceSession {
    /// Load a meta-kernel; every failure is reported as a configuration load error.
    pub fn open<P: AsRef<Path>>(meta_kernel: P) -> Result<Self, EphemerisError> {
        let path = meta_kernel.as_ref();
        let config_error = |reason: String| EphemerisError::ConfigurationLoad {
            path: path.to_path_buf(),
            reason,
        };
        if !path.is_file() {
            return Err(config_error("file not found".to_string()));
        }
        let c_path = path_to_cstring(&path.display().to_string(), path)
            .map_err(|err| config_error(err.to_string()))?;
        Self::furnish(vec![c_path]).map_err(|err| config_error(err.to_string()))
    }

    fn furnish(paths: Vec<CString>) -> Result<Self, EphemerisError> {
        let guard = SESSION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        configure_error_handling();
        let mut session = Self {
            loaded: Vec::with_capacity(paths.len()),
            _guard: guard,
        };
        for path in paths {
            debug!("furnsh {}", path.to_string_lossy());
            unsafe {
                furnsh_c(path.as_ptr() as *mut i8);
            }
            // Record before checking: a meta-kernel can fail halfway through its list.
            session.loaded.push(path);
            check_for_spice_error()?;
        }
        Ok(session)
    }

    /// Paths furnished by this session, in load order.
    pub fn loaded_kernels(&self) -> Vec<String> {
        self.loaded
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    /// Convert any time string understood by SPICE into ephemeris seconds past J2000.
    pub fn str2et(&self, epoch: &str) -> Result<f64, EphemerisError> {
        let epoch_c = to_cstring(epoch)?;
        let mut et: SpiceDouble = 0.0;
        unsafe {
            str2et_c(epoch_c.as_ptr() as *mut i8, &mut et);
        }
        check_for_spice_error().map_err(|err| match err {
            EphemerisError::Spice { long, .. } => EphemerisError::MalformedTime {
                input: epoch.to_string(),
                message: long,
            },
            other => other,
        })?;
        Ok(et)
    }

    /// Format an ephemeris time with a SPICE picture string.
    pub fn timout(&self, et: f64, pattern: &str) -> Result<String, EphemerisError> {
        let pattern_c = to_cstring(pattern)?;
        let mut buffer = vec![0i8; 128];
        unsafe {
            timout_c(
                et,
                pattern_c.as_ptr() as *mut i8,
                buffer.len() as SpiceInt,
                buffer.as_mut_ptr(),
            );
        }
        check_for_spice_error()?;
        let c_str = unsafe { CStr::from_ptr(buffer.as_ptr()) };
        Ok(c_str.to_string_lossy().trim().to_string())
    }

    /// Formatter bound to this session, so UTC pictures can be rendered too.
    pub fn calendar(&self, pattern: CalendarPattern) -> Calendar<'_> {
        Calendar::new(Some(self), pattern)
    }
}

impl Drop for SpiceSession {
    fn drop(&mut self) {
        for path in self.loaded.iter().rev() {
            debug!("unload {}", path.to_string_lossy());
            unsafe {
                unload_c(path.as_ptr() as *mut i8);
            }
            if let Err(err) = check_for_spice_error() {
                warn!("failed to unload {}: {err}", path.to_string_lossy());
            }
        }
    }
}

/// [`EpochFormatter`] that formats TDB pictures natively and defers every other
/// time system to `timout_c` on the session, when there is one.
#[derive(Debug, Clone)]
pub struct Calendar<'s> {
    session: Option<&'s SpiceSession>,
    pattern: CalendarPattern,
}

impl<'s> Calendar<'s> {
    pub fn new(session: Option<&'s SpiceSession>, pattern: CalendarPattern) -> Self {
        Self { session, pattern }
    }

    pub fn pattern(&self) -> &CalendarPattern {
        &self.pattern
    }
}

impl EpochFormatter for Calendar<'_> {
    type Error = EphemerisError;

    fn format_epoch(&self, et: f64) -> Result<String, Self::Error> {
        format_epoch(self.session, et, &self.pattern)
    }
}

/// Parse a time string, natively for TDB and through the session otherwise.
pub fn parse_epoch(session: Option<&SpiceSession>, epoch: &str) -> Result<f64, EphemerisError> {
    match (vw_core::time::time_system_of(epoch), session) {
        (Some(TimeSystem::Utc), Some(session)) => session.str2et(epoch),
        (Some(TimeSystem::Utc), None) => Err(EphemerisError::MalformedTime {
            input: epoch.to_string(),
            message: "UTC strings need a loaded leap-second kernel".to_string(),
        }),
        _ => vw_core::time::parse_tdb(epoch).map_err(|err| EphemerisError::MalformedTime {
            input: epoch.to_string(),
            message: err.to_string(),
        }),
    }
}

/// Format an epoch natively for TDB pictures and through the session otherwise.
pub fn format_epoch(
    session: Option<&SpiceSession>,
    et: f64,
    pattern: &CalendarPattern,
) -> Result<String, EphemerisError> {
    match (pattern.time_system(), session) {
        (TimeSystem::Tdb, _) => pattern.format(et).map_err(|err| EphemerisError::InvalidArgument {
            name: "pattern",
            reason: err.to_string(),
        }),
        (_, Some(session)) => session.timout(et, pattern.as_str()),
        (system, None) => Err(EphemerisError::InvalidArgument {
            name: "pattern",
            reason: format!("{system} output needs a loaded leap-second kernel"),
        }),
    }
}

/// Summarize the local kernel set with file sizes and descriptions.
pub fn kernel_summaries() -> Result<Vec<KernelSummary>, EphemerisError> {
    validate_kernel_paths()?;
    KERNEL_CATALOG
        .iter()
        .map(|descriptor| {
            let path = descriptor.local_path();
            let metadata = fs::metadata(&path).map_err(|source| EphemerisError::Io {
                name: descriptor.filename.to_string(),
                source,
            })?;
            Ok(KernelSummary {
                descriptor,
                path,
                file_size_bytes: metadata.len(),
            })
        })
        .collect()
}

fn validate_kernel_paths() -> Result<(), EphemerisError> {
    for descriptor in KERNEL_CATALOG {
        let path = descriptor.local_path();
        if !path.exists() {
            return Err(EphemerisError::MissingKernel {
                name: descriptor.filename.to_string(),
                path,
            });
        }
    }
    Ok(())
}

fn path_to_cstring(name: &str, path: &Path) -> Result<CString, EphemerisError> {
    let invalid = || EphemerisError::InvalidKernelPath {
        name: name.to_string(),
        path: path.to_path_buf(),
    };
    let path_str = path.to_str().ok_or_else(invalid)?;
    CString::new(path_str).map_err(|_| invalid())
}

pub(crate) fn to_cstring(value: &str) -> Result<CString, EphemerisError> {
    CString::new(value).map_err(|_| EphemerisError::InvalidArgument {
        name: "string",
        reason: format!("`{}` contains an interior NUL byte", value.escape_debug()),
    })
}

fn configure_error_handling() {
    const SET: &[u8] = b"SET\0";
    const RETURN_MODE: &[u8] = b"RETURN\0";
    unsafe {
        erract_c(
            SET.as_ptr() as *mut i8,
            0 as SpiceInt,
            RETURN_MODE.as_ptr() as *mut i8,
        );
    }
}

/// Short messages CSPICE signals when a window or cell runs out of room.
const CAPACITY_ERRORS: &[&str] = &[
    "SPICE(WINDOWEXCESS)",
    "SPICE(OUTOFROOM)",
    "SPICE(CELLTOOSMALL)",
    "SPICE(WINDOWTOOSMALL)",
];

pub(crate) fn check_for_spice_error() -> Result<(), EphemerisError> {
    unsafe {
        if failed_c() != 0 as SpiceBoolean {
            let short = read_message(b"SHORT\0", 64);
            let long = read_message(b"LONG\0", 1024);
            reset_c();
            return Err(classify_spice_error(short, long));
        }
    }
    Ok(())
}

/// Map a CSPICE short/long message pair onto an [`EphemerisError`].
pub fn classify_spice_error(short: String, long: String) -> EphemerisError {
    if CAPACITY_ERRORS.contains(&short.as_str()) {
        EphemerisError::CapacityExceeded {
            message: format!("{short}: {long}"),
        }
    } else {
        EphemerisError::Spice { short, long }
    }
}

unsafe fn read_message(option: &[u8], capacity: usize) -> String {
    let mut buffer = vec![0i8; capacity];
    unsafe {
        getmsg_c(
            option.as_ptr() as *mut i8,
            buffer.len() as SpiceInt,
            buffer.as_mut_ptr(),
        );
        CStr::from_ptr(buffer.as_ptr())
            .to_string_lossy()
            .trim()
            .to_string()
    }
}
