//! Visibility, occultation, and shadow windows computed with the SPICE toolkit.
//!
//! The geometry itself stays inside CSPICE; window algebra, calendar formatting,
//! reporting, and plotting are native. Member crates are re-exported so the
//! binaries and integration tests depend on a single library.

pub mod scenario;
pub mod timeline;

pub use vw_config;
pub use vw_core;
pub use vw_ephem_spice;
pub use vw_export;
pub use vw_finder;
pub use vw_importer;
pub use vw_report;
