use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Location where the project's helper expects SPICE kernels to live.
pub const LOCAL_SPICE_DIR: &str = "data/spice";

/// Meta-kernel written by `fetch_spice` listing the generic catalog.
pub const GENERIC_META_KERNEL: &str = "data/spice/generic.tm";

/// Enumerates the SPICE kernel families we currently ship helpers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// SPK: ephemerides (positions and velocities of bodies and stations).
    Spk,
    /// LSK: Leap seconds kernel (UTC to TDB/ET conversions).
    Lsk,
    /// PCK: Planetary constants kernel (body orientation, radii, etc.).
    Pck,
    /// Binary PCK: high-precision body orientation.
    Bpc,
    /// FK: Reference frame definitions (station topocentric frames).
    Fk,
}

impl KernelKind {
    /// Returns a human-readable label for this kernel type.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spk => "SPK (ephemeris)",
            Self::Lsk => "LSK (leap seconds)",
            Self::Pck => "PCK (planetary constants)",
            Self::Bpc => "PCK (binary orientation)",
            Self::Fk => "FK (reference frames)",
        }
    }
}

/// Metadata describing a SPICE kernel we expect to manage.
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor {
    pub filename: &'static str,
    pub url: &'static str,
    pub kind: KernelKind,
    pub description: &'static str,
}

impl KernelDescriptor {
    /// Returns the on-disk path where the kernel should reside.
    pub fn local_path(self) -> PathBuf {
        Path::new(LOCAL_SPICE_DIR).join(self.filename)
    }
}

/// Generic kernels needed by ground-station visibility searches.
///
/// Mission kernels (spacecraft SPK, shape models) are listed by the mission meta-kernel.
pub const KERNEL_CATALOG: &[KernelDescriptor] = &[
    KernelDescriptor {
        filename: "naif0012.tls",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/naif0012.tls",
        kind: KernelKind::Lsk,
        description: "NAIF leap seconds kernel: UTC to TDB conversion table with historical and predicted leap seconds.",
    },
    KernelDescriptor {
        filename: "pck00011.tpc",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/pck00011.tpc",
        kind: KernelKind::Pck,
        description: "Planetary constants kernel: body orientation models and radii used for ellipsoid shape models.",
    },
    KernelDescriptor {
        filename: "de440s.bsp",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de440s.bsp",
        kind: KernelKind::Spk,
        description: "JPL DE440 short ephemeris: barycentric positions/velocities for Sun, planets, and Pluto (1550 to 2650).",
    },
    KernelDescriptor {
        filename: "earthstns_itrf93_201023.bsp",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/stations/earthstns_itrf93_201023.bsp",
        kind: KernelKind::Spk,
        description: "DSN ground station locations (DSS-14, DSS-63, ...) relative to the Earth centre in ITRF93.",
    },
    KernelDescriptor {
        filename: "earth_topo_201023.tf",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/fk/stations/earth_topo_201023.tf",
        kind: KernelKind::Fk,
        description: "Topocentric frames for DSN stations (DSS-14_TOPO, ...), used for elevation searches.",
    },
    KernelDescriptor {
        filename: "earth_latest_high_prec.bpc",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/earth_latest_high_prec.bpc",
        kind: KernelKind::Bpc,
        description: "High-precision Earth orientation (ITRF93) required to evaluate station topocentric frames.",
    },
];

/// Render a meta-kernel listing `kernels` in load order.
pub fn render_meta_kernel<P: AsRef<Path>>(kernels: &[P]) -> String {
    let mut text = String::from("KPL/MK\n\n\\begindata\n\nKERNELS_TO_LOAD = (\n");
    for kernel in kernels {
        let _ = writeln!(text, "    '{}'", kernel.as_ref().display());
    }
    text.push_str(")\n\n\\begintext\n");
    text
}

/// Write a meta-kernel for `kernels` at `path`, creating parent directories.
pub fn write_meta_kernel<P: AsRef<Path>>(path: &Path, kernels: &[P]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_meta_kernel(kernels))
}
