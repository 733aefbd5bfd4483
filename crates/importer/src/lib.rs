//! SPICE kernel download utilities.

use std::fs::{self, File};
use std::io::copy;
use std::path::{Path, PathBuf};

use log::{info, warn};
use reqwest::blocking::Client;
use thiserror::Error;
use vw_ephem_spice::kernels::{
    GENERIC_META_KERNEL, KernelDescriptor, LOCAL_SPICE_DIR, write_meta_kernel,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of attempting to download a kernel.
#[derive(Debug)]
pub enum KernelStatus {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
    Failed { path: PathBuf, error: ImportError },
}

impl KernelStatus {
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded(path) | Self::AlreadyPresent(path) => path,
            Self::Failed { path, .. } => path,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Download every kernel in `descriptors` that is not already on disk.
///
/// A failed download removes its partial file and is reported in the status list;
/// only client construction and directory creation abort the run.
pub fn download_kernels(descriptors: &[KernelDescriptor]) -> Result<Vec<KernelStatus>, ImportError> {
    fs::create_dir_all(LOCAL_SPICE_DIR)?;
    let client = Client::builder().build()?;
    let mut statuses = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let dest = descriptor.local_path();
        if dest.exists() {
            info!("{} already present at {}", descriptor.filename, dest.display());
            statuses.push(KernelStatus::AlreadyPresent(dest));
            continue;
        }
        info!("downloading {} -> {}", descriptor.url, dest.display());
        match download_kernel(&client, descriptor, &dest) {
            Ok(()) => statuses.push(KernelStatus::Downloaded(dest)),
            Err(error) => {
                warn!("{}: {error}", descriptor.filename);
                let _ = fs::remove_file(&dest);
                statuses.push(KernelStatus::Failed { path: dest, error });
            }
        }
    }

    Ok(statuses)
}

/// Write `data/spice/generic.tm` listing the kernels that are available locally.
pub fn write_generic_meta_kernel(statuses: &[KernelStatus]) -> Result<PathBuf, ImportError> {
    let kernels: Vec<&Path> = statuses
        .iter()
        .filter(|status| status.is_available())
        .map(KernelStatus::path)
        .collect();
    let path = PathBuf::from(GENERIC_META_KERNEL);
    write_meta_kernel(&path, &kernels)?;
    Ok(path)
}

fn download_kernel(
    client: &Client,
    descriptor: &KernelDescriptor,
    dest: &Path,
) -> Result<(), ImportError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut response = client.get(descriptor.url).send()?.error_for_status()?;
    let mut file = File::create(dest)?;
    copy(&mut response, &mut file)?;
    Ok(())
}
