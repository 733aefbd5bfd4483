//! Download the generic SPICE kernels into `data/spice/` and write a
//! meta-kernel listing them.
//!
//! Mission kernels (spacecraft SPK, shape models) are not part of the catalog;
//! list them in a mission meta-kernel next to these.

use std::path::Path;

use clap::Parser;
use vw_ephem_spice::kernels::KERNEL_CATALOG;
use vw_importer::KernelStatus;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch the generic NAIF kernels into data/spice/")]
struct Cli {
    /// Skip writing data/spice/generic.tm
    #[arg(long)]
    no_meta_kernel: bool,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let statuses = vw_importer::download_kernels(KERNEL_CATALOG)?;
    for status in &statuses {
        match status {
            KernelStatus::AlreadyPresent(path) => {
                println!("[skip] already present at {}", display_path(path))
            }
            KernelStatus::Downloaded(path) => println!("[ok] {}", display_path(path)),
            KernelStatus::Failed { path, error } => {
                eprintln!("[error] {}: {error}", display_path(path))
            }
        }
    }

    if !cli.no_meta_kernel {
        let meta_kernel = vw_importer::write_generic_meta_kernel(&statuses)?;
        println!("[ok] meta-kernel written to {}", display_path(&meta_kernel));
    }

    match vw_ephem_spice::kernel_summaries() {
        Ok(summaries) => {
            println!("\nLocal kernel summaries:");
            for summary in summaries {
                println!(
                    "  - {:<28} [{} | {}] {}\n      └ {}",
                    summary.descriptor.filename,
                    summary.descriptor.kind.label(),
                    format_size(summary.file_size_bytes),
                    summary.descriptor.description,
                    display_path(&summary.path)
                );
            }
        }
        Err(err) => eprintln!("[warn] unable to summarize kernels: {err}"),
    }

    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit_idx = 0;
    while value >= 1024.0 && unit_idx < UNITS.len() - 1 {
        value /= 1024.0;
        unit_idx += 1;
    }
    if unit_idx == 0 {
        format!("{bytes} {}", UNITS[unit_idx])
    } else {
        format!("{value:.1} {}", UNITS[unit_idx])
    }
}
