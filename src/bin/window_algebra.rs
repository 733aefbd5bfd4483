//! Combine two windows inside a confinement interval: where both hold
//! ("simultaneous") and where neither does ("invisible").
//!
//! Windows come from `BEGIN..END` interval strings or from JSON documents
//! written by the search binaries' `--export` flag. TDB strings are handled
//! natively; a meta-kernel is only needed for UTC input or output.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use log::info;
use visibility_windows::timeline::{INVISIBLE, SIMULTANEOUS, TimelineLayout, render};
use vw_config::DEFAULT_TIME_FORMAT;
use vw_core::time::CalendarPattern;
use vw_core::{Interval, Window};
use vw_ephem_spice::{Calendar, SpiceSession, parse_epoch};
use vw_export::WindowDocument;
use vw_report::Reporter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Intersect two windows and find when neither holds"
)]
struct Cli {
    /// First window: `BEGIN..END` interval (repeatable) or a JSON window document
    #[arg(long, default_value = "2004 MAY 2 TDB..2004 MAY 4 TDB")]
    first: Vec<String>,

    /// Second window: `BEGIN..END` interval (repeatable) or a JSON window document
    #[arg(long, default_value = "2004 MAY 3 TDB..2004 MAY 5 TDB")]
    second: Vec<String>,

    /// Confinement start
    #[arg(long, default_value = "2004 MAY 1 TDB")]
    start: String,

    /// Confinement stop
    #[arg(long, default_value = "2004 MAY 6 TDB")]
    stop: String,

    /// Meta-kernel; required only for UTC times
    #[arg(long)]
    meta_kernel: Option<PathBuf>,

    /// Report picture string (SPICE `timout` syntax)
    #[arg(long, default_value = DEFAULT_TIME_FORMAT)]
    time_format: String,

    /// Timeline image (PNG, or SVG by extension)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Picture string for the timeline tick labels
    #[arg(long, default_value = "MON DD HR:MN ::TDB")]
    tick_format: String,

    #[arg(long, default_value_t = 1000)]
    width: u32,

    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Directory receiving `simultaneous` and `invisible` window files
    #[arg(long)]
    export_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExportKind::Csv)]
    export_format: ExportKind,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum ExportKind {
    Csv,
    Json,
}

impl ExportKind {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let session = cli
        .meta_kernel
        .as_deref()
        .map(SpiceSession::open)
        .transpose()?;
    let session = session.as_ref();

    let confinement = Interval::new(parse_epoch(session, &cli.start)?, parse_epoch(session, &cli.stop)?)
        .with_context(|| format!("`{}` precedes `{}`", cli.stop, cli.start))?;
    let first = read_window(session, &cli.first).context("invalid --first window")?;
    let second = read_window(session, &cli.second).context("invalid --second window")?;

    let simultaneous = first.intersect_within(&second, confinement);
    let invisible = first.neither_within(&second, confinement);
    info!(
        "{} simultaneous interval(s), {} invisible interval(s)",
        simultaneous.cardinality(),
        invisible.cardinality()
    );

    let calendar = Calendar::new(session, CalendarPattern::parse(&cli.time_format)?);
    let reporter = Reporter::new(&calendar);
    print!(
        "{}",
        reporter.labeled("Simultaneous visibility windows:", "Simultaneous", &simultaneous)?
    );
    println!();
    print!(
        "{}",
        reporter.labeled("Periods when neither window holds:", "Invisible", &invisible)?
    );

    if let Some(dir) = &cli.export_dir {
        for (label, window) in [(SIMULTANEOUS, &simultaneous), (INVISIBLE, &invisible)] {
            let path = dir.join(format!("{label}.{}", cli.export_format.extension()));
            let document = WindowDocument::new(label, Some(confinement), window, &calendar)?;
            vw_export::export_window(&path, &document)
                .with_context(|| format!("failed to export window to {}", path.display()))?;
        }
    }

    if let Some(path) = &cli.plot {
        let layout = TimelineLayout::new(
            &[(SIMULTANEOUS, &simultaneous), (INVISIBLE, &invisible)],
            Some(confinement),
        )?;
        let ticks = Calendar::new(session, CalendarPattern::parse(&cli.tick_format)?);
        render(&layout, path, (cli.width, cli.height), &ticks)
            .with_context(|| format!("failed to render timeline to {}", path.display()))?;
        println!("Timeline written to {}", path.display());
    }

    Ok(())
}

fn read_window(session: Option<&SpiceSession>, args: &[String]) -> anyhow::Result<Window> {
    let mut window = Window::new();
    for arg in args {
        let path = Path::new(arg);
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            let document = vw_export::read_window_document(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            window = window.union(&document.window()?);
            continue;
        }
        let Some((begin, end)) = arg.split_once("..") else {
            bail!("`{arg}` is neither a JSON document nor a BEGIN..END interval");
        };
        window.insert(parse_epoch(session, begin.trim())?, parse_epoch(session, end.trim())?)?;
    }
    Ok(window)
}
