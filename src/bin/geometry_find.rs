//! Generic geometry finder: times when a coordinate of the observer-to-target
//! vector satisfies a relation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use visibility_windows::scenario::{CoordinateArgs, ScenarioArgs};
use vw_core::Window;
use vw_core::time::{CalendarPattern, EpochFormatter};
use vw_ephem_spice::SpiceSession;
use vw_export::WindowDocument;
use vw_finder::{CoordinateSearch, SearchSettings};
use vw_report::{Banner, Reporter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Coordinate relation search over a position vector")]
struct Cli {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(flatten)]
    coordinate: CoordinateArgs,

    /// Event noun used in the report labels
    #[arg(long, default_value = "Visibility")]
    noun: String,

    /// Write the resulting window as CSV or JSON (`-` for stdout)
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let scenario = cli.scenario.load()?;
    let run = cli.scenario.resolve(scenario.as_ref())?;
    let config = cli
        .coordinate
        .resolve(scenario.as_ref().and_then(|s| s.coordinate.as_ref()))?;
    let pattern = CalendarPattern::parse(&run.time_format)?;

    let session = SpiceSession::open(&run.meta_kernel)?;
    let calendar = session.calendar(pattern);
    let confinement = vw_finder::confinement(Some(&session), &run.window)?;
    let search = CoordinateSearch::from_config(&config, SearchSettings::from(&run.window));

    let mut banner = Banner::new("Inputs for coordinate search:")
        .row("Target", &search.target)
        .row("Observer", &search.observer)
        .row("Reference frame", &search.frame)
        .row("Coordinate system", search.coordinate_system)
        .row("Coordinate", &search.coordinate)
        .row("Relation", search.relation);
    if search.relation.uses_reference() {
        banner = banner.value("Reference value", search.reference_value);
    }
    if search.relation.uses_adjustment() {
        banner = banner.value("Adjustment value", search.adjustment);
    }
    let banner = banner
        .row("Aberration correction", search.aberration)
        .value("Step size (seconds)", search.settings.step_seconds)
        .row("Start time", calendar.format_epoch(confinement.begin())?)
        .row("Stop time", calendar.format_epoch(confinement.end())?);
    print!("{banner}");

    let window = search
        .run(&session, &Window::from(confinement))
        .context("coordinate search failed")?;

    let heading = format!(
        "{} times of {} as seen from {}:",
        cli.noun, search.target, search.observer
    );
    print!("{}", Reporter::new(&calendar).labeled(&heading, &cli.noun, &window)?);

    if let Some(path) = &cli.export {
        let document = WindowDocument::new(cli.noun.to_lowercase(), Some(confinement), &window, &calendar)?;
        vw_export::export_window(path, &document)
            .with_context(|| format!("failed to export window to {}", path.display()))?;
    }

    Ok(())
}
