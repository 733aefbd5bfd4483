//! Ground-station view periods of a target, optionally with occultations by a
//! blocking body removed (one result per blocker shape model).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use visibility_windows::scenario::{ScenarioArgs, VisibilityArgs};
use vw_core::Window;
use vw_core::time::{CalendarPattern, EpochFormatter};
use vw_ephem_spice::SpiceSession;
use vw_export::WindowDocument;
use vw_finder::{SearchSettings, VisibilitySearch};
use vw_report::{Banner, Reporter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find when a target is above a station's elevation limit and not occulted"
)]
struct Cli {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(flatten)]
    visibility: VisibilityArgs,

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
        .visibility
        .resolve(scenario.as_ref().and_then(|s| s.visibility.as_ref()))?;
    let pattern = CalendarPattern::parse(&run.time_format)?;

    let session = SpiceSession::open(&run.meta_kernel)?;
    let calendar = session.calendar(pattern);
    let confinement = vw_finder::confinement(Some(&session), &run.window)?;
    let settings = SearchSettings::from(&run.window);

    let mut banner = Banner::new("Inputs for target visibility search:")
        .row("Target", &config.target)
        .row("Observation surface location", &config.station)
        .row("Observer's reference frame", &config.station_frame);
    if let Some(occultation) = &config.occultation {
        banner = banner
            .row("Blocking body", &occultation.blocker)
            .row("Blocker's reference frame", &occultation.blocker_frame);
    }
    let banner = banner
        .value("Elevation limit (degrees)", config.elevation_limit_deg)
        .row("Aberration correction", config.aberration)
        .value("Step size (seconds)", settings.step_seconds)
        .row("Start time", calendar.format_epoch(confinement.begin())?)
        .row("Stop time", calendar.format_epoch(confinement.end())?);
    print!("{banner}");

    let search = VisibilitySearch::from_config(&config, settings);
    let outcome = search
        .run(&session, &Window::from(confinement))
        .context("visibility search failed")?;

    let reporter = Reporter::new(&calendar);
    let exported = if outcome.by_shape.is_empty() {
        let heading = format!(
            "Visibility times of {} as seen from {}:",
            config.target, config.station
        );
        print!("{}", reporter.labeled(&heading, "Visibility", &outcome.view_periods)?);
        &outcome.view_periods
    } else {
        let shapes: Vec<&str> = outcome
            .by_shape
            .iter()
            .map(|shape| shape.shape.description())
            .collect();
        let heading = format!(
            "Visibility start and stop times of {} as seen from {}\nusing {} target shape models:",
            config.target,
            config.station,
            shapes.join(" and ")
        );
        let tagged: Vec<(&str, &Window)> = outcome
            .by_shape
            .iter()
            .map(|shape| (shape.shape.tag(), &shape.visible))
            .collect();
        print!("{}", reporter.paired(&heading, &tagged)?);
        &outcome.by_shape[0].visible
    };

    if let Some(path) = &cli.export {
        let document = WindowDocument::new("visibility", Some(confinement), exported, &calendar)?;
        vw_export::export_window(path, &document)
            .with_context(|| format!("failed to export window to {}", path.display()))?;
    }

    Ok(())
}
