//! Eclipse, umbra and penumbra windows of a spacecraft behind a body.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use visibility_windows::scenario::{ScenarioArgs, ShadowArgs};
use vw_core::Window;
use vw_core::time::{CalendarPattern, EpochFormatter};
use vw_ephem_spice::SpiceSession;
use vw_export::WindowDocument;
use vw_finder::{SearchSettings, ShadowSearch};
use vw_report::{Banner, Reporter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find when a body blocks the light source as seen from a spacecraft"
)]
struct Cli {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(flatten)]
    shadow: ShadowArgs,

    /// Write the eclipse window (occultation type ANY) as CSV or JSON (`-` for stdout)
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let scenario = cli.scenario.load()?;
    let run = cli.scenario.resolve(scenario.as_ref())?;
    let config = cli
        .shadow
        .resolve(scenario.as_ref().and_then(|s| s.shadow.as_ref()))?;
    let pattern = CalendarPattern::parse(&run.time_format)?;

    let session = SpiceSession::open(&run.meta_kernel)?;
    let calendar = session.calendar(pattern);
    let confinement = vw_finder::confinement(Some(&session), &run.window)?;
    let settings = SearchSettings::from(&run.window);

    let banner = Banner::new("Inputs for shadow search:")
        .row("Spacecraft", &config.spacecraft)
        .row("Shadowing body", &config.body)
        .row("Body's reference frame", &config.body_frame)
        .row("Light source", &config.light_source)
        .row("Light source reference frame", &config.light_source_frame)
        .row("Aberration correction", config.aberration)
        .value("Step size (seconds)", settings.step_seconds)
        .row("Start time", calendar.format_epoch(confinement.begin())?)
        .row("Stop time", calendar.format_epoch(confinement.end())?);
    print!("{banner}");

    let search = ShadowSearch::from_config(&config, settings);
    let outcome = search
        .run(&session, &Window::from(confinement))
        .context("shadow search failed")?;

    let reporter = Reporter::new(&calendar);
    let heading = format!(
        "Eclipse (umbra or penumbra) start and stop times of {} as seen from {}\nusing ellipsoidal target shape models:",
        config.spacecraft, config.light_source
    );
    print!("{}", reporter.paired(&heading, &[("Ell", &outcome.eclipse)])?);
    let heading = format!("Umbra times of {} behind {}:", config.spacecraft, config.body);
    print!("{}", reporter.labeled(&heading, "Umbra", &outcome.umbra)?);
    let heading = format!(
        "Penumbra (partial shadow) times of {} behind {}:",
        config.spacecraft, config.body
    );
    print!("{}", reporter.labeled(&heading, "Penumbra", &outcome.penumbra)?);

    if let Some(path) = &cli.export {
        let document = WindowDocument::new("eclipse", Some(confinement), &outcome.eclipse, &calendar)?;
        vw_export::export_window(path, &document)
            .with_context(|| format!("failed to export window to {}", path.display()))?;
    }

    Ok(())
}
