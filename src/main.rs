use clap::Parser;
use color_eyre::Result;
use skyring::api::{OpenSkyClient, StateSource};
use skyring::cli::Cli;
use skyring::config::Config;
use skyring::fixture::FixtureSource;
use skyring::{logging, report};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Instrumentation and safety
    logging::initialize_logging(cli.log_level);
    color_eyre::install()?;

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    // Command-line overrides beat the config file
    cli.apply_to(&mut config);
    let center = config.center()?;
    let radius_km = config.location.radius_km;

    let source: Box<dyn StateSource> = match &cli.fixture {
        Some(path) => {
            info!(path = %path.display(), "serving canned states instead of the live API");
            Box::new(FixtureSource::with_limit(path, cli.max_aircraft))
        }
        None => Box::new(OpenSkyClient::with_base_url(
            config.api.base_url.clone(),
            config.credentials(),
            config.timeout(),
        )?),
    };

    info!(%center, radius_km, "querying aircraft states");
    let snapshot = source.fetch_states_in_range(center, radius_km)?;
    print!("{}", report::render_report(&snapshot));

    Ok(())
}
