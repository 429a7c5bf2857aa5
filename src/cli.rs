use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::fixture::DEFAULT_MAX_AIRCRAFT;

/// Query aircraft state vectors around a point and print a short report.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Center latitude in degrees, overriding the config
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Center longitude in degrees, overriding the config
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Query radius in kilometers, overriding the config
    #[arg(long)]
    pub radius_km: Option<f64>,

    /// Serve states from a canned response file instead of the live API
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Cap on how many fixture entries are kept per load
    #[arg(long, default_value_t = DEFAULT_MAX_AIRCRAFT)]
    pub max_aircraft: usize,

    #[arg(short, long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

impl Cli {
    /// Folds the command-line overrides into a loaded configuration; flags
    /// that were not given leave the configured values alone.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(latitude) = self.lat {
            config.location.latitude = latitude;
        }
        if let Some(longitude) = self.lon {
            config.location.longitude = longitude;
        }
        if let Some(radius_km) = self.radius_km {
            config.location.radius_km = radius_km;
        }
    }
}
