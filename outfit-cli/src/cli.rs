use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use outfit_core::{Config, Location, ProviderId, provider};

use crate::output::{self, Palette};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "outfit",
    version,
    about = "Pick clothes for the day from the weather forecast",
    long_about = "Pick clothes for the day from the weather forecast.\n\n\
                  Run without a subcommand to get a recommendation for the configured location."
)]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Forecast provider for this run, e.g. "metno" or "openweather".
    #[arg(long, value_parser = parse_provider)]
    pub provider: Option<ProviderId>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the location to fetch the forecast for.
    Set {
        /// Latitude in degrees, -90..=90.
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in degrees, -180..=180.
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Altitude in meters above sea level.
        #[arg(allow_negative_numbers = true)]
        altitude: Option<i32>,
    },

    /// Configure a provider and make it the default.
    Configure {
        /// Provider short name, e.g. "metno" or "openweather".
        #[arg(value_parser = parse_provider)]
        provider: ProviderId,
    },
}

fn parse_provider(value: &str) -> Result<ProviderId, String> {
    ProviderId::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        tracing::debug!(path = %config_path.display(), "using config file");
        let mut config = Config::load_from(&config_path)?;

        match self.command {
            None => {
                let location = config.location()?;
                let forecast = match self.provider {
                    Some(id) => provider::provider_from_config(id, &config)?,
                    None => provider::default_provider_from_config(&config)?,
                };

                let recommendation = outfit_core::recommend(forecast.as_ref(), &location).await?;
                print!("{}", output::render(&recommendation, Palette::detect()));
            }
            Some(Command::Set {
                latitude,
                longitude,
                altitude,
            }) => {
                let location =
                    Location::new(latitude, longitude, altitude).map_err(outfit_core::Error::from)?;
                config.set_location(location);
                config.save_to(&config_path)?;

                println!("Location saved to {}", config_path.display());
            }
            Some(Command::Configure { provider }) => {
                if provider.requires_api_key() {
                    let api_key = inquire::Password::new(&format!("{provider} API key:"))
                        .without_confirmation()
                        .with_display_mode(inquire::PasswordDisplayMode::Masked)
                        .prompt()
                        .context("Failed to read API key")?;

                    let api_key = api_key.trim();
                    if api_key.is_empty() {
                        anyhow::bail!("API key must not be empty");
                    }
                    config.upsert_provider_api_key(provider, api_key.to_string());
                }
                config.set_default_provider(provider);
                config.save_to(&config_path)?;

                println!("Default provider set to {provider}");
            }
        }

        Ok(())
    }
}
