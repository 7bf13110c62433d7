use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{
    AppState, Config, ConfiguredPosition, GeolocationResolver, HistoryStore, LocationQuery,
    OpenWeatherProvider, Units, WeatherQueryService,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and preferred units.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. `weather show New York`.
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show weather for the current position.
    Here {
        /// Latitude in decimal degrees; overrides the configured position.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees; overrides the configured position.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List recent searches.
    History {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let config = Config::load()?;
                lookup(&config, LocationQuery::city(city.join(" "))).await
            }
            Command::Here { lat, lon } => {
                let config = Config::load()?;
                let query = match (lat, lon) {
                    (Some(lat), Some(lon)) => LocationQuery::coordinates(lat, lon),
                    _ => {
                        let resolver = ConfiguredPosition::new(config.geolocation.clone());
                        let coords = resolver.locate().await?;
                        LocationQuery::Coordinates(coords)
                    }
                };
                lookup(&config, query).await
            }
            Command::History { clear } => {
                let config = Config::load()?;
                let mut state = open_state(&config)?;
                if clear {
                    state.clear_history();
                    println!("Search history cleared.");
                } else {
                    print!("{}", render::history(state.history()));
                }
                Ok(())
            }
        }
    }
}

fn open_state(config: &Config) -> Result<AppState> {
    let path = config.history_file_path()?;
    Ok(AppState::with_store(HistoryStore::new(path)))
}

async fn lookup(config: &Config, query: LocationQuery) -> Result<()> {
    let mut state = open_state(config)?;
    let service = WeatherQueryService::new(OpenWeatherProvider::from_config(config));

    tracing::debug!(%query, units = %config.units, "looking up weather");

    let report = service.lookup(&mut state, &query).await?;
    print!("{}", render::report(&report, config.units));
    Ok(())
}

fn configure() -> Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one free at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let start = Units::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or_default();
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    config.api_key = Some(api_key.to_string());
    config.units = units;
    config.save_to(&path)?;

    println!("Configuration saved to {}", path.display());
    Ok(())
}
