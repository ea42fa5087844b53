use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};

use weather_core::{
    CityResult, Config, Coordinates, IconTag, LocationSource, LocationTracker, NamedLocation,
    ProviderConfig, ProviderId, Scenario, WeatherService, WeatherSession,
    location::default_location, provider::DEFAULT_TIMEOUT,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Log provider requests and responses to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the provider, request timeout and home location.
    Configure,

    /// Show current conditions, the next 24 hours and the 7-day forecast.
    Show {
        /// City to look up. Without it the home (or default) location is used.
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Take the first geocoding match instead of asking.
        #[arg(long)]
        first: bool,

        /// Preview a condition instead of the real one: sun, moon, cloud, cloud-rain, cloud-lightning.
        #[arg(long, value_parser = parse_condition)]
        simulate: Option<IconTag>,

        /// Simulate night time.
        #[arg(long, requires = "simulate")]
        night: bool,

        /// Simulated precipitation, mm.
        #[arg(long, requires = "simulate")]
        precip: Option<f64>,

        /// Simulated wind speed, km/h.
        #[arg(long, requires = "simulate")]
        wind: Option<f64>,
    },

    /// Search for a city by name.
    Search {
        query: String,
    },
}

fn parse_condition(value: &str) -> Result<IconTag, String> {
    IconTag::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure().await,
            Command::Search { query } => search(&query).await,
            Command::Show {
                city,
                lat,
                lon,
                first,
                simulate,
                night,
                precip,
                wind,
            } => {
                let scenario = simulate.map(|condition| Scenario {
                    condition,
                    is_day: !night,
                    precipitation: precip,
                    wind_speed: wind,
                });
                let coords = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));

                show(city.as_deref(), coords, first, scenario).await
            }
        }
    }
}

async fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let names: Vec<&str> = ProviderId::all().iter().map(|id| id.as_str()).collect();
    let provider = Select::new("Weather provider:", names).prompt()?;
    let provider = ProviderId::try_from(provider)?;

    let current = config.provider_config(provider).cloned().unwrap_or_default();
    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(current.timeout_secs.unwrap_or(DEFAULT_TIMEOUT.as_secs()))
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.upsert_provider(
        provider,
        ProviderConfig {
            timeout_secs: Some(timeout_secs),
            ..current
        },
    );
    config.set_default_provider(provider);

    if Confirm::new("Set a home location?").with_default(config.home.is_none()).prompt()? {
        let service = WeatherService::from_config(&config)?;
        let query = Text::new("City:").prompt()?;
        let cities = service
            .search_city(&query)
            .await
            .with_context(|| format!("Failed to search for '{query}'"))?;
        let city = pick_city(&query, cities, false)?;

        config.set_home(NamedLocation {
            name: city.name.clone(),
            country: city.country.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
        });
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;

    let cities = service
        .search_city(query)
        .await
        .with_context(|| format!("Failed to search for '{query}'"))?;

    if cities.is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }

    for city in &cities {
        println!("{}", render::city_line(city));
    }
    Ok(())
}

async fn show(
    city: Option<&str>,
    coords: Option<Coordinates>,
    first: bool,
    scenario: Option<Scenario>,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;
    let mut tracker = LocationTracker::new(config.home.clone().unwrap_or_else(default_location));

    let (title, coords) = match (city, coords) {
        (_, Some(coords)) => (render::coordinate_label(coords), coords),
        (Some(query), None) => {
            let cities = service
                .search_city(query)
                .await
                .with_context(|| format!("Failed to search for '{query}'"))?;
            let city = pick_city(query, cities, first)?;
            tracker.set_location(&city);
            (city.label(), city.coordinates())
        }
        (None, None) => {
            let home = config.home_source();
            let coords = tracker
                .resolve(home.as_ref().map(|h| h as &dyn LocationSource))
                .await;
            let current = tracker.current();
            (format!("{}, {}", current.name, current.country), coords)
        }
    };
    tracing::debug!(
        lat = coords.latitude,
        lon = coords.longitude,
        location = %title,
        "resolved forecast location"
    );

    let mut session = WeatherSession::new(service)
        .on_theme_change(|theme| println!("{}", render::theme_line(theme)));

    if let Err(err) = session.fetch_weather(coords.latitude, coords.longitude).await {
        let message = session.error().unwrap_or(err.user_message()).to_string();
        return Err(anyhow::Error::new(err).context(message));
    }

    if scenario.is_some() {
        session.simulate(scenario);
    }

    let weather = session
        .weather()
        .ok_or_else(|| anyhow!("No weather data available for {title}"))?;

    print!("{}", render::weather(&title, weather, session.is_simulating()));
    Ok(())
}

fn pick_city(query: &str, mut cities: Vec<CityResult>, first: bool) -> anyhow::Result<CityResult> {
    if cities.is_empty() {
        bail!("No matches for '{query}'. Try a different spelling or a larger nearby city.");
    }

    if first || cities.len() == 1 {
        return Ok(cities.swap_remove(0));
    }

    let labels: Vec<String> = cities.iter().map(CityResult::label).collect();
    let choice = Select::new("Several places match, pick one:", labels).raw_prompt()?;
    Ok(cities.swap_remove(choice.index))
}
