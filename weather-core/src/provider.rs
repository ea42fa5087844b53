use crate::{
    Config, WeatherError,
    icon::{self, IconTag},
    model::{CityResult, NormalizedWeather},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod open_meteo;

/// Request timeout applied when the configuration does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "open-meteo",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "open-meteo" | "openmeteo" | "open_meteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: open-meteo."
            )),
        }
    }
}

/// A source of forecasts and geocoding results.
///
/// Every provider normalizes its own payloads into [`NormalizedWeather`] and
/// [`CityResult`], so callers never see provider-specific shapes.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, lat: f64, lon: f64) -> Result<NormalizedWeather, WeatherError>;

    /// Geocode a free-text place name. No matches is an empty vector, not an error.
    async fn search_city(&self, query: &str) -> Result<Vec<CityResult>, WeatherError>;

    /// Map a provider weather code to an icon. Defaults to the WMO table.
    fn weather_code_to_icon(&self, code: i32, is_day: bool) -> IconTag {
        icon::classify(code, is_day)
    }
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let settings = config.provider_config(id).cloned().unwrap_or_default();

    let timeout = settings
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    if timeout.is_zero() {
        return Err(anyhow::anyhow!(
            "Invalid timeout for provider '{id}': must be at least 1 second.\n\
                 Hint: run `weather configure` or edit `timeout_secs` in the config file."
        ));
    }

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenMeteo => {
            let mut builder = OpenMeteoProvider::builder().timeout(timeout);
            if let Some(url) = settings.forecast_url {
                builder = builder.forecast_url(url);
            }
            if let Some(url) = settings.geocoding_url {
                builder = builder.geocoding_url(url);
            }
            Box::new(builder.build()?)
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}
