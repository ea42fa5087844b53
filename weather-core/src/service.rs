use std::sync::Arc;

use crate::{
    Config, WeatherError,
    icon::IconTag,
    model::{CityResult, NormalizedWeather},
    provider::{WeatherProvider, default_provider_from_config},
};

/// Single entry point to the active provider.
///
/// Which provider backs the service is decided once, at construction.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Build the service around the provider selected in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = default_provider_from_config(config)?;
        Ok(Self::new(Arc::from(provider)))
    }

    pub async fn get_weather(&self, lat: f64, lon: f64) -> Result<NormalizedWeather, WeatherError> {
        self.provider.get_weather(lat, lon).await
    }

    pub async fn search_city(&self, query: &str) -> Result<Vec<CityResult>, WeatherError> {
        self.provider.search_city(query).await
    }

    pub fn weather_code_to_icon(&self, code: i32, is_day: bool) -> IconTag {
        self.provider.weather_code_to_icon(code, is_day)
    }
}
