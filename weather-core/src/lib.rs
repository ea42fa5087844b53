//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The provider contract and the Open-Meteo implementation
//! - Normalized weather / geocoding models and the icon classification
//! - The simulation overlay and the session state that drives a weather view
//! - Configuration handling and location tracking
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod service;
pub mod session;
pub mod simulation;

pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use icon::{IconTag, classify};
pub use location::{FixedLocation, LocationError, LocationSource, LocationTracker, NamedLocation};
pub use model::{
    CityResult, Coordinates, CurrentConditions, DailyForecast, HourlyPoint, NormalizedWeather,
};
pub use provider::{ProviderId, WeatherProvider, open_meteo::OpenMeteoProvider};
pub use service::WeatherService;
pub use session::{Theme, WeatherSession, theme_transition};
pub use simulation::{Scenario, apply_scenario};
