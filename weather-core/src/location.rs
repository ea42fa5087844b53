use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use crate::{
    model::{CityResult, Coordinates},
    session::LoadingGuard,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NamedLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

pub const DEFAULT_LOCATION_NAME: &str = "London";
pub const DEFAULT_LOCATION_COUNTRY: &str = "United Kingdom";
pub const DEFAULT_COORDINATES: Coordinates = Coordinates::new(51.5074, -0.1278);

pub fn default_location() -> NamedLocation {
    NamedLocation {
        name: DEFAULT_LOCATION_NAME.to_string(),
        country: DEFAULT_LOCATION_COUNTRY.to_string(),
        latitude: DEFAULT_COORDINATES.latitude,
        longitude: DEFAULT_COORDINATES.longitude,
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
}

/// Something that knows where the user is.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;

    /// The named place behind the position, for sources that know it.
    fn place(&self) -> Option<&NamedLocation> {
        None
    }
}

/// A position fixed up front, e.g. the home location from the config file.
#[derive(Debug, Clone)]
pub struct FixedLocation(pub NamedLocation);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0.coordinates())
    }

    fn place(&self) -> Option<&NamedLocation> {
        Some(&self.0)
    }
}

/// Tracks the location the user is looking at.
#[derive(Debug, Clone)]
pub struct LocationTracker {
    current: NamedLocation,
    loading: bool,
    error: Option<String>,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new(default_location())
    }
}

impl LocationTracker {
    pub fn new(initial: NamedLocation) -> Self {
        Self {
            current: initial,
            loading: false,
            error: None,
        }
    }

    pub fn current(&self) -> &NamedLocation {
        &self.current
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_location(&mut self, city: &CityResult) {
        self.current = NamedLocation {
            name: city.name.clone(),
            country: city.country.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
        };
    }

    /// Ask `source` for the user's position.
    ///
    /// Always yields usable coordinates: without a source, or when the source
    /// fails, the current location is returned instead.
    pub async fn resolve(&mut self, source: Option<&dyn LocationSource>) -> Coordinates {
        self.error = None;

        let Some(source) = source else {
            return self.current.coordinates();
        };

        let guard = LoadingGuard::start(&mut self.loading);
        let position = source.current_position().await;
        drop(guard);

        match position {
            Ok(coords) => {
                let name = source.place().map_or("Your Location", |p| p.name.as_str());
                let country = source
                    .place()
                    .map_or(self.current.country.as_str(), |p| p.country.as_str());
                self.current = NamedLocation {
                    name: name.to_string(),
                    country: country.to_string(),
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                };
                coords
            }
            Err(err) => {
                tracing::warn!(error = %err, fallback = %self.current.name, "geolocation failed");
                self.error = Some("Failed to get location".to_string());
                self.current.coordinates()
            }
        }
    }
}
