use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::icon::IconTag;

/// Weather in the provider-independent shape consumed by presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature, °C.
    pub temp: f64,
    pub condition: IconTag,
    pub wind_speed: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Precipitation, mm.
    pub precipitation: f64,
    /// Apparent temperature, °C.
    pub feels_like: f64,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Local time of the forecast location.
    pub time: DateTime<FixedOffset>,
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max: f64,
    pub min: f64,
    pub condition: IconTag,
    /// Precipitation sum, mm.
    pub precip: f64,
}

/// A geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResult {
    pub id: u64,
    pub name: String,
    pub country: String,
    /// State or region, when the provider knows it.
    pub admin1: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityResult {
    /// "Paris, Île-de-France, France" style label.
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(admin1) = self.admin1.as_deref().filter(|a| !a.is_empty()) {
            parts.push(admin1);
        }
        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }
        parts.join(", ")
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(admin1: Option<&str>, country: &str) -> CityResult {
        CityResult {
            id: 2988507,
            name: "Paris".into(),
            country: country.into(),
            admin1: admin1.map(str::to_string),
            latitude: 48.85341,
            longitude: 2.3488,
        }
    }

    #[test]
    fn label_includes_region_when_present() {
        assert_eq!(
            city(Some("Île-de-France"), "France").label(),
            "Paris, Île-de-France, France"
        );
    }

    #[test]
    fn label_skips_missing_parts() {
        assert_eq!(city(None, "France").label(), "Paris, France");
        assert_eq!(city(Some(""), "").label(), "Paris");
    }
}
