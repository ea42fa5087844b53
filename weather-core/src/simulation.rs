//! Synthetic conditions layered over real forecasts.

use serde::{Deserialize, Serialize};

use crate::{
    icon::IconTag,
    model::{CurrentConditions, NormalizedWeather},
};

pub const SIMULATED_TEMP: f64 = 20.0;
pub const DEFAULT_HUMIDITY: f64 = 60.0;
pub const DEFAULT_FEELS_LIKE: f64 = 22.0;
pub const DEFAULT_WIND_SPEED: f64 = 10.0;
pub const DEFAULT_PRECIPITATION: f64 = 0.0;

/// Caller-supplied override for the current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub condition: IconTag,
    pub is_day: bool,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl Scenario {
    pub fn new(condition: IconTag, is_day: bool) -> Self {
        Self {
            condition,
            is_day,
            precipitation: None,
            wind_speed: None,
        }
    }

    pub fn with_precipitation(mut self, mm: f64) -> Self {
        self.precipitation = Some(mm);
        self
    }

    pub fn with_wind_speed(mut self, speed: f64) -> Self {
        self.wind_speed = Some(speed);
        self
    }
}

/// Derive the weather to display from the real value and an optional scenario.
///
/// With no scenario the real value is returned unchanged. With a scenario only
/// `current` is replaced; `hourly` and `daily` are copied from `base` (or empty
/// when nothing has been fetched yet). `base` itself is never modified.
pub fn apply_scenario(
    base: Option<&NormalizedWeather>,
    scenario: Option<&Scenario>,
) -> Option<NormalizedWeather> {
    let Some(scenario) = scenario else {
        return base.cloned();
    };

    let base_current = base.map(|b| &b.current);

    let current = CurrentConditions {
        temp: SIMULATED_TEMP,
        condition: scenario.condition,
        is_day: scenario.is_day,
        precipitation: scenario.precipitation.unwrap_or(DEFAULT_PRECIPITATION),
        wind_speed: scenario.wind_speed.unwrap_or(DEFAULT_WIND_SPEED),
        humidity: base_current.map_or(DEFAULT_HUMIDITY, |c| c.humidity),
        feels_like: base_current.map_or(DEFAULT_FEELS_LIKE, |c| c.feels_like),
    };

    Some(NormalizedWeather {
        current,
        hourly: base.map(|b| b.hourly.clone()).unwrap_or_default(),
        daily: base.map(|b| b.daily.clone()).unwrap_or_default(),
    })
}
