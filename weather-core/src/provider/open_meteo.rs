use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    WeatherError,
    icon::classify,
    model::{CityResult, CurrentConditions, DailyForecast, HourlyPoint, NormalizedWeather},
};

use super::{DEFAULT_TIMEOUT, WeatherProvider};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,\
precipitation,rain,showers,snowfall,weather_code,cloud_cover,wind_speed_10m,wind_direction_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation_probability";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_sum";
const FORECAST_DAYS: u8 = 7;
const GEOCODE_COUNT: u8 = 5;

/// Maximum number of hourly entries kept after windowing.
pub const HOURLY_WINDOW: usize = 24;

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    forecast_url: String,
    geocoding_url: String,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoProviderBuilder {
    forecast_url: String,
    geocoding_url: String,
    timeout: Duration,
}

impl Default for OpenMeteoProviderBuilder {
    fn default() -> Self {
        Self {
            forecast_url: FORECAST_URL.to_string(),
            geocoding_url: GEOCODING_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenMeteoProviderBuilder {
    pub fn forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    pub fn geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenMeteoProvider, WeatherError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(WeatherError::Transport)?;

        Ok(OpenMeteoProvider {
            http,
            forecast_url: self.forecast_url,
            geocoding_url: self.geocoding_url,
        })
    }
}

impl OpenMeteoProvider {
    /// Provider against the public endpoints with the default 10 second timeout.
    pub fn new() -> Result<Self, WeatherError> {
        Self::builder().build()
    }

    pub fn builder() -> OpenMeteoProviderBuilder {
        OpenMeteoProviderBuilder::default()
    }

    async fn execute(&self, request: RequestBuilder, endpoint: &'static str) -> Result<String, WeatherError> {
        let res = request.send().await.map_err(WeatherError::from_reqwest)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::from_reqwest)?;

        if !status.is_success() {
            return Err(WeatherError::Http {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        tracing::debug!(endpoint, %status, bytes = body.len(), "received response");
        Ok(body)
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<NormalizedWeather, WeatherError> {
        let query = ForecastQuery {
            latitude: lat,
            longitude: lon,
            current: CURRENT_FIELDS,
            hourly: HOURLY_FIELDS,
            daily: DAILY_FIELDS,
            timezone: "auto",
            forecast_days: FORECAST_DAYS,
        };

        let body = self
            .execute(self.http.get(&self.forecast_url).query(&query), "Open-Meteo forecast")
            .await
            .map_err(|err| match err {
                WeatherError::Http { status: 404, .. } => WeatherError::NotFound,
                other => other,
            })?;

        parse_forecast_response(&body, Utc::now())
    }

    async fn fetch_cities(&self, name: &str) -> Result<Vec<CityResult>, WeatherError> {
        let query = GeocodeQuery {
            name,
            count: GEOCODE_COUNT,
            language: "en",
            format: "json",
        };

        let body = self
            .execute(self.http.get(&self.geocoding_url).query(&query), "Open-Meteo geocoding")
            .await?;

        parse_geocode_response(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, lat: f64, lon: f64) -> Result<NormalizedWeather, WeatherError> {
        self.fetch_forecast(lat, lon).await.inspect_err(|err| {
            if err.is_timeout() {
                tracing::warn!(lat, lon, "forecast request timed out");
            } else {
                tracing::error!(lat, lon, error = %err, "error fetching weather data");
            }
        })
    }

    async fn search_city(&self, query: &str) -> Result<Vec<CityResult>, WeatherError> {
        self.fetch_cities(query).await.inspect_err(|err| {
            if err.is_timeout() {
                tracing::warn!(query, "geocoding request timed out");
            } else {
                tracing::error!(query, error = %err, "error searching city");
            }
        })
    }
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    current: &'a str,
    hourly: &'a str,
    daily: &'a str,
    timezone: &'a str,
    forecast_days: u8,
}

#[derive(Debug, Serialize)]
struct GeocodeQuery<'a> {
    name: &'a str,
    count: u8,
    language: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: OmCurrent,
    hourly: OmHourly,
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    is_day: u8,
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<i32>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    #[serde(default)]
    results: Option<Vec<OmGeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResult {
    id: u64,
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    latitude: f64,
    longitude: f64,
}

fn parse_forecast_response(body: &str, now: DateTime<Utc>) -> Result<NormalizedWeather, WeatherError> {
    let payload: OmForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::InvalidResponse(format!("forecast payload: {e}")))?;

    normalize(payload, now)
}

fn parse_geocode_response(body: &str) -> Result<Vec<CityResult>, WeatherError> {
    let payload: OmGeocodeResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::InvalidResponse(format!("geocode payload: {e}")))?;

    let cities = payload
        .results
        .unwrap_or_default()
        .into_iter()
        .map(|r| CityResult {
            id: r.id,
            name: r.name,
            country: r.country.unwrap_or_default(),
            admin1: r.admin1,
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect();

    Ok(cities)
}

fn normalize(payload: OmForecastResponse, now: DateTime<Utc>) -> Result<NormalizedWeather, WeatherError> {
    let offset = FixedOffset::east_opt(payload.utc_offset_seconds).ok_or_else(|| {
        WeatherError::InvalidResponse(format!(
            "forecast payload: utc_offset_seconds out of range: {}",
            payload.utc_offset_seconds
        ))
    })?;

    let is_day = payload.current.is_day != 0;
    let current = CurrentConditions {
        temp: payload.current.temperature_2m,
        condition: classify(payload.current.weather_code, is_day),
        wind_speed: payload.current.wind_speed_10m,
        humidity: payload.current.relative_humidity_2m,
        precipitation: payload.current.precipitation,
        feels_like: payload.current.apparent_temperature,
        is_day,
    };

    Ok(NormalizedWeather {
        current,
        hourly: normalize_hourly(payload.hourly, offset, now)?,
        daily: normalize_daily(payload.daily)?,
    })
}

fn normalize_hourly(
    hourly: OmHourly,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<Vec<HourlyPoint>, WeatherError> {
    if hourly.temperature_2m.len() != hourly.time.len() {
        return Err(WeatherError::InvalidResponse(
            "forecast payload: hourly arrays length mismatch".to_string(),
        ));
    }

    let times = hourly
        .time
        .iter()
        .map(|raw| parse_local_time(raw, offset))
        .collect::<Result<Vec<_>, _>>()?;

    let start = window_start(&times, now);

    // Hours the provider has no temperature for are dropped from the window.
    let points = times
        .into_iter()
        .zip(hourly.temperature_2m)
        .skip(start)
        .take(HOURLY_WINDOW)
        .filter_map(|(time, temp)| temp.map(|temp| HourlyPoint { time, temp }))
        .collect();

    Ok(points)
}

/// Index of the first timestamp at or after `now`, or 0 when every entry is in the past.
fn window_start(times: &[DateTime<FixedOffset>], now: DateTime<Utc>) -> usize {
    times
        .iter()
        .position(|t| t.with_timezone(&Utc) >= now)
        .unwrap_or(0)
}

fn normalize_daily(daily: OmDaily) -> Result<Vec<DailyForecast>, WeatherError> {
    let length = daily.time.len();

    if daily.weather_code.len() != length
        || daily.temperature_2m_max.len() != length
        || daily.temperature_2m_min.len() != length
        || daily.precipitation_sum.len() != length
    {
        return Err(WeatherError::InvalidResponse(
            "forecast payload: daily arrays length mismatch".to_string(),
        ));
    }

    let mut days = Vec::with_capacity(length);
    for index in 0..length {
        let date = NaiveDate::parse_from_str(daily.time[index].trim(), "%Y-%m-%d").map_err(|e| {
            WeatherError::InvalidResponse(format!(
                "forecast payload: bad daily date '{}': {e}",
                daily.time[index]
            ))
        })?;

        // Daily summaries have no day/night split, so they always use the daytime icon.
        days.push(DailyForecast {
            date,
            max: daily.temperature_2m_max[index],
            min: daily.temperature_2m_min[index],
            condition: classify(daily.weather_code[index], true),
            precip: daily.precipitation_sum[index].unwrap_or(0.0),
        });
    }

    Ok(days)
}

/// Open-Meteo returns local wall-clock times ("2025-03-01T14:00") when `timezone=auto`.
///
/// The whole series shares the response's current UTC offset.
fn parse_local_time(raw: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, WeatherError> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| {
            WeatherError::InvalidResponse(format!("forecast payload: bad hourly time '{raw}': {e}"))
        })?;

    let utc = naive - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
    Ok(offset.from_utc_datetime(&utc))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
