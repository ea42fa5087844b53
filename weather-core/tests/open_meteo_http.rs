//! Open-Meteo provider against a mock HTTP server.

use std::time::Duration;

use weather_core::{IconTag, OpenMeteoProvider, WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_payload(weather_code: i32, is_day: u8) -> serde_json::Value {
    serde_json::json!({
        "latitude": 51.5,
        "longitude": -0.12,
        "utc_offset_seconds": 0,
        "timezone": "Europe/London",
        "current": {
            "time": "2025-03-01T12:00",
            "temperature_2m": 9.4,
            "relative_humidity_2m": 76,
            "apparent_temperature": 7.1,
            "is_day": is_day,
            "precipitation": 0.0,
            "rain": 0.0,
            "showers": 0.0,
            "snowfall": 0.0,
            "weather_code": weather_code,
            "cloud_cover": 12,
            "wind_speed_10m": 11.2,
            "wind_direction_10m": 250
        },
        "hourly": {
            "time": ["2025-03-01T12:00", "2025-03-01T13:00", "2025-03-01T14:00"],
            "temperature_2m": [9.4, 9.9, 10.3],
            "weather_code": [0, 1, 2],
            "precipitation_probability": [0, 0, 5]
        },
        "daily": {
            "time": ["2025-03-01", "2025-03-02", "2025-03-03", "2025-03-04",
                     "2025-03-05", "2025-03-06", "2025-03-07"],
            "weather_code": [0, 3, 61, 95, 71, 45, 2],
            "temperature_2m_max": [11.0, 10.2, 9.8, 12.1, 4.0, 8.5, 10.0],
            "temperature_2m_min": [3.2, 4.0, 5.1, 6.3, -1.0, 2.2, 3.0],
            "sunrise": ["2025-03-01T06:46", "2025-03-02T06:44", "2025-03-03T06:42",
                        "2025-03-04T06:40", "2025-03-05T06:37", "2025-03-06T06:35",
                        "2025-03-07T06:33"],
            "sunset": ["2025-03-01T17:44", "2025-03-02T17:46", "2025-03-03T17:48",
                       "2025-03-04T17:50", "2025-03-05T17:51", "2025-03-06T17:53",
                       "2025-03-07T17:55"],
            "precipitation_sum": [0.0, 0.2, 6.4, 12.0, 3.1, 0.0, 0.0]
        }
    })
}

fn provider(server: &MockServer) -> OpenMeteoProvider {
    OpenMeteoProvider::builder()
        .forecast_url(format!("{}/v1/forecast", server.uri()))
        .geocoding_url(format!("{}/v1/search", server.uri()))
        .build()
        .unwrap()
}

async fn mount_forecast(server: &MockServer, weather_code: i32, is_day: u8) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(weather_code, is_day)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn forecast_request_carries_expected_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "51.5074"))
        .and(query_param("longitude", "-0.1278"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,rain,showers,snowfall,weather_code,cloud_cover,wind_speed_10m,wind_direction_10m",
        ))
        .and(query_param("hourly", "temperature_2m,weather_code,precipitation_probability"))
        .and(query_param(
            "daily",
            "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_sum",
        ))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(0, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let weather = provider(&server).get_weather(51.5074, -0.1278).await.unwrap();

    assert_eq!(weather.daily.len(), 7);
    assert_eq!(weather.daily[3].condition, IconTag::CloudLightning);
    assert_eq!(weather.daily[4].condition, IconTag::CloudRain);
}

#[tokio::test]
async fn clear_day_maps_to_sun() {
    let server = MockServer::start().await;
    mount_forecast(&server, 0, 1).await;

    let weather = provider(&server).get_weather(51.5074, -0.1278).await.unwrap();

    assert_eq!(weather.current.condition, IconTag::Sun);
    assert!(weather.current.is_day);
    assert_eq!(weather.current.temp, 9.4);
    assert_eq!(weather.current.feels_like, 7.1);
    assert_eq!(weather.current.humidity, 76.0);
}

#[tokio::test]
async fn clear_night_maps_to_moon() {
    let server = MockServer::start().await;
    mount_forecast(&server, 0, 0).await;

    let weather = provider(&server).get_weather(51.5074, -0.1278).await.unwrap();

    assert_eq!(weather.current.condition, IconTag::Moon);
    assert!(!weather.current.is_day);
}

#[tokio::test]
async fn past_hourly_series_falls_back_to_start() {
    let server = MockServer::start().await;
    mount_forecast(&server, 2, 1).await;

    let weather = provider(&server).get_weather(51.5074, -0.1278).await.unwrap();

    assert_eq!(weather.hourly.len(), 3);
    assert_eq!(weather.hourly[0].temp, 9.4);
}

#[tokio::test]
async fn slow_forecast_yields_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_payload(0, 1))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let provider = OpenMeteoProvider::builder()
        .forecast_url(format!("{}/v1/forecast", server.uri()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = provider.get_weather(51.5074, -0.1278).await.unwrap_err();
    assert!(matches!(err, WeatherError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn forecast_404_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such place"))
        .mount(&server)
        .await;

    let err = provider(&server).get_weather(0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn forecast_server_error_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": true, "reason": "Latitude must be in range"})),
        )
        .mount(&server)
        .await;

    let err = provider(&server).get_weather(123.0, 0.0).await.unwrap_err();
    match err {
        WeatherError::Http { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("Latitude must be in range"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_forecast_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).get_weather(0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn search_city_sends_geocoding_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "5"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "id": 2988507,
                    "name": "Paris",
                    "latitude": 48.85341,
                    "longitude": 2.3488,
                    "country": "France",
                    "admin1": "Île-de-France"
                }
            ],
            "generationtime_ms": 0.9
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cities = provider(&server).search_city("Paris").await.unwrap();

    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].id, 2988507);
    assert_eq!(cities[0].country, "France");
    assert_eq!(cities[0].label(), "Paris, Île-de-France, France");
}

#[tokio::test]
async fn search_city_without_results_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.4
        })))
        .mount(&server)
        .await;

    let cities = provider(&server).search_city("Paris").await.unwrap();
    assert!(cities.is_empty());
}

#[tokio::test]
async fn search_city_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let provider = OpenMeteoProvider::builder()
        .geocoding_url(format!("{}/v1/search", server.uri()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = provider.search_city("Paris").await.unwrap_err();
    assert!(err.is_timeout());
}
