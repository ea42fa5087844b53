use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fmt::Write;

use weather_core::{CityResult, Coordinates, NormalizedWeather, Theme};

pub fn coordinate_label(coords: Coordinates) -> String {
    format!("{:.4}, {:.4}", coords.latitude, coords.longitude)
}

pub fn city_line(city: &CityResult) -> String {
    format!("{}  ({})", city.label(), coordinate_label(city.coordinates()))
}

pub fn theme_line(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "[theme] light",
        Theme::Dark => "[theme] dark",
    }
}

fn hour_label(time: &DateTime<FixedOffset>) -> String {
    time.format("%a %H:%M").to_string()
}

fn day_label(date: &NaiveDate) -> String {
    date.format("%a %d %b").to_string()
}

/// Full text report: current conditions, hourly window, daily outlook.
pub fn weather(title: &str, weather: &NormalizedWeather, simulated: bool) -> String {
    let mut out = String::new();
    let c = &weather.current;

    let _ = writeln!(out, "{title}{}", if simulated { "  (simulated)" } else { "" });
    let _ = writeln!(
        out,
        "Now: {:.1}°C, feels like {:.1}°C, {} ({})",
        c.temp,
        c.feels_like,
        c.condition,
        if c.is_day { "day" } else { "night" }
    );
    let _ = writeln!(
        out,
        "Wind {:.1} km/h | Humidity {:.0}% | Precipitation {:.1} mm",
        c.wind_speed, c.humidity, c.precipitation
    );

    if !weather.hourly.is_empty() {
        let _ = writeln!(out, "\nNext hours:");
        for point in &weather.hourly {
            let _ = writeln!(out, "  {}  {:>5.1}°C", hour_label(&point.time), point.temp);
        }
    }

    if !weather.daily.is_empty() {
        let _ = writeln!(out, "\nDaily:");
        for day in &weather.daily {
            let _ = writeln!(
                out,
                "  {}  {:<14} {:>5.1}° / {:>5.1}°  {:.1} mm",
                day_label(&day.date),
                day.condition.as_str(),
                day.max,
                day.min,
                day.precip
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use weather_core::{CurrentConditions, DailyForecast, HourlyPoint, IconTag};

    fn sample() -> NormalizedWeather {
        let offset = FixedOffset::east_opt(3600).unwrap();
        NormalizedWeather {
            current: CurrentConditions {
                temp: 9.44,
                condition: IconTag::Moon,
                wind_speed: 11.2,
                humidity: 76.0,
                precipitation: 0.0,
                feels_like: 7.1,
                is_day: false,
            },
            hourly: vec![HourlyPoint {
                time: offset.with_ymd_and_hms(2025, 3, 1, 22, 0, 0).unwrap(),
                temp: 8.9,
            }],
            daily: vec![DailyForecast {
                date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                max: 11.0,
                min: 3.2,
                condition: IconTag::CloudRain,
                precip: 6.4,
            }],
        }
    }

    #[test]
    fn report_contains_all_sections() {
        let text = weather("Berlin, Germany", &sample(), false);

        assert!(text.starts_with("Berlin, Germany\n"));
        assert!(text.contains("Now: 9.4°C, feels like 7.1°C, Moon (night)"));
        assert!(text.contains("Sat 22:00"));
        assert!(text.contains("Sat 01 Mar  CloudRain"));
        assert!(text.contains("6.4 mm"));
    }

    #[test]
    fn simulated_report_is_marked() {
        let text = weather("Berlin, Germany", &sample(), true);
        assert!(text.starts_with("Berlin, Germany  (simulated)"));
    }

    #[test]
    fn coordinates_use_four_decimals() {
        assert_eq!(coordinate_label(Coordinates::new(51.5074, -0.1278)), "51.5074, -0.1278");
    }
}
