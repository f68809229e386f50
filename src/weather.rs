//! Optional one-line weather block at the top of the digest (Open-Meteo).

use std::time::Duration;

use serde::Deserialize;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: u32,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// Both coordinates must be non-zero for a lookup.
pub fn has_location(latitude: f64, longitude: f64) -> bool {
    latitude != 0.0 && longitude != 0.0
}

pub fn fetch(latitude: f64, longitude: f64) -> anyhow::Result<CurrentWeather> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let response: ForecastResponse = client
        .get(FORECAST_URL)
        .query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current_weather", "true".to_string()),
        ])
        .send()?
        .error_for_status()?
        .json()?;
    Ok(response.current_weather)
}

/// `Weather: 12.3°C, wind 8.1 km/h, partly cloudy` plus a blank line.
pub fn render(weather: &CurrentWeather) -> String {
    format!(
        "Weather: {:.1}°C, wind {:.1} km/h, {}\n\n",
        weather.temperature,
        weather.windspeed,
        describe(weather.weathercode)
    )
}

/// WMO weather interpretation codes.
fn describe(code: u32) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        56 | 57 => "freezing drizzle",
        61 | 63 | 65 => "rain",
        66 | 67 => "freezing rain",
        71 | 73 | 75 | 77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95 => "thunderstorm",
        96 | 99 => "thunderstorm with hail",
        _ => "unknown conditions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_requires_both_coordinates() {
        assert!(!has_location(0.0, 0.0));
        assert!(!has_location(52.5, 0.0));
        assert!(has_location(52.5, 13.4));
    }

    #[test]
    fn parses_open_meteo_payload() {
        let body = r#"{"latitude":52.52,"longitude":13.42,
            "current_weather":{"temperature":12.34,"windspeed":8.06,"winddirection":250,"weathercode":2,"time":"2024-05-02T10:00"}}"#;
        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            render(&parsed.current_weather),
            "Weather: 12.3°C, wind 8.1 km/h, partly cloudy\n\n"
        );
    }

    #[test]
    fn unknown_codes_are_labelled() {
        assert_eq!(describe(42), "unknown conditions");
    }
}
