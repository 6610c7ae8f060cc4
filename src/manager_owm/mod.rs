pub mod errors;
pub mod models;

use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use reqwest::{Client, StatusCode};

use crate::aggregation::capitalize;
use crate::manager_dashboard::models::{CityWeather, CurrentWeather};
use crate::manager_owm::errors::OwmError;
use crate::manager_owm::models::{
    AirPollutionResponse, AirSample, CurrentResponse, ForecastResponse, ForecastSample, GeoEntry,
};

/// Struct for managing weather, geocoding and air pollution data
/// produced by the OpenWeatherMap API family
#[derive(Clone)]
pub struct OWM {
    client: Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

impl OWM {
    /// Returns an OWM struct ready for fetching data from OpenWeatherMap
    ///
    /// # Arguments
    ///
    /// * 'api_key' - OpenWeatherMap API key
    /// * 'base_url' - base url for the data endpoints
    /// * 'geo_url' - base url for the geocoding endpoints
    /// * 'timeout_secs' - connect/read timeout for upstream requests
    pub fn new(api_key: &str, base_url: &str, geo_url: &str, timeout_secs: u64) -> Result<OWM, OwmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            geo_url: geo_url.trim_end_matches('/').to_string(),
        })
    }

    /// Retrieves and formats the current weather for the given city
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to look up
    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, OwmError> {
        let url = format!("{}/weather", self.base_url);
        let query = [
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
            ("lang", "en"),
        ];

        let json = self.fetch(&url, &query, city).await?;
        let data: CurrentResponse = serde_json::from_str(&json)?;

        format_current(data)
    }

    /// Retrieves the weather summary for one peer city shown in the
    /// "other cities" section of the dashboard
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to look up
    pub async fn city_weather(&self, city: &str) -> Result<CityWeather, OwmError> {
        let current = self.current_weather(city).await?;

        Ok(CityWeather {
            city: current.city,
            country: current.country,
            temperature: current.temperature,
            description: current.description,
            icon: current.icon,
        })
    }

    /// Retrieves the 3-hour granularity forecast feed for the given city
    /// as a validated sample series, sorted ascending by timestamp.
    /// Entries with a non-finite temperature or without a weather condition
    /// are skipped.
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to look up
    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastSample>, OwmError> {
        let url = format!("{}/forecast", self.base_url);
        let query = [
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
            ("cnt", "40"),
        ];

        let json = self.fetch(&url, &query, city).await?;
        let data: ForecastResponse = serde_json::from_str(&json)?;

        Ok(forecast_samples(data))
    }

    /// Resolves the given city name to coordinates using the first
    /// geocoding hit
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to resolve
    pub async fn geocode(&self, city: &str) -> Result<(f64, f64), OwmError> {
        let url = format!("{}/direct", self.geo_url);
        let query = [("q", city), ("appid", self.api_key.as_str()), ("limit", "1")];

        let json = self.fetch(&url, &query, city).await?;
        let data: Vec<GeoEntry> = serde_json::from_str(&json)?;

        match data.into_iter().next() {
            Some(hit) => Ok((hit.lat, hit.lon)),
            None => Err(OwmError::NotFound(format!("no coordinates found for {}", city))),
        }
    }

    /// Retrieves the air pollution forecast feed for the given coordinates
    /// as a validated sample series, sorted ascending by timestamp.
    /// The AQI index is clamped into 1-5 and concentrations to non-negative
    /// values before they reach aggregation.
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'lon' - longitude of the location
    pub async fn air_pollution_forecast(&self, lat: f64, lon: f64) -> Result<Vec<AirSample>, OwmError> {
        let url = format!("{}/air_pollution/forecast", self.base_url);
        let lat = format!("{:0.4}", lat);
        let lon = format!("{:0.4}", lon);
        let query = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
        ];

        let json = self.fetch(&url, &query, "air pollution forecast").await?;
        let data: AirPollutionResponse = serde_json::from_str(&json)?;

        Ok(air_samples(data))
    }

    /// Makes one GET request and returns the response body, translating
    /// non-success statuses into the error taxonomy
    async fn fetch(&self, url: &str, query: &[(&str, &str)], what: &str) -> Result<String, OwmError> {
        let req = self.client
            .get(url)
            .query(query)
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(classify_status(status, what));
        }

        Ok(req.text().await?)
    }
}

/// Maps an upstream HTTP status to the error taxonomy
///
/// # Arguments
///
/// * 'status' - the non-success status returned by OpenWeatherMap
/// * 'what' - what was being fetched, used in the not found message
fn classify_status(status: StatusCode, what: &str) -> OwmError {
    match status.as_u16() {
        404 => OwmError::NotFound(format!("\"{}\" not found", what)),
        401 | 403 => OwmError::Auth,
        429 => OwmError::RateLimit,
        _ => OwmError::Upstream(format!("error while fetching from OpenWeatherMap: {}", status)),
    }
}

fn format_current(data: CurrentResponse) -> Result<CurrentWeather, OwmError> {
    let condition = data.weather.into_iter().next()
        .ok_or_else(|| OwmError::Document("missing weather condition".to_string()))?;

    let visibility = match data.visibility {
        Some(meters) => format!("{:.1} km", meters as f64 / 1000.0),
        None => "N/A".to_string(),
    };

    Ok(CurrentWeather {
        city: data.name,
        country: data.sys.country,
        temperature: data.main.temp.round() as i32,
        feels_like: data.main.feels_like.round() as i32,
        description: capitalize(&condition.description),
        icon: condition.icon,
        humidity: data.main.humidity,
        wind_speed: (data.wind.speed * 3.6).round() as i32,
        pressure: data.main.pressure,
        visibility,
        sunrise: format_clock(data.sys.sunrise, data.timezone),
        sunset: format_clock(data.sys.sunset, data.timezone),
        date: format_city_time(data.dt, data.timezone, "%A, %B %d, %Y"),
        time: format_city_time(data.dt, data.timezone, "%I:%M %p"),
    })
}

fn forecast_samples(data: ForecastResponse) -> Vec<ForecastSample> {
    let mut samples: Vec<ForecastSample> = Vec::new();

    for entry in data.list {
        if !entry.main.temp.is_finite() {
            continue;
        }
        let timestamp = match DateTime::from_timestamp(entry.dt, 0) {
            Some(t) => t,
            None => continue,
        };
        let condition = match entry.weather.into_iter().next() {
            Some(c) => c,
            None => continue,
        };

        samples.push(ForecastSample {
            timestamp,
            date: timestamp.with_timezone(&Local).date_naive(),
            temp: entry.main.temp,
            icon: condition.icon,
            description: condition.description,
        });
    }

    // The feed is normally already ascending, but grouping relies on it
    samples.sort_by_key(|s| s.timestamp);
    samples
}

fn air_samples(data: AirPollutionResponse) -> Vec<AirSample> {
    let mut samples: Vec<AirSample> = Vec::new();

    for entry in data.list {
        let timestamp = match DateTime::from_timestamp(entry.dt, 0) {
            Some(t) => t,
            None => continue,
        };

        samples.push(AirSample {
            timestamp,
            date: timestamp.with_timezone(&Local).date_naive(),
            aqi: entry.main.aqi.clamp(1, 5) as u8,
            pm2_5: entry.components.pm2_5.max(0.0),
            pm10: entry.components.pm10.max(0.0),
            co: entry.components.co.max(0.0),
            no2: entry.components.no2.max(0.0),
            o3: entry.components.o3.max(0.0),
            so2: entry.components.so2.max(0.0),
        });
    }

    samples.sort_by_key(|s| s.timestamp);
    samples
}

/// Formats an epoch second as "H:MM AM/PM" in the city's local time
///
/// # Arguments
///
/// * 'timestamp' - epoch seconds in UTC
/// * 'offset_secs' - the city's UTC offset reported by the API
fn format_clock(timestamp: i64, offset_secs: i32) -> String {
    let shifted = match DateTime::from_timestamp(timestamp + offset_secs as i64, 0) {
        Some(t) => t,
        None => return "N/A".to_string(),
    };

    let hour24 = shifted.hour();
    let period = if hour24 >= 12 { "PM" } else { "AM" };
    let hour = match hour24 % 12 {
        0 => 12,
        h => h,
    };

    format!("{}:{:02} {}", hour, shifted.minute(), period)
}

fn format_city_time(timestamp: i64, offset_secs: i32, pattern: &str) -> String {
    match DateTime::from_timestamp(timestamp + offset_secs as i64, 0) {
        Some(t) => t.format(pattern).to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_upstream_statuses() {
        assert!(matches!(classify_status(StatusCode::NOT_FOUND, "Atlantis"), OwmError::NotFound(_)));
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED, "x"), OwmError::Auth));
        assert!(matches!(classify_status(StatusCode::FORBIDDEN, "x"), OwmError::Auth));
        assert!(matches!(classify_status(StatusCode::TOO_MANY_REQUESTS, "x"), OwmError::RateLimit));
        assert!(matches!(classify_status(StatusCode::BAD_GATEWAY, "x"), OwmError::Upstream(_)));
    }

    #[test]
    fn formats_clock_with_twelve_hour_wraparound() {
        // 2024-06-01 00:05 UTC
        assert_eq!(format_clock(1717200300, 0), "12:05 AM");
        // same instant at UTC+6 is 06:05
        assert_eq!(format_clock(1717200300, 6 * 3600), "6:05 AM");
        // 2024-06-01 12:30 UTC
        assert_eq!(format_clock(1717245000, 0), "12:30 PM");
        // and 18:30 at UTC+6
        assert_eq!(format_clock(1717245000, 6 * 3600), "6:30 PM");
    }

    #[test]
    fn formats_current_weather_payload() {
        let json = r#"{
            "name": "Dhaka",
            "sys": { "country": "BD", "sunrise": 1717197900, "sunset": 1717245900 },
            "main": { "temp": 29.6, "feels_like": 33.2, "humidity": 74, "pressure": 1004 },
            "weather": [ { "icon": "02d", "description": "few clouds" } ],
            "wind": { "speed": 4.1 },
            "visibility": 8000,
            "timezone": 21600,
            "dt": 1717230000
        }"#;

        let data: CurrentResponse = serde_json::from_str(json).unwrap();
        let current = format_current(data).unwrap();

        assert_eq!(current.city, "Dhaka");
        assert_eq!(current.temperature, 30);
        assert_eq!(current.feels_like, 33);
        assert_eq!(current.description, "Few clouds");
        assert_eq!(current.wind_speed, 15);
        assert_eq!(current.visibility, "8.0 km");
        assert_eq!(current.sunrise, "5:25 AM");
        assert_eq!(current.sunset, "6:45 PM");
    }

    #[test]
    fn rejects_payload_without_condition() {
        let json = r#"{
            "name": "Dhaka",
            "sys": { "country": "BD", "sunrise": 0, "sunset": 0 },
            "main": { "temp": 20.0, "feels_like": 20.0, "humidity": 50, "pressure": 1010 },
            "weather": [],
            "wind": { "speed": 1.0 },
            "timezone": 0,
            "dt": 0
        }"#;

        let data: CurrentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(format_current(data), Err(OwmError::Document(_))));
    }

    #[test]
    fn forecast_ingestion_skips_bad_entries_and_sorts() {
        let json = r#"{ "list": [
            { "dt": 1717254000, "main": { "temp": 24.0 }, "weather": [ { "icon": "02d", "description": "few clouds" } ] },
            { "dt": 1717243200, "main": { "temp": 27.5 }, "weather": [ { "icon": "01d", "description": "clear sky" } ] },
            { "dt": 1717264800, "main": { "temp": 21.0 }, "weather": [] }
        ] }"#;

        let data: ForecastResponse = serde_json::from_str(json).unwrap();
        let samples = forecast_samples(data);

        assert_eq!(samples.len(), 2);
        assert!(samples[0].timestamp < samples[1].timestamp);
        assert_eq!(samples[0].icon, "01d");
    }

    #[test]
    fn air_ingestion_clamps_out_of_range_values() {
        let json = r#"{ "list": [
            { "dt": 1717243200,
              "main": { "aqi": 9 },
              "components": { "pm2_5": -3.0, "pm10": 34.1, "co": 250.3, "no2": 11.8, "o3": 40.2, "so2": 2.9 } }
        ] }"#;

        let data: AirPollutionResponse = serde_json::from_str(json).unwrap();
        let samples = air_samples(data);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].aqi, 5);
        assert_eq!(samples[0].pm2_5, 0.0);
    }
}
