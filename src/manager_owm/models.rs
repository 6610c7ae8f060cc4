use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub sys: Sys,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub visibility: Option<u32>,
    pub timezone: i32,
    pub dt: i64,
}

#[derive(Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
}

#[derive(Deserialize)]
pub struct Condition {
    pub icon: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

#[derive(Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<Condition>,
}

#[derive(Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

#[derive(Deserialize)]
pub struct GeoEntry {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct AirPollutionResponse {
    pub list: Vec<AirEntry>,
}

#[derive(Deserialize)]
pub struct AirEntry {
    pub dt: i64,
    pub main: AirMain,
    pub components: Components,
}

#[derive(Deserialize)]
pub struct AirMain {
    pub aqi: i64,
}

#[derive(Deserialize)]
pub struct Components {
    pub pm2_5: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
}

/// One validated 3-hour point from the forecast feed, carrying the
/// reporting-locale calendar date derived at ingestion
#[derive(Debug, Clone)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub temp: f64,
    pub icon: String,
    pub description: String,
}

/// One validated point from the air pollution forecast feed
#[derive(Debug, Clone)]
pub struct AirSample {
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub aqi: u8,
    pub pm2_5: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
}
