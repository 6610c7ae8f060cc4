use serde::Serialize;

/// One aggregated day in the 7-day temperature forecast
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub day: String,
    pub date: String,
    pub max_temp: i32,
    pub min_temp: i32,
    pub icon: String,
    pub description: String,
}

/// One day in the 5-day air quality forecast
#[derive(Debug, Clone, Serialize)]
pub struct AirQualityDay {
    pub day: String,
    pub aqi: u8,
    #[serde(rename = "pm25")]
    pub pm2_5: u32,
    pub pm10: u32,
    pub co: u32,
    pub no2: u32,
    pub o3: u32,
    pub so2: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: i32,
    pub pressure: u32,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
    pub day_length: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityWeather {
    pub city: String,
    pub country: String,
    pub temperature: i32,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRainfall {
    pub month: String,
    pub rainfall: u32,
    pub sunny_days: u32,
}

/// The full dashboard payload, built fresh for every request and never
/// mutated afterwards
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub current_weather: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
    pub monthly_rainfall: Vec<MonthlyRainfall>,
    pub air_quality: Vec<AirQualityDay>,
    pub sun_times: SunTimes,
    pub other_cities: Vec<CityWeather>,
}

/// Marks whether a dashboard section was built from upstream data or
/// synthesized locally after a failed or empty fetch
#[derive(Debug)]
pub enum Sourced<T> {
    Upstream(T),
    Synthetic(T),
}

impl<T> Sourced<T> {
    pub fn into_inner(self) -> T {
        match self {
            Sourced::Upstream(inner) => inner,
            Sourced::Synthetic(inner) => inner,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Sourced::Synthetic(_))
    }
}
