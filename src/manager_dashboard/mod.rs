pub mod models;

use chrono::{Local, NaiveDate};
use log::{error, warn};
use rand::Rng;
use tokio::task::JoinSet;

use crate::aggregation;
use crate::day_length::day_length;
use crate::manager_dashboard::models::{
    AirQualityDay, CityWeather, CurrentWeather, DashboardSnapshot, ForecastDay, Sourced, SunTimes,
};
use crate::manager_owm::errors::OwmError;
use crate::manager_owm::models::{AirSample, ForecastSample};
use crate::manager_owm::OWM;
use crate::synthetic;

/// Struct for assembling full dashboard snapshots from the upstream
/// weather, forecast, geocoding and air pollution endpoints
pub struct Dashboard {
    owm: OWM,
    peer_cities: Vec<String>,
}

impl Dashboard {
    /// Returns a Dashboard struct ready to serve snapshot requests
    ///
    /// # Arguments
    ///
    /// * 'owm' - the OpenWeatherMap client
    /// * 'peer_cities' - the fixed city list for the "other cities" section
    pub fn new(owm: OWM, peer_cities: Vec<String>) -> Self {
        Self { owm, peer_cities }
    }

    /// Assembles a dashboard snapshot for the given city.
    ///
    /// The four upstream fetches run concurrently. The forecast, air
    /// quality and peer city sections each absorb their own failure by
    /// substituting bounded synthetic data, so a partial upstream outage
    /// still produces a complete snapshot. Only a failed current weather
    /// lookup is returned as an error, since city identity and sun times
    /// anchor every other section.
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to build the snapshot for
    pub async fn get_dashboard_data(&self, city: &str) -> Result<DashboardSnapshot, OwmError> {
        let (current, forecast, air, other_cities) = tokio::join!(
            self.owm.current_weather(city),
            self.owm.forecast(city),
            self.air_quality_samples(city),
            self.peer_cities_weather(),
        );

        let today = Local::now().date_naive();
        compose_snapshot(current, forecast, air, other_cities, today, &mut rand::thread_rng())
    }

    /// Geocodes the city and fetches its air pollution forecast feed
    async fn air_quality_samples(&self, city: &str) -> Result<Vec<AirSample>, OwmError> {
        let (lat, lon) = self.owm.geocode(city).await?;
        self.owm.air_pollution_forecast(lat, lon).await
    }

    /// Fetches the peer cities concurrently; a failed city degrades to its
    /// own synthetic entry instead of aborting the batch
    async fn peer_cities_weather(&self) -> Vec<CityWeather> {
        let mut set: JoinSet<CityWeather> = JoinSet::new();

        for city in self.peer_cities.iter() {
            let owm = self.owm.clone();
            let city = city.clone();
            set.spawn(async move {
                match owm.city_weather(&city).await {
                    Ok(weather) => weather,
                    Err(e) => {
                        error!("failed to get weather for {}: {}", city, e);
                        synthetic::fallback_city(&city, &mut rand::thread_rng())
                    }
                }
            });
        }

        set.join_all().await
    }
}

/// Composes the four fetch outcomes into one snapshot.
///
/// The current weather is the anchor: its failure propagates unchanged so
/// the handler can map it to a status code. The forecast and air quality
/// results each degrade to their synthetic section, and the peer city list
/// arrives already degraded per city.
///
/// # Arguments
///
/// * 'current' - outcome of the current weather fetch
/// * 'forecast' - outcome of the forecast feed fetch
/// * 'air' - outcome of the air pollution feed fetch
/// * 'other_cities' - the peer city section
/// * 'today' - the current reporting-locale date
/// * 'rng' - randomness source for synthetic sections
pub fn compose_snapshot(
    current: Result<CurrentWeather, OwmError>,
    forecast: Result<Vec<ForecastSample>, OwmError>,
    air: Result<Vec<AirSample>, OwmError>,
    other_cities: Vec<CityWeather>,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<DashboardSnapshot, OwmError> {
    let current = current?;

    let forecast = forecast_section(forecast, today, rng);
    if forecast.is_synthetic() {
        warn!("substituting synthetic forecast for {}", current.city);
    }

    let air_quality = air_quality_section(air, today, rng);
    if air_quality.is_synthetic() {
        warn!("substituting synthetic air quality for {}", current.city);
    }

    let sun_times = SunTimes {
        day_length: day_length(&current.sunrise, &current.sunset)
            .unwrap_or_else(|| "N/A".to_string()),
        sunrise: current.sunrise.clone(),
        sunset: current.sunset.clone(),
    };

    Ok(DashboardSnapshot {
        forecast: forecast.into_inner(),
        monthly_rainfall: synthetic::monthly_rainfall(rng),
        air_quality: air_quality.into_inner(),
        sun_times,
        other_cities,
        current_weather: current,
    })
}

/// Turns the raw forecast fetch result into the 7-day section, falling
/// back to fully synthetic days when the fetch failed or produced no
/// usable samples
///
/// # Arguments
///
/// * 'result' - outcome of the upstream forecast fetch
/// * 'today' - the current reporting-locale date
/// * 'rng' - randomness source for extension and fallback days
pub fn forecast_section(
    result: Result<Vec<ForecastSample>, OwmError>,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Sourced<Vec<ForecastDay>> {
    match result {
        Ok(samples) if !samples.is_empty() => {
            Sourced::Upstream(aggregation::seven_day_forecast(&samples, today, rng))
        }
        Ok(_) => Sourced::Synthetic(synthetic::fallback_forecast(today, rng)),
        Err(e) => {
            error!("forecast fetch failed: {}", e);
            Sourced::Synthetic(synthetic::fallback_forecast(today, rng))
        }
    }
}

/// Turns the raw air pollution fetch result into the 5-day section, same
/// fallback rules as the forecast section
pub fn air_quality_section(
    result: Result<Vec<AirSample>, OwmError>,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Sourced<Vec<AirQualityDay>> {
    match result {
        Ok(samples) if !samples.is_empty() => {
            Sourced::Upstream(aggregation::five_day_air_quality(&samples, today))
        }
        Ok(_) => Sourced::Synthetic(synthetic::fallback_air_quality(today, rng)),
        Err(e) => {
            error!("air quality fetch failed: {}", e);
            Sourced::Synthetic(synthetic::fallback_air_quality(today, rng))
        }
    }
}
