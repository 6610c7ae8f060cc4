//! Bounded synthetic dashboard data, substituted when the upstream API
//! fails or returns nothing usable. Values are re-randomized per call but
//! always stay inside realistic domain ranges, so the dashboard never
//! renders nonsensical numbers.

use chrono::{NaiveDate, TimeDelta};
use rand::Rng;

use crate::aggregation::{day_label, AIR_QUALITY_DAYS, FORECAST_DAYS};
use crate::day_length::day_length;
use crate::manager_dashboard::models::{
    AirQualityDay, CityWeather, CurrentWeather, DashboardSnapshot, ForecastDay, MonthlyRainfall,
    SunTimes,
};

const ICONS: [&str; 5] = ["01d", "02d", "03d", "04d", "10d"];
const DESCRIPTIONS: [&str; 5] = ["Sunny", "Partly cloudy", "Cloudy", "Overcast", "Light rain"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Generates a full 7-day forecast with temperatures centered around 20
/// degrees Celsius
///
/// # Arguments
///
/// * 'today' - the current reporting-locale date
/// * 'rng' - randomness source
pub fn fallback_forecast(today: NaiveDate, rng: &mut impl Rng) -> Vec<ForecastDay> {
    (0..FORECAST_DAYS)
        .map(|offset| {
            let date = today + TimeDelta::days(offset as i64);
            let base: f64 = rng.gen_range(15.0..25.0);
            let max_temp = (base + rng.gen_range(3.0..7.0)).round() as i32;
            let min_temp = (base - rng.gen_range(3.0..7.0)).round() as i32;
            let pick = rng.gen_range(0..ICONS.len());

            ForecastDay {
                day: date.format("%a").to_string(),
                date: date.format("%d/%m").to_string(),
                max_temp,
                min_temp,
                icon: ICONS[pick].to_string(),
                description: DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())].to_string(),
            }
        })
        .collect()
}

/// Generates a full 5-day air quality forecast inside the realistic
/// pollutant ranges
///
/// # Arguments
///
/// * 'today' - the current reporting-locale date
/// * 'rng' - randomness source
pub fn fallback_air_quality(today: NaiveDate, rng: &mut impl Rng) -> Vec<AirQualityDay> {
    (0..AIR_QUALITY_DAYS)
        .map(|offset| {
            let date = today + TimeDelta::days(offset as i64);
            AirQualityDay {
                day: day_label(date, today),
                aqi: rng.gen_range(2..=4),
                pm2_5: rng.gen_range(10..=50),
                pm10: rng.gen_range(20..=80),
                co: rng.gen_range(100..=300),
                no2: rng.gen_range(5..=25),
                o3: rng.gen_range(20..=60),
                so2: rng.gen_range(1..=6),
            }
        })
        .collect()
}

/// Produces a stand-in entry for one peer city whose lookup failed
///
/// # Arguments
///
/// * 'city' - name of the city the lookup failed for
/// * 'rng' - randomness source
pub fn fallback_city(city: &str, rng: &mut impl Rng) -> CityWeather {
    let pick = rng.gen_range(0..ICONS.len());

    CityWeather {
        city: city.to_string(),
        country: String::new(),
        temperature: rng.gen_range(10..=25),
        description: DESCRIPTIONS[pick].to_string(),
        icon: ICONS[pick].to_string(),
    }
}

/// Synthetic monthly climatology for the rainfall chart, regenerated per
/// request
pub fn monthly_rainfall(rng: &mut impl Rng) -> Vec<MonthlyRainfall> {
    MONTHS
        .iter()
        .map(|month| MonthlyRainfall {
            month: month.to_string(),
            rainfall: rng.gen_range(0..300),
            sunny_days: rng.gen_range(10..30),
        })
        .collect()
}

/// A complete synthetic snapshot, the last resort when assembly cannot be
/// anchored on real current weather
///
/// # Arguments
///
/// * 'city' - the requested city, echoed back in the snapshot
/// * 'today' - the current reporting-locale date
/// * 'rng' - randomness source
// kept for callers that want a snapshot even when the anchor fetch failed;
// the dashboard assembly itself escalates that failure instead
#[allow(dead_code)]
pub fn fallback_snapshot(city: &str, today: NaiveDate, rng: &mut impl Rng) -> DashboardSnapshot {
    let sunrise = "6:15 AM".to_string();
    let sunset = "6:45 PM".to_string();
    let sun_times = SunTimes {
        day_length: day_length(&sunrise, &sunset).unwrap_or_else(|| "N/A".to_string()),
        sunrise: sunrise.clone(),
        sunset: sunset.clone(),
    };

    let current_weather = CurrentWeather {
        city: city.to_string(),
        country: String::new(),
        temperature: 25,
        feels_like: 27,
        description: "Partly cloudy".to_string(),
        icon: "02d".to_string(),
        humidity: 65,
        wind_speed: 19,
        pressure: 1013,
        visibility: "10.0 km".to_string(),
        sunrise,
        sunset,
        date: today.format("%A, %B %d, %Y").to_string(),
        time: "12:00 PM".to_string(),
    };

    DashboardSnapshot {
        current_weather,
        forecast: fallback_forecast(today, rng),
        monthly_rainfall: monthly_rainfall(rng),
        air_quality: fallback_air_quality(today, rng),
        sun_times,
        other_cities: vec![
            fallback_city("Tokyo", rng),
            fallback_city("London", rng),
            fallback_city("New York", rng),
            fallback_city("Paris", rng),
        ],
    }
}
