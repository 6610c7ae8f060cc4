use chrono::{NaiveDate, TimeDelta};
use rand::Rng;

use crate::manager_dashboard::models::{AirQualityDay, ForecastDay};
use crate::manager_owm::models::{AirSample, ForecastSample};

pub const FORECAST_DAYS: usize = 7;
pub const AIR_QUALITY_DAYS: usize = 5;

/// Groups samples into per-day buckets keyed on the full calendar date
///
/// Bucket order follows the first occurrence of each date while scanning
/// the input front to back; ingestion has already sorted the samples
/// ascending by timestamp, so buckets come out in ascending date order.
/// An empty input yields no buckets.
///
/// # Arguments
///
/// * 'samples' - samples sorted ascending by timestamp
/// * 'date_of' - extracts the reporting-locale calendar date of a sample
pub fn group_by_date<S>(samples: &[S], date_of: impl Fn(&S) -> NaiveDate) -> Vec<(NaiveDate, Vec<&S>)> {
    let mut buckets: Vec<(NaiveDate, Vec<&S>)> = Vec::new();

    for sample in samples {
        let date = date_of(sample);
        match buckets.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(sample),
            None => buckets.push((date, vec![sample])),
        }
    }

    buckets
}

/// Builds the 7-day temperature forecast from a non-empty sample series.
///
/// Samples are bucketed per calendar date and each bucket reduced to one
/// summary. A series with more than seven distinct days is cut down to the
/// seven earliest; a shorter one is extended with synthetic continuation
/// days so the result always holds exactly seven entries.
///
/// # Arguments
///
/// * 'samples' - the forecast feed, sorted ascending by timestamp
/// * 'today' - the current reporting-locale date
/// * 'rng' - randomness source for the synthetic continuation days
pub fn seven_day_forecast(samples: &[ForecastSample], today: NaiveDate, rng: &mut impl Rng) -> Vec<ForecastDay> {
    let buckets = group_by_date(samples, |s| s.date);
    let last_date = buckets.last().map(|(date, _)| *date).unwrap_or(today);

    let mut days: Vec<ForecastDay> = buckets
        .iter()
        .map(|(date, bucket)| summarize_day(*date, bucket))
        .collect();

    if days.len() >= FORECAST_DAYS {
        days.truncate(FORECAST_DAYS);
        return days;
    }

    extend_forecast(days, last_date, rng)
}

/// Builds the 5-day air quality forecast from a non-empty sample series.
///
/// Air quality is checked once per target day rather than averaged, so each
/// bucket keeps the values of its first sample only.
///
/// # Arguments
///
/// * 'samples' - the air pollution feed, sorted ascending by timestamp
/// * 'today' - the current reporting-locale date
pub fn five_day_air_quality(samples: &[AirSample], today: NaiveDate) -> Vec<AirQualityDay> {
    let buckets = group_by_date(samples, |s| s.date);
    let last_date = buckets.last().map(|(date, _)| *date).unwrap_or(today);

    let mut days: Vec<AirQualityDay> = buckets
        .iter()
        .map(|(date, bucket)| air_quality_day(*date, bucket[0], today))
        .collect();

    if days.len() >= AIR_QUALITY_DAYS {
        days.truncate(AIR_QUALITY_DAYS);
        return days;
    }

    extend_air_quality(days, last_date, today)
}

/// Reduces one day bucket to its forecast summary. The bucket is never
/// empty by construction.
fn summarize_day(date: NaiveDate, bucket: &[&ForecastSample]) -> ForecastDay {
    let mut max_temp = f64::MIN;
    let mut min_temp = f64::MAX;
    for sample in bucket {
        max_temp = max_temp.max(sample.temp);
        min_temp = min_temp.min(sample.temp);
    }

    let icon = modal(bucket.iter().map(|s| s.icon.as_str()))
        .unwrap_or("01d")
        .to_string();
    let description = modal(bucket.iter().map(|s| s.description.as_str()))
        .unwrap_or("clear sky");

    ForecastDay {
        day: date.format("%a").to_string(),
        date: date.format("%d/%m").to_string(),
        // rounding after aggregation so sub-day rounding errors do not compound
        max_temp: max_temp.round() as i32,
        min_temp: min_temp.round() as i32,
        icon,
        description: capitalize(description),
    }
}

fn air_quality_day(date: NaiveDate, first: &AirSample, today: NaiveDate) -> AirQualityDay {
    AirQualityDay {
        day: day_label(date, today),
        aqi: first.aqi,
        pm2_5: first.pm2_5.round() as u32,
        pm10: first.pm10.round() as u32,
        co: first.co.round() as u32,
        no2: first.no2.round() as u32,
        o3: first.o3.round() as u32,
        so2: first.so2.round() as u32,
    }
}

/// Appends synthetic continuation days until the forecast holds seven
/// entries. Dates continue chronologically right after the last real day,
/// so no label is ever repeated. Synthetic temperatures are the mean over
/// the real days plus a centered jitter; icon and description repeat the
/// last real day.
fn extend_forecast(mut days: Vec<ForecastDay>, last_date: NaiveDate, rng: &mut impl Rng) -> Vec<ForecastDay> {
    let max_mean = mean(days.iter().map(|d| d.max_temp));
    let min_mean = mean(days.iter().map(|d| d.min_temp));
    let (last_icon, last_description) = match days.last() {
        Some(day) => (day.icon.clone(), day.description.clone()),
        None => ("01d".to_string(), "Clear sky".to_string()),
    };

    let mut date = last_date;
    while days.len() < FORECAST_DAYS {
        date = date + TimeDelta::days(1);
        let max_temp = (max_mean + rng.gen_range(-1.5..1.5)).round() as i32;
        let min_temp = ((min_mean + rng.gen_range(-1.5..1.5)).round() as i32).min(max_temp);

        days.push(ForecastDay {
            day: date.format("%a").to_string(),
            date: date.format("%d/%m").to_string(),
            max_temp,
            min_temp,
            icon: last_icon.clone(),
            description: last_description.clone(),
        });
    }

    days
}

/// Appends the last real day's pollutant values under new labels until the
/// series holds five entries, continuing the dates right after the last
/// real day
fn extend_air_quality(mut days: Vec<AirQualityDay>, last_date: NaiveDate, today: NaiveDate) -> Vec<AirQualityDay> {
    let last = match days.last() {
        Some(day) => day.clone(),
        None => return days,
    };

    let mut date = last_date;
    while days.len() < AIR_QUALITY_DAYS {
        date = date + TimeDelta::days(1);
        days.push(AirQualityDay {
            day: day_label(date, today),
            ..last.clone()
        });
    }

    days
}

/// Label used in the air quality section, "Today" for the current date
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else {
        date.format("%a").to_string()
    }
}

/// Most frequent value in the sequence; only a strictly greater count
/// replaces the current winner, so ties resolve to the value seen first
fn modal<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(k, _)| *k == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }

    best.map(|(value, _)| value)
}

fn mean(values: impl Iterator<Item = i32>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0;
    for value in values {
        sum += value as f64;
        count += 1;
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn sample(day: u32, hour: u32, temp: f64, icon: &str, description: &str) -> ForecastSample {
        let timestamp: DateTime<Utc> = date(day)
            .and_hms_opt(hour, 0, 0).unwrap()
            .and_utc();
        ForecastSample {
            timestamp,
            date: date(day),
            temp,
            icon: icon.to_string(),
            description: description.to_string(),
        }
    }

    fn air_sample(day: u32, hour: u32, aqi: u8, pm2_5: f64) -> AirSample {
        let timestamp: DateTime<Utc> = date(day)
            .and_hms_opt(hour, 0, 0).unwrap()
            .and_utc();
        AirSample {
            timestamp,
            date: date(day),
            aqi,
            pm2_5,
            pm10: 30.0,
            co: 200.0,
            no2: 10.0,
            o3: 40.0,
            so2: 3.0,
        }
    }

    #[test]
    fn groups_one_bucket_per_distinct_date() {
        let samples = vec![
            sample(1, 0, 20.0, "01d", "clear sky"),
            sample(1, 3, 22.0, "01d", "clear sky"),
            sample(2, 0, 18.0, "02d", "few clouds"),
            sample(3, 0, 19.0, "02d", "few clouds"),
        ];

        let buckets = group_by_date(&samples, |s| s.date);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].0, date(1));
        assert_eq!(buckets[0].1.len(), 2);
        assert_eq!(buckets[2].0, date(3));

        let total: usize = buckets.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(total, samples.len());
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        let samples: Vec<ForecastSample> = Vec::new();
        assert!(group_by_date(&samples, |s| s.date).is_empty());
    }

    #[test]
    fn modal_prefers_strictly_greatest_count() {
        assert_eq!(modal(["a", "a", "b"].into_iter()), Some("a"));
        assert_eq!(modal(["b", "a", "a"].into_iter()), Some("a"));
    }

    #[test]
    fn modal_tie_resolves_to_first_seen() {
        assert_eq!(modal(["a", "b"].into_iter()), Some("a"));
        assert_eq!(modal(["b", "a", "b", "a"].into_iter()), Some("b"));
        assert_eq!(modal(std::iter::empty::<&str>()), None);
    }

    #[test]
    fn summary_rounds_after_aggregation_and_capitalizes() {
        let samples = vec![
            sample(1, 0, 20.4, "01d", "clear sky"),
            sample(1, 3, 24.6, "02d", "few clouds"),
            sample(1, 6, 24.8, "02d", "few clouds"),
        ];

        let days = seven_day_forecast(&samples, date(1), &mut StdRng::seed_from_u64(1));

        assert_eq!(days[0].max_temp, 25);
        assert_eq!(days[0].min_temp, 20);
        assert_eq!(days[0].icon, "02d");
        assert_eq!(days[0].description, "Few clouds");
        assert_eq!(days[0].day, "Sat");
        assert_eq!(days[0].date, "01/06");
    }

    #[test]
    fn five_real_days_get_two_synthetic_tail_days() {
        // 8 samples per day over 5 days, the 3-hour feed shape
        let mut samples = Vec::new();
        for day in 1..=5 {
            for slot in 0..8 {
                let temp = 15.0 + day as f64 + slot as f64;
                samples.push(sample(day, slot * 3, temp, "01d", "clear sky"));
            }
        }

        let mut rng = StdRng::seed_from_u64(7);
        let days = seven_day_forecast(&samples, date(1), &mut rng);

        assert_eq!(days.len(), FORECAST_DAYS);
        for (i, day) in days.iter().take(5).enumerate() {
            let base = 15 + (i + 1) as i32;
            assert_eq!(day.min_temp, base);
            assert_eq!(day.max_temp, base + 7);
            assert!(day.max_temp >= day.min_temp);
        }

        // synthetic tail stays near the real-day means and keeps labels moving
        let max_mean = mean(days.iter().take(5).map(|d| d.max_temp));
        let min_mean = mean(days.iter().take(5).map(|d| d.min_temp));
        for day in days.iter().skip(5) {
            assert!((day.max_temp as f64 - max_mean).abs() <= 3.0);
            assert!((day.min_temp as f64 - min_mean).abs() <= 3.0);
            assert!(day.max_temp >= day.min_temp);
            assert_eq!(day.icon, "01d");
        }
        assert_eq!(days[5].date, "06/06");
        assert_eq!(days[6].date, "07/06");
    }

    #[test]
    fn extension_dates_continue_when_feed_starts_before_today() {
        // first feed day falls before today; synthetic dates must still
        // follow the last real day instead of jumping ahead
        let samples: Vec<ForecastSample> = (1..=5)
            .map(|day| sample(day, 12, 20.0, "01d", "clear sky"))
            .collect();

        let days = seven_day_forecast(&samples, date(2), &mut StdRng::seed_from_u64(11));

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[4].date, "05/06");
        assert_eq!(days[5].date, "06/06");
        assert_eq!(days[6].date, "07/06");

        let mut dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        dates.dedup();
        assert_eq!(dates.len(), FORECAST_DAYS);
    }

    #[test]
    fn long_series_truncates_to_earliest_seven() {
        let samples: Vec<ForecastSample> = (1..=9)
            .map(|day| sample(day, 12, 20.0, "01d", "clear sky"))
            .collect();

        let days = seven_day_forecast(&samples, date(1), &mut StdRng::seed_from_u64(3));

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].date, "01/06");
        assert_eq!(days[6].date, "07/06");
    }

    #[test]
    fn air_quality_keeps_first_sample_of_each_day() {
        let samples = vec![
            air_sample(1, 0, 2, 12.4),
            air_sample(1, 3, 5, 48.0),
            air_sample(2, 0, 3, 20.0),
        ];

        let days = five_day_air_quality(&samples, date(1));

        assert_eq!(days.len(), AIR_QUALITY_DAYS);
        assert_eq!(days[0].day, "Today");
        assert_eq!(days[0].aqi, 2);
        assert_eq!(days[0].pm2_5, 12);
        assert_eq!(days[1].day, "Sun");
        assert_eq!(days[1].aqi, 3);
    }

    #[test]
    fn air_quality_extension_repeats_last_real_day() {
        let samples = vec![air_sample(1, 0, 4, 30.0), air_sample(2, 0, 2, 15.0)];

        let days = five_day_air_quality(&samples, date(1));

        assert_eq!(days.len(), AIR_QUALITY_DAYS);
        for day in days.iter().skip(2) {
            assert_eq!(day.aqi, 2);
            assert_eq!(day.pm2_5, 15);
        }
        // labels keep advancing past the real days
        assert_eq!(days[2].day, date(3).format("%a").to_string());
        assert_eq!(days[4].day, date(5).format("%a").to_string());
    }

    #[test]
    fn air_quality_labels_continue_when_feed_starts_before_today() {
        let samples = vec![air_sample(1, 0, 4, 30.0), air_sample(2, 0, 2, 15.0)];

        let days = five_day_air_quality(&samples, date(2));

        let labels: Vec<&str> = days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, ["Sat", "Today", "Mon", "Tue", "Wed"]);
    }

    #[test]
    fn air_quality_truncates_to_earliest_five() {
        let samples: Vec<AirSample> = (1..=6).map(|day| air_sample(day, 0, 3, 25.0)).collect();

        let days = five_day_air_quality(&samples, date(1));

        assert_eq!(days.len(), AIR_QUALITY_DAYS);
        assert_eq!(days[0].day, "Today");
        assert_eq!(days[4].day, date(5).format("%a").to_string());
    }
}
