//! Groups a city's historical readings into per-day summaries.
//!
//! Days are keyed by the calendar date of each reading's timestamp in an explicit [`DayZone`].
//! Only the `aqi` field is aggregated; pollutant components stay on the individual readings so
//! the intra-day detail view can show them hour by hour.

mod zone;

pub use zone::DayZone;

use crate::models::{AirQualityReading, DailyAggregate};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Builds one [`DailyAggregate`] per distinct day present in `readings`.
///
/// Output order follows the first appearance of each day in the input, which is chronological
/// only when the input is. An empty input yields an empty output.
pub fn aggregate_by_day(readings: Vec<AirQualityReading>, zone: DayZone) -> Vec<DailyAggregate> {
    let total = readings.len();
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut by_day: HashMap<NaiveDate, Vec<AirQualityReading>> = HashMap::new();

    for reading in readings {
        let key = zone.date_of(&reading.timestamp);
        by_day
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(reading);
    }

    let aggregates: Vec<DailyAggregate> = order
        .into_iter()
        .filter_map(|date| by_day.remove(&date).map(|day| summarize(date, day)))
        .collect();

    debug!(
        "Aggregated {} readings into {} days ({})",
        total,
        aggregates.len(),
        zone
    );
    aggregates
}

/// Computes avg/max/min over a non-empty day.
fn summarize(date: NaiveDate, hourly_data: Vec<AirQualityReading>) -> DailyAggregate {
    let count = hourly_data.len() as f64;
    let (sum, max_aqi, min_aqi) = hourly_data.iter().fold(
        (0.0, f64::NEG_INFINITY, f64::INFINITY),
        |(sum, max, min), reading| (sum + reading.aqi, max.max(reading.aqi), min.min(reading.aqi)),
    );

    DailyAggregate {
        date,
        avg_aqi: sum / count,
        max_aqi,
        min_aqi,
        hourly_data,
    }
}

impl DailyAggregate {
    /// `HH:00` labels for each reading of the day, in `zone`.
    pub fn hour_labels(&self, zone: DayZone) -> Vec<String> {
        self.hourly_data
            .iter()
            .map(|reading| format!("{:02}:00", zone.hour_of(&reading.timestamp)))
            .collect()
    }
}
