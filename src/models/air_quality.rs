//! Defines data structures for the application.
//!
//! Includes structs for:
//! - Deserializing the air quality backend's responses (`CurrentAirQualityResponse`,
//!   `HistoryResponse`, `PredictionResponse`).
//! - The canonical in-app reading (`AirQualityReading`) and its derived per-day summary
//!   (`DailyAggregate`).
//! - AQI classification used by the display layer (`AqiLevel`, `HealthAdvice`).
//!
//! All AQI values inside the app are on the 0–500 index scale. The current-reading endpoint
//! reports a 1–5 category instead, which is converted once, when the response is turned into a
//! `CurrentAirQuality`.

use super::serde_time;
use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

// --- Pollutants ---

/// The pollutants the backend reports concentrations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Key used in the backend's `components` object.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O₃",
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::Co => "CO",
        }
    }
}

/// Pollutant concentrations (µg/m³) keyed by the backend's pollutant code.
///
/// Unknown codes (`nh3`, `no`, ...) are kept as-is; `null` values are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Components(BTreeMap<String, Option<f64>>);

impl Components {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.0.get(pollutant.code()).copied().flatten()
    }

    pub fn insert(&mut self, pollutant: Pollutant, value: f64) {
        self.0.insert(pollutant.code().to_string(), Some(value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Option::is_none)
    }
}

impl FromIterator<(Pollutant, f64)> for Components {
    fn from_iter<I: IntoIterator<Item = (Pollutant, f64)>>(iter: I) -> Self {
        let mut components = Components::default();
        for (pollutant, value) in iter {
            components.insert(pollutant, value);
        }
        components
    }
}

/// Represents geographical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

// --- Canonical reading ---

/// One air quality sample for a city.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AirQualityReading {
    /// Empty when the backend omits it; the client fills in the requested city.
    #[serde(default)]
    pub city: String,
    #[serde(alias = "dt", deserialize_with = "serde_time::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// AQI on the 0–500 index scale.
    pub aqi: f64,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub components: Components,
}

// --- Current reading endpoint ---

/// Body of `GET /air-quality/get`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentAirQualityResponse {
    #[serde(default)]
    pub city: Option<String>,
    /// AQI category, 1 (good) to 5 (very poor).
    pub aqi: u8,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub components: Components,
    #[serde(
        default,
        alias = "dt",
        deserialize_with = "serde_time::deserialize_optional_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A current reading together with the backend's 1–5 category and its description.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentAirQuality {
    pub reading: AirQualityReading,
    pub category: u8,
    pub meaning: Option<String>,
}

impl CurrentAirQualityResponse {
    /// Converts the wire payload into the canonical index scale.
    ///
    /// The requested city and the receipt time stand in for fields the backend left out.
    pub fn into_current(self, requested_city: &str, received_at: DateTime<Utc>) -> CurrentAirQuality {
        let city = self
            .city
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| requested_city.to_string());
        CurrentAirQuality {
            reading: AirQualityReading {
                city,
                timestamp: self.timestamp.unwrap_or(received_at),
                aqi: category_to_index(self.aqi),
                coordinates: self.coordinates,
                components: self.components,
            },
            category: self.aqi,
            meaning: self.meaning,
        }
    }
}

/// Maps a 1–5 AQI category onto the upper bound of the matching 0–500 index band.
pub fn category_to_index(category: u8) -> f64 {
    match category {
        1 => 50.0,
        2 => 100.0,
        3 => 150.0,
        4 => 200.0,
        5 => 300.0,
        other => {
            warn!("Unknown AQI category {} received; treating as 0", other);
            0.0
        },
    }
}

/// Human description of a 1–5 AQI category.
pub fn category_label(category: u8) -> &'static str {
    match category {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

// --- History endpoint ---

/// Body of `GET /air-quality/history`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub trends: Vec<AirQualityReading>,
}

/// Per calendar day summary of a city's readings.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub avg_aqi: f64,
    pub max_aqi: f64,
    pub min_aqi: f64,
    /// The day's readings in the order they were received.
    pub hourly_data: Vec<AirQualityReading>,
}

// --- Prediction endpoint ---

/// A single day of the backend's AQI forecast.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionPoint {
    pub day: u32,
    #[serde(deserialize_with = "serde_time::deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "predictedAQI")]
    pub predicted_aqi: f64,
}

/// A past daily AQI value as returned alongside predictions.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrendPoint {
    #[serde(deserialize_with = "serde_time::deserialize_date")]
    pub date: NaiveDate,
    pub aqi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionData {
    #[serde(default)]
    pub predictions: Vec<PredictionPoint>,
    #[serde(default, rename = "historicalData")]
    pub historical_data: Vec<TrendPoint>,
}

/// Body of `GET /air-quality/predict`.
///
/// A 200 response may still carry `success: false`; use [`PredictionResponse::into_data`]
/// to fold that case into an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PredictionData>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PredictionResponse {
    pub fn into_data(self) -> Result<PredictionData> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(AppError::Application(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Failed to fetch predictions".to_string()),
            ))
        }
    }
}

// --- Classification ---

/// Health band of an AQI index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn from_index(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiLevel::Good
        } else if aqi <= 100.0 {
            AqiLevel::Moderate
        } else if aqi <= 150.0 {
            AqiLevel::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            AqiLevel::Unhealthy
        } else if aqi <= 300.0 {
            AqiLevel::VeryUnhealthy
        } else {
            AqiLevel::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }

    pub fn advice(&self) -> HealthAdvice {
        match self {
            AqiLevel::Good | AqiLevel::Moderate => HealthAdvice::Enjoy,
            AqiLevel::UnhealthyForSensitiveGroups => HealthAdvice::Acceptable,
            _ => HealthAdvice::ReduceActivity,
        }
    }
}

/// Advice tier shown with a current reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthAdvice {
    Enjoy,
    Acceptable,
    ReduceActivity,
}

impl HealthAdvice {
    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            HealthAdvice::Enjoy => &[
                "Air quality is good. Enjoy outdoor activities!",
                "Great day for windows open and fresh air.",
            ],
            HealthAdvice::Acceptable => &[
                "Air quality is acceptable for most people.",
                "Unusually sensitive people should reduce prolonged outdoor exertion.",
            ],
            HealthAdvice::ReduceActivity => &[
                "Reduce outdoor activities.",
                "Sensitive groups should avoid outdoor exertion.",
                "Keep windows closed if possible.",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, AqiLevel::Good)]
    #[case(50.0, AqiLevel::Good)]
    #[case(50.5, AqiLevel::Moderate)]
    #[case(100.0, AqiLevel::Moderate)]
    #[case(150.0, AqiLevel::UnhealthyForSensitiveGroups)]
    #[case(200.0, AqiLevel::Unhealthy)]
    #[case(300.0, AqiLevel::VeryUnhealthy)]
    #[case(301.0, AqiLevel::Hazardous)]
    fn test_aqi_level_thresholds(#[case] aqi: f64, #[case] expected: AqiLevel) {
        assert_eq!(AqiLevel::from_index(aqi), expected);
    }

    #[rstest]
    #[case(1, AqiLevel::Good, HealthAdvice::Enjoy)]
    #[case(2, AqiLevel::Moderate, HealthAdvice::Enjoy)]
    #[case(3, AqiLevel::UnhealthyForSensitiveGroups, HealthAdvice::Acceptable)]
    #[case(4, AqiLevel::Unhealthy, HealthAdvice::ReduceActivity)]
    #[case(5, AqiLevel::VeryUnhealthy, HealthAdvice::ReduceActivity)]
    fn test_category_conversion_keeps_advice_tiers(
        #[case] category: u8,
        #[case] level: AqiLevel,
        #[case] advice: HealthAdvice,
    ) {
        let index = category_to_index(category);
        assert_eq!(AqiLevel::from_index(index), level);
        assert_eq!(level.advice(), advice);
    }

    #[test]
    fn test_current_response_conversion_fills_missing_fields() {
        let body = r#"{
            "aqi": 2,
            "meaning": "Fair",
            "coordinates": {"lat": 6.9271, "lon": 79.8612},
            "components": {"pm2_5": 12.5, "pm10": 20.0, "o3": 60.1, "so2": null, "nh3": 1.2}
        }"#;
        let response: CurrentAirQualityResponse = serde_json::from_str(body).unwrap();
        let received_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let current = response.into_current("Colombo", received_at);

        assert_eq!(current.reading.city, "Colombo");
        assert_eq!(current.reading.timestamp, received_at);
        assert_eq!(current.reading.aqi, 100.0);
        assert_eq!(current.category, 2);
        assert_eq!(current.meaning.as_deref(), Some("Fair"));
        assert_eq!(current.reading.components.get(Pollutant::Pm25), Some(12.5));
        assert_eq!(current.reading.components.get(Pollutant::So2), None);
        assert_eq!(current.reading.components.get(Pollutant::Co), None);
    }

    #[test]
    fn test_history_response_parses_trends() {
        let body = r#"{"trends": [
            {"city": "London", "timestamp": "2024-01-01T01:00:00Z", "aqi": 42,
             "components": {"pm2_5": 8.0, "no2": 14.2}},
            {"timestamp": 1704074400, "aqi": 57.5}
        ]}"#;
        let response: HistoryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.trends.len(), 2);
        assert_eq!(response.trends[0].city, "London");
        assert_eq!(response.trends[0].components.get(Pollutant::No2), Some(14.2));
        assert_eq!(response.trends[1].city, "");
        assert!(response.trends[1].components.is_empty());
        assert_eq!(
            response.trends[1].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_prediction_response_success() {
        let body = r#"{"success": true, "data": {
            "predictions": [{"day": 1, "date": "2024-02-02", "predictedAQI": 88}],
            "historicalData": [{"date": "2024-02-01", "aqi": 75}]
        }}"#;
        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        let data = response.into_data().unwrap();
        assert_eq!(data.predictions.len(), 1);
        assert_eq!(data.predictions[0].predicted_aqi, 88.0);
        assert_eq!(data.historical_data[0].aqi, 75.0);
    }

    #[test]
    fn test_prediction_response_failure_flag() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"success": false, "message": "Model not trained"}"#).unwrap();
        match response.into_data() {
            Err(AppError::Application(msg)) => assert_eq!(msg, "Model not trained"),
            other => panic!("Expected Application error, got {:?}", other),
        }

        let response: PredictionResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        match response.into_data() {
            Err(AppError::Application(msg)) => assert_eq!(msg, "Failed to fetch predictions"),
            other => panic!("Expected Application error, got {:?}", other),
        }
    }
}
