//! Scripted `AirQualityApi` used by the screen and CLI tests.

use crate::api::AirQualityApi;
use crate::error::Result;
use crate::models::{
    AirQualityReading, Coordinates, CurrentAirQuality, Pollutant, PredictionResponse,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;

// --- Fake API state ---
// Stores expected results and records calls.
#[derive(Default)]
struct FakeState {
    current_calls: Vec<String>,
    history_calls: Vec<(String, u32)>,
    prediction_calls: Vec<(String, u32)>,
    current_result: Option<Result<CurrentAirQuality>>,
    history_result: Option<Result<Vec<AirQualityReading>>>,
    prediction_result: Option<Result<PredictionResponse>>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    // Methods to set expectations for the next call of each endpoint
    pub fn expect_current(&self, result: Result<CurrentAirQuality>) {
        self.state.lock().unwrap().current_result = Some(result);
    }

    pub fn expect_history(&self, result: Result<Vec<AirQualityReading>>) {
        self.state.lock().unwrap().history_result = Some(result);
    }

    pub fn expect_predictions(&self, result: Result<PredictionResponse>) {
        self.state.lock().unwrap().prediction_result = Some(result);
    }

    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.current_calls.len() + state.history_calls.len() + state.prediction_calls.len()
    }

    pub fn current_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().current_calls.clone()
    }

    pub fn history_calls(&self) -> Vec<(String, u32)> {
        self.state.lock().unwrap().history_calls.clone()
    }

    pub fn prediction_calls(&self) -> Vec<(String, u32)> {
        self.state.lock().unwrap().prediction_calls.clone()
    }
}

#[async_trait]
impl AirQualityApi for FakeApi {
    async fn fetch_current(&self, city: &str) -> Result<CurrentAirQuality> {
        let mut state = self.state.lock().unwrap();
        state.current_calls.push(city.to_string());
        state
            .current_result
            .take()
            .unwrap_or_else(|| panic!("FakeApi::fetch_current called without expectation"))
    }

    async fn fetch_history(&self, city: &str, days: u32) -> Result<Vec<AirQualityReading>> {
        let mut state = self.state.lock().unwrap();
        state.history_calls.push((city.to_string(), days));
        state
            .history_result
            .take()
            .unwrap_or_else(|| panic!("FakeApi::fetch_history called without expectation"))
    }

    async fn fetch_predictions(&self, city: &str, days: u32) -> Result<PredictionResponse> {
        let mut state = self.state.lock().unwrap();
        state.prediction_calls.push((city.to_string(), days));
        state
            .prediction_result
            .take()
            .unwrap_or_else(|| panic!("FakeApi::fetch_predictions called without expectation"))
    }
}

/// A reading on 2024-01-`day` at `hour`:00 UTC.
pub fn reading(city: &str, day: u32, hour: u32, aqi: f64) -> AirQualityReading {
    AirQualityReading {
        city: city.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(),
        aqi,
        coordinates: Some(Coordinates {
            lat: Some(51.5074),
            lon: Some(-0.1278),
        }),
        components: [
            (Pollutant::Pm25, 12.0),
            (Pollutant::No2, 18.5),
            (Pollutant::O3, 55.0),
        ]
        .into_iter()
        .collect(),
    }
}

pub fn current(city: &str, category: u8) -> CurrentAirQuality {
    let mut reading = reading(city, 1, 12, crate::models::category_to_index(category));
    reading.components.insert(Pollutant::Co, 240.0);
    CurrentAirQuality {
        reading,
        category,
        meaning: Some(crate::models::category_label(category).to_string()),
    }
}
