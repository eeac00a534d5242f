//! Provides a client for the air quality backend's HTTP API.
//!
//! This module defines the `AirQualityClient` struct and its methods for fetching
//! current readings, historical samples and AQI predictions for a city.

use super::AirQualityApi;
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{
    AirQualityReading, CurrentAirQuality, CurrentAirQualityResponse, HistoryResponse,
    PredictionResponse,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, info};

const CURRENT_PATH: &str = "/air-quality/get";
const HISTORY_PATH: &str = "/air-quality/history";
const PREDICT_PATH: &str = "/air-quality/predict";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// An asynchronous client for the air quality backend.
pub struct AirQualityClient {
    client: Client,
    base_url: String,
}

impl AirQualityClient {
    /// Creates a new `AirQualityClient` from the API section of the configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new `AirQualityClient` pointed at an arbitrary base URL.
    ///
    /// This is primarily intended for testing purposes (e.g., using a mock server).
    #[cfg(test)]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues a GET request and decodes the JSON body, mapping failures onto `AppError`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        city: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} for {} failed: {}", url, city, e);
                AppError::Network(Arc::new(e))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            error!("Received 404 Not Found from {} for city {}", url, city);
            return Err(AppError::NotFound(city.to_string()));
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Error reading response body from {}: {}", url, e);
            AppError::Network(Arc::new(e))
        })?;

        if !status.is_success() {
            let message = backend_message(&body, status);
            error!(
                "API request to {} failed with status {}: {}",
                url, status, message
            );
            return Err(AppError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            error!("Error parsing API response JSON from {}: {}", url, e);
            AppError::from(e)
        })
    }
}

/// Extracts a human-readable failure reason from an error body.
///
/// Prefers a JSON `message` or `error` field, then the canonical status text.
fn backend_message(body: &[u8], status: StatusCode) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string())
}

#[async_trait]
impl AirQualityApi for AirQualityClient {
    async fn fetch_current(&self, city: &str) -> Result<CurrentAirQuality> {
        info!("Fetching current air quality for {}", city);

        let response: CurrentAirQualityResponse = self
            .get_json(CURRENT_PATH, city, &[("city", city.to_string())])
            .await?;
        let current = response.into_current(city, Utc::now());

        debug!(
            "Current AQI for {}: category {} (index {})",
            current.reading.city, current.category, current.reading.aqi
        );
        Ok(current)
    }

    async fn fetch_history(&self, city: &str, days: u32) -> Result<Vec<AirQualityReading>> {
        info!("Fetching {} days of air quality history for {}", days, city);

        let response: HistoryResponse = self
            .get_json(
                HISTORY_PATH,
                city,
                &[("city", city.to_string()), ("days", days.to_string())],
            )
            .await?;

        let readings: Vec<AirQualityReading> = response
            .trends
            .into_iter()
            .map(|mut reading| {
                if reading.city.trim().is_empty() {
                    reading.city = city.to_string();
                }
                reading
            })
            .collect();

        debug!("Received {} historical readings for {}", readings.len(), city);
        Ok(readings)
    }

    async fn fetch_predictions(&self, city: &str, days: u32) -> Result<PredictionResponse> {
        info!("Fetching {}-day AQI predictions for {}", days, city);

        let response: PredictionResponse = self
            .get_json(
                PREDICT_PATH,
                city,
                &[("city", city.to_string()), ("days", days.to_string())],
            )
            .await?;

        debug!(
            "Prediction response for {}: success={}, {} predictions",
            city,
            response.success,
            response.data.as_ref().map_or(0, |d| d.predictions.len())
        );
        Ok(response)
    }
}
