//! Provides clients and utilities for interacting with the air quality backend.
//!
//! Includes:
//! - `client`: HTTP client for the real backend.
//! - `mock`: offline provider generating plausible readings for a fixed set of cities.
//!
//! Both implement [`AirQualityApi`], which is what the screen controllers depend on.

mod client;
mod mock;

pub use client::*;
pub use mock::*;

use crate::error::Result;
use crate::models::{AirQualityReading, CurrentAirQuality, PredictionResponse};
use async_trait::async_trait;

/// Days of history or prediction requested when the caller does not say.
pub const DEFAULT_DAYS: u32 = 5;

/// Source of air quality data for a city.
#[async_trait]
pub trait AirQualityApi: Send + Sync {
    /// Latest reading, with its AQI converted to the index scale.
    async fn fetch_current(&self, city: &str) -> Result<CurrentAirQuality>;

    /// Raw historical samples covering the last `days` days.
    async fn fetch_history(&self, city: &str, days: u32) -> Result<Vec<AirQualityReading>>;

    /// Forecast for the next `days` days.
    ///
    /// `Ok` only means the transport succeeded; the response's `success` flag still has to be
    /// checked (see [`PredictionResponse::into_data`]).
    async fn fetch_predictions(&self, city: &str, days: u32) -> Result<PredictionResponse>;
}
