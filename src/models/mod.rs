//! Defines the data structures and models used throughout the application.
//!
//! This includes structures representing data fetched from the air quality backend,
//! data derived from it on the client (daily aggregates), and AQI classification helpers.

mod air_quality;
pub mod serde_time;

pub use air_quality::*;
