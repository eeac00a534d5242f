//! Per-screen state holders.
//!
//! Each screen owns a [`ScreenController`] that moves through `Idle → Loading → Success | Error`
//! and back to `Loading` on every new submission. Submissions are tagged with a sequence number;
//! only the outcome of the most recently issued request is applied, so a slow response can never
//! overwrite the state of a newer one.

mod current;
#[cfg(test)]
pub(crate) mod fake;
mod history;
mod prediction;

pub use current::*;
pub use history::*;
pub use prediction::*;

use crate::error::{AppError, Result};
use tracing::{debug, error, info, warn};

/// Cities offered as suggestions on the history and prediction screens.
pub const SAMPLE_CITIES: [&str; 8] = [
    "New York", "London", "Tokyo", "Paris", "Berlin", "Sydney", "Colombo", "Delhi",
];

/// Quick picks on the current air quality screen.
pub const POPULAR_CITIES: [&str; 6] = ["New York", "London", "Tokyo", "Paris", "Beijing", "Delhi"];

/// Cities from `cities` containing `input` (case-insensitive).
///
/// Nothing is suggested until the input is longer than one character.
pub fn suggest<'a>(input: &str, cities: &[&'a str]) -> Vec<&'a str> {
    let needle = input.trim().to_lowercase();
    if needle.chars().count() <= 1 {
        return Vec::new();
    }
    cities
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&needle))
        .collect()
}

/// Lifecycle of a screen's data.
#[derive(Debug, Clone)]
pub enum ScreenState<T> {
    Idle,
    Loading,
    Success(T),
    Error(AppError),
}

/// Handle for an issued request; pass it back to [`ScreenController::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub city: String,
}

/// Search input plus request/response state for one screen.
#[derive(Debug)]
pub struct ScreenController<T> {
    name: &'static str,
    input: String,
    state: ScreenState<T>,
    last_issued: u64,
}

impl<T> ScreenController<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            input: String::new(),
            state: ScreenState::Idle,
            last_issued: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn state(&self) -> &ScreenState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScreenState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            ScreenState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.state {
            ScreenState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Validates the input and starts a request.
    ///
    /// Blank input is rejected with [`AppError::Validation`] and leaves the state untouched.
    pub fn submit(&mut self) -> Result<RequestTicket> {
        let city = self.input.trim();
        if city.is_empty() {
            warn!("{} screen: rejected empty city input", self.name);
            return Err(AppError::Validation("Please enter a city name".to_string()));
        }

        self.last_issued += 1;
        let ticket = RequestTicket {
            seq: self.last_issued,
            city: city.to_string(),
        };
        self.state = ScreenState::Loading;
        info!(
            "{} screen: request #{} issued for {}",
            self.name, ticket.seq, ticket.city
        );
        Ok(ticket)
    }

    /// Applies the outcome of `ticket`'s request if it is still the latest one.
    ///
    /// Returns `false` when the outcome was stale and discarded. A failure replaces any data
    /// shown before.
    pub fn resolve(&mut self, ticket: &RequestTicket, outcome: Result<T>) -> bool {
        if ticket.seq != self.last_issued {
            debug!(
                "{} screen: discarding stale response #{} (latest is #{})",
                self.name, ticket.seq, self.last_issued
            );
            return false;
        }

        self.state = match outcome {
            Ok(data) => {
                info!("{} screen: request #{} succeeded", self.name, ticket.seq);
                ScreenState::Success(data)
            },
            Err(err) => {
                error!(
                    "{} screen: request #{} for {} failed: {}",
                    self.name, ticket.seq, ticket.city, err
                );
                ScreenState::Error(err)
            },
        };
        true
    }
}
