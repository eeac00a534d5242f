use super::{ScreenController, ScreenState};
use crate::api::AirQualityApi;
use crate::error::Result;
use crate::history::{aggregate_by_day, DayZone};
use crate::models::DailyAggregate;
use chrono::NaiveDate;

/// "Historical Air Quality": per-day summaries with an optional drill-down into one day.
#[derive(Debug)]
pub struct HistoryScreen {
    controller: ScreenController<Vec<DailyAggregate>>,
    zone: DayZone,
    selected_day: Option<NaiveDate>,
}

impl HistoryScreen {
    pub fn new(zone: DayZone) -> Self {
        Self {
            controller: ScreenController::new("history"),
            zone,
            selected_day: None,
        }
    }

    pub fn zone(&self) -> DayZone {
        self.zone
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.controller.set_input(city);
    }

    pub fn state(&self) -> &ScreenState<Vec<DailyAggregate>> {
        self.controller.state()
    }

    pub fn controller(&self) -> &ScreenController<Vec<DailyAggregate>> {
        &self.controller
    }

    /// Fetches `days` days of samples for the entered city and groups them per day.
    ///
    /// Clears any day selection. Only a validation failure is returned as `Err`.
    pub async fn fetch(&mut self, api: &dyn AirQualityApi, days: u32) -> Result<()> {
        let ticket = self.controller.submit()?;
        self.selected_day = None;

        let zone = self.zone;
        let outcome = api
            .fetch_history(&ticket.city, days)
            .await
            .map(|readings| aggregate_by_day(readings, zone));
        self.controller.resolve(&ticket, outcome);
        Ok(())
    }

    /// Selects `date` for the intra-day view, or deselects it if it already was.
    ///
    /// Returns the selection after the toggle.
    pub fn toggle_day(&mut self, date: NaiveDate) -> Option<NaiveDate> {
        self.selected_day = if self.selected_day == Some(date) {
            None
        } else {
            Some(date)
        };
        self.selected_day
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    /// The aggregate of the selected day, if it is part of the current result.
    pub fn selected_aggregate(&self) -> Option<&DailyAggregate> {
        let date = self.selected_day?;
        self.controller
            .data()?
            .iter()
            .find(|aggregate| aggregate.date == date)
    }
}
