use super::{ScreenController, ScreenState};
use crate::api::AirQualityApi;
use crate::error::Result;
use crate::models::{PredictionData, PredictionResponse, TrendPoint};

/// Which list the prediction screen shows under the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionView {
    Historical,
    #[default]
    Predictions,
}

/// "Air Quality Predictions": the forecast plus the recent days it was based on.
#[derive(Debug)]
pub struct PredictionScreen {
    controller: ScreenController<PredictionData>,
    view: PredictionView,
}

impl Default for PredictionScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionScreen {
    pub fn new() -> Self {
        Self {
            controller: ScreenController::new("prediction"),
            view: PredictionView::default(),
        }
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.controller.set_input(city);
    }

    pub fn state(&self) -> &ScreenState<PredictionData> {
        self.controller.state()
    }

    pub fn controller(&self) -> &ScreenController<PredictionData> {
        &self.controller
    }

    pub fn view(&self) -> PredictionView {
        self.view
    }

    pub fn select_view(&mut self, view: PredictionView) {
        self.view = view;
    }

    /// Fetches predictions for the entered city.
    ///
    /// Both a transport failure and a response flagged `success: false` end in the error state.
    /// Only a validation failure is returned as `Err`.
    pub async fn fetch(&mut self, api: &dyn AirQualityApi, days: u32) -> Result<()> {
        let ticket = self.controller.submit()?;
        let outcome = api
            .fetch_predictions(&ticket.city, days)
            .await
            .and_then(PredictionResponse::into_data);
        self.controller.resolve(&ticket, outcome);
        Ok(())
    }

    /// Historical points followed by predicted points, for the combined trend.
    pub fn trend(&self) -> Vec<TrendPoint> {
        self.controller
            .data()
            .map(|data| {
                data.historical_data
                    .iter()
                    .cloned()
                    .chain(data.predictions.iter().map(|p| TrendPoint {
                        date: p.date,
                        aqi: p.predicted_aqi,
                    }))
                    .collect()
            })
            .unwrap_or_default()
    }
}
