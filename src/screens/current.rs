use super::{ScreenController, ScreenState};
use crate::api::AirQualityApi;
use crate::error::Result;
use crate::models::CurrentAirQuality;

/// "Air Quality Checker": the latest reading for one city.
#[derive(Debug)]
pub struct CurrentScreen {
    controller: ScreenController<CurrentAirQuality>,
}

impl Default for CurrentScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrentScreen {
    pub fn new() -> Self {
        Self {
            controller: ScreenController::new("current"),
        }
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.controller.set_input(city);
    }

    pub fn state(&self) -> &ScreenState<CurrentAirQuality> {
        self.controller.state()
    }

    pub fn controller(&self) -> &ScreenController<CurrentAirQuality> {
        &self.controller
    }

    /// Fetches the current reading for the entered city.
    ///
    /// Only a validation failure is returned as `Err`; fetch failures end up in the screen state.
    pub async fn check(&mut self, api: &dyn AirQualityApi) -> Result<()> {
        let ticket = self.controller.submit()?;
        let outcome = api.fetch_current(&ticket.city).await;
        self.controller.resolve(&ticket, outcome);
        Ok(())
    }

    /// Quick pick: sets the city and checks it in one go.
    pub async fn check_city(&mut self, city: &str, api: &dyn AirQualityApi) -> Result<()> {
        self.set_city(city);
        self.check(api).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::screens::fake::{self, FakeApi};

    #[tokio::test]
    async fn test_check_success() {
        let api = FakeApi::new();
        api.expect_current(Ok(fake::current("London", 2)));
        let mut screen = CurrentScreen::new();
        screen.set_city(" London ");

        screen.check(&api).await.unwrap();

        assert_eq!(api.current_calls(), vec!["London".to_string()]);
        let data = screen.controller().data().expect("success state");
        assert_eq!(data.category, 2);
        assert_eq!(data.reading.aqi, 100.0);
    }

    #[tokio::test]
    async fn test_empty_city_never_calls_api() {
        let api = FakeApi::new();
        let mut screen = CurrentScreen::new();
        screen.set_city("   ");

        let result = screen.check(&api).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(api.total_calls(), 0);
        assert!(matches!(screen.state(), ScreenState::Idle));
    }

    #[tokio::test]
    async fn test_failure_clears_previous_reading() {
        let api = FakeApi::new();
        let mut screen = CurrentScreen::new();

        api.expect_current(Ok(fake::current("Paris", 1)));
        screen.check_city("Paris", &api).await.unwrap();
        assert!(screen.controller().data().is_some());

        api.expect_current(Err(AppError::Server {
            status: 500,
            message: "boom".to_string(),
        }));
        screen.check_city("Paris", &api).await.unwrap();

        assert!(screen.controller().data().is_none());
        let err = screen.controller().error().expect("error state");
        assert_eq!(
            err.user_message(),
            "Failed to fetch air quality data. Please try again."
        );
    }
}
