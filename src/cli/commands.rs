use crate::api::{AirQualityApi, AirQualityClient, MockDataProvider, DEFAULT_DAYS};
use crate::config::AppConfig;
use crate::display;
use crate::error::{AppError, Result};
use crate::history::DayZone;
use crate::screens::{
    suggest, CurrentScreen, HistoryScreen, PredictionScreen, PredictionView, ScreenState,
    SAMPLE_CITIES,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Check current air quality, browse recent history and view AQI predictions for a city
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use generated data instead of contacting the backend
    #[arg(long, global = true)]
    pub offline: bool,

    /// Zone used to split history into days: utc, local, or an offset such as +05:30
    #[arg(long, global = true)]
    pub zone: Option<String>,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the latest air quality reading for a city
    Current(CurrentArgs),

    /// Show per-day AQI summaries for the last few days
    History(HistoryArgs),

    /// Show the AQI forecast for a city
    Predict(PredictArgs),

    /// List known cities, optionally filtered by a search term
    Cities(CitiesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CurrentArgs {
    /// City name
    pub city: String,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// City name
    pub city: String,

    /// Number of days of history to fetch
    #[arg(short, long, default_value_t = DEFAULT_DAYS)]
    pub days: u32,

    /// Also show hour-by-hour pollutant levels for this day (YYYY-MM-DD)
    #[arg(long)]
    pub day: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// City name
    pub city: String,

    /// Number of days to predict
    #[arg(short, long, default_value_t = DEFAULT_DAYS)]
    pub days: u32,

    /// Which list to show under the trend chart
    #[arg(long, value_enum, default_value_t = ViewArg::Predictions)]
    pub view: ViewArg,
}

#[derive(Args, Debug, Clone)]
pub struct CitiesArgs {
    /// Filter (at least two characters)
    pub query: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewArg {
    Historical,
    Predictions,
}

impl From<ViewArg> for PredictionView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Historical => PredictionView::Historical,
            ViewArg::Predictions => PredictionView::Predictions,
        }
    }
}

/// Returns the screen's data, or the failure that ended its last request.
fn settled<T>(state: &ScreenState<T>) -> Result<&T> {
    match state {
        ScreenState::Success(data) => Ok(data),
        ScreenState::Error(err) => Err(err.clone()),
        ScreenState::Idle | ScreenState::Loading => {
            Err(AppError::Cli("No request has completed yet".to_string()))
        },
    }
}

/// CLI application: the three screens sharing one data source.
pub struct App {
    api: Arc<dyn AirQualityApi>,
    current: CurrentScreen,
    history: HistoryScreen,
    prediction: PredictionScreen,
    show_progress: bool,
}

impl App {
    /// Create the application against the backend, or the offline generator when `offline` is set.
    pub fn new(config: &AppConfig, offline: bool) -> Result<Self> {
        let api: Arc<dyn AirQualityApi> = if offline {
            info!("Offline mode: using generated air quality data");
            Arc::new(MockDataProvider::new())
        } else {
            info!("Using backend at {}", config.api.base_url);
            Arc::new(AirQualityClient::new(&config.api)?)
        };

        let mut app = Self::with_api(api, config.day_zone);
        app.show_progress = true;
        Ok(app)
    }

    /// Create the application on top of any data source. No spinner is drawn.
    pub fn with_api(api: Arc<dyn AirQualityApi>, zone: DayZone) -> Self {
        Self {
            api,
            current: CurrentScreen::new(),
            history: HistoryScreen::new(zone),
            prediction: PredictionScreen::new(),
            show_progress: false,
        }
    }

    pub fn zone(&self) -> DayZone {
        self.history.zone()
    }

    /// Run one command and return the text to print.
    pub async fn run_command(&mut self, command: Commands) -> Result<String> {
        debug!("Running command: {:?}", command);
        match command {
            Commands::Current(args) => self.check_current(&args.city).await,
            Commands::History(args) => {
                let mut out = self.show_history(&args.city, args.days).await?;
                if let Some(day) = args.day {
                    out.push_str(&self.toggle_day(day)?);
                }
                Ok(out)
            },
            Commands::Predict(args) => {
                self.prediction.select_view(args.view.into());
                self.show_predictions(&args.city, args.days).await
            },
            Commands::Cities(args) => Ok(list_cities(args.query.as_deref())),
        }
    }

    fn spinner(&self, message: &str) -> Result<ProgressBar> {
        let bar = if self.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Ok(bar)
    }

    /// "Air Quality Checker" screen.
    pub async fn check_current(&mut self, city: &str) -> Result<String> {
        let bar = self.spinner("Checking air quality...")?;
        let submitted = self.current.check_city(city, self.api.as_ref()).await;
        bar.finish_and_clear();
        submitted?;

        let current = settled(self.current.state())?;
        Ok(display::render_current(current))
    }

    /// "Historical Air Quality" screen, without a day selected.
    pub async fn show_history(&mut self, city: &str, days: u32) -> Result<String> {
        self.history.set_city(city);
        let bar = self.spinner("Fetching historical data...")?;
        let submitted = self.history.fetch(self.api.as_ref(), days).await;
        bar.finish_and_clear();
        submitted?;

        let aggregates = settled(self.history.state())?;
        Ok(display::render_history(
            self.history.controller().input().trim(),
            aggregates,
        ))
    }

    /// Days in the current history result, in the order they were first seen.
    pub fn history_days(&self) -> Vec<NaiveDate> {
        self.history
            .controller()
            .data()
            .map(|days| days.iter().map(|d| d.date).collect())
            .unwrap_or_default()
    }

    /// Select or deselect a day of the current history result.
    ///
    /// Returns the hour-by-hour view when the day ends up selected, and an empty string when it
    /// was deselected.
    pub fn toggle_day(&mut self, date: NaiveDate) -> Result<String> {
        if self.history.controller().data().is_none() {
            return Err(AppError::Cli("Fetch history before selecting a day".to_string()));
        }
        if !self.history_days().contains(&date) {
            warn!("Day {} is not part of the current history", date);
            return Err(AppError::Cli(format!("No history for {}", date)));
        }

        self.history.toggle_day(date);
        Ok(self
            .history
            .selected_aggregate()
            .map(|day| display::render_day_detail(day, self.history.zone()))
            .unwrap_or_default())
    }

    /// "Air Quality Predictions" screen.
    pub async fn show_predictions(&mut self, city: &str, days: u32) -> Result<String> {
        self.prediction.set_city(city);
        let bar = self.spinner("Fetching predictions...")?;
        let submitted = self.prediction.fetch(self.api.as_ref(), days).await;
        bar.finish_and_clear();
        submitted?;

        self.render_prediction_screen()
    }

    /// Switch between the forecast and historical lists of the current prediction result.
    pub fn switch_view(&mut self, view: PredictionView) -> Result<String> {
        self.prediction.select_view(view);
        self.render_prediction_screen()
    }

    pub fn prediction_view(&self) -> PredictionView {
        self.prediction.view()
    }

    fn render_prediction_screen(&self) -> Result<String> {
        let data = settled(self.prediction.state())?;
        let mut out = display::render_trend(&self.prediction.trend(), data.historical_data.len());
        out.push_str(&display::render_predictions(
            self.prediction.controller().input().trim(),
            data,
            self.prediction.view(),
        ));
        Ok(out)
    }
}

/// Known cities, or the ones matching `query` once it is long enough to filter on.
pub fn list_cities(query: Option<&str>) -> String {
    let cities: Vec<&str> = match query {
        Some(query) if query.trim().chars().count() > 1 => suggest(query, &SAMPLE_CITIES),
        _ => SAMPLE_CITIES.to_vec(),
    };
    if cities.is_empty() {
        return "No matching cities\n".to_string();
    }
    cities.iter().map(|city| format!("{}\n", city)).collect()
}
