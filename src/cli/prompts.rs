//! Interactive prompts used by the menu loop.

use crate::api::DEFAULT_DAYS;
use crate::error::Result;
use crate::screens::{suggest, PredictionView};
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input, Select};

/// Largest number of days the history and prediction prompts accept.
pub const MAX_DAYS: u32 = 30;

/// Top-level menu entries, one per dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    AirQuality,
    History,
    Predictor,
    Exit,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::AirQuality, Tab::History, Tab::Predictor, Tab::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::AirQuality => "Air Quality",
            Tab::History => "History",
            Tab::Predictor => "AQI Predictor",
            Tab::Exit => "Exit",
        }
    }
}

/// Asks which tab to open. Cancelling (Esc / Ctrl+C) means exit.
pub fn prompt_tab() -> Result<Tab> {
    let labels: Vec<&str> = Tab::ALL.iter().map(Tab::label).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact_opt()?
        .unwrap_or(Tab::ALL.len() - 1);
    Ok(Tab::ALL[selection])
}

/// Entries offered after the user typed `input`: matching cities, then the raw input itself.
pub fn city_choices(input: &str, cities: &[&str]) -> Vec<String> {
    let typed = input.trim();
    let mut choices: Vec<String> = suggest(typed, cities)
        .into_iter()
        .filter(|city| !city.eq_ignore_ascii_case(typed))
        .map(str::to_string)
        .collect();
    choices.push(typed.to_string());
    choices
}

/// Reads a city name, offering `cities` that match what was typed.
///
/// An empty answer is returned as-is so the screen can reject it.
pub fn prompt_city(cities: &[&str]) -> Result<String> {
    let theme = ColorfulTheme::default();
    let input: String = Input::with_theme(&theme)
        .with_prompt("Enter city name")
        .allow_empty(true)
        .interact_text()?;

    let choices = city_choices(&input, cities);
    if choices.len() == 1 {
        return Ok(input.trim().to_string());
    }

    let labels: Vec<String> = choices
        .iter()
        .enumerate()
        .map(|(i, city)| {
            if i == choices.len() - 1 {
                format!("Use '{}'", city)
            } else {
                city.clone()
            }
        })
        .collect();
    let selection = FuzzySelect::with_theme(&theme)
        .with_prompt("Did you mean")
        .items(&labels)
        .default(0)
        .interact_opt()?
        .unwrap_or(choices.len() - 1);
    Ok(choices[selection].clone())
}

/// Quick pick among `popular` cities, or `None` to type one instead.
pub fn prompt_popular_city(popular: &[&str]) -> Result<Option<String>> {
    let mut labels: Vec<&str> = popular.to_vec();
    labels.push("Search for another city");
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Popular cities")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(selection
        .filter(|&i| i < popular.len())
        .map(|i| popular[i].to_string()))
}

/// Number of days for history or predictions.
pub fn prompt_days() -> Result<u32> {
    let days = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Number of days (1-{})", MAX_DAYS))
        .default(DEFAULT_DAYS)
        .validate_with(|days: &u32| -> std::result::Result<(), String> {
            if (1..=MAX_DAYS).contains(days) {
                Ok(())
            } else {
                Err(format!("Enter a number between 1 and {}", MAX_DAYS))
            }
        })
        .interact_text()?;
    Ok(days)
}

/// Picks a day to drill into, or `None` to go back to the menu.
pub fn prompt_day(days: &[NaiveDate], selected: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let mut labels: Vec<String> = days
        .iter()
        .map(|day| {
            let marker = if Some(*day) == selected { " (selected)" } else { "" };
            format!("{}{}", day.format("%a, %b %-d"), marker)
        })
        .collect();
    labels.push("Back".to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a day for hourly pollutant levels")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(selection.and_then(|i| days.get(i).copied()))
}

/// Offers the other prediction list, or `None` to go back to the menu.
pub fn prompt_view(current: PredictionView) -> Result<Option<PredictionView>> {
    let other = match current {
        PredictionView::Predictions => PredictionView::Historical,
        PredictionView::Historical => PredictionView::Predictions,
    };
    let label = match other {
        PredictionView::Predictions => "Show predictions",
        PredictionView::Historical => "Show historical data",
    };

    let selection = Select::with_theme(&ColorfulTheme::default())
        .items(&[label, "Back"])
        .default(0)
        .interact_opt()?;
    Ok(match selection {
        Some(0) => Some(other),
        _ => None,
    })
}
