//! Terminal rendering of screen results.
//!
//! Every function here is pure: it takes model data and returns the text to print, so the
//! command layer decides when and where output happens.

use crate::error::AppError;
use crate::history::DayZone;
use crate::models::{
    category_label, AqiLevel, CurrentAirQuality, DailyAggregate, Pollutant, PredictionData,
    TrendPoint,
};
use crate::screens::PredictionView;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as CellColor, ContentArrangement, Table};

const TREND_BAR_WIDTH: f64 = 40.0;

/// Pollutants charted in the intra-day detail view.
const HOURLY_POLLUTANTS: [Pollutant; 4] =
    [Pollutant::Pm25, Pollutant::No2, Pollutant::O3, Pollutant::So2];

fn cell_color(level: AqiLevel) -> CellColor {
    match level {
        AqiLevel::Good => CellColor::Green,
        AqiLevel::Moderate => CellColor::Yellow,
        AqiLevel::UnhealthyForSensitiveGroups => CellColor::DarkYellow,
        AqiLevel::Unhealthy => CellColor::Red,
        AqiLevel::VeryUnhealthy | AqiLevel::Hazardous => CellColor::Magenta,
    }
}

fn text_color(level: AqiLevel) -> Color {
    match level {
        AqiLevel::Good => Color::Green,
        AqiLevel::Moderate => Color::Yellow,
        AqiLevel::UnhealthyForSensitiveGroups => Color::BrightYellow,
        AqiLevel::Unhealthy => Color::Red,
        AqiLevel::VeryUnhealthy | AqiLevel::Hazardous => Color::Magenta,
    }
}

/// Coloured "● Level" marker for an index value.
pub fn level_badge(aqi: f64) -> ColoredString {
    let level = AqiLevel::from_index(aqi);
    format!("● {}", level.label()).color(text_color(level))
}

fn level_cell(aqi: f64) -> Cell {
    let level = AqiLevel::from_index(aqi);
    Cell::new(level.label()).fg(cell_color(level))
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Joins rendered lines, each terminated by a newline.
fn finish(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Current reading card: location, AQI badge, pollutant grid and health tips.
pub fn render_current(current: &CurrentAirQuality) -> String {
    let reading = &current.reading;
    let level = AqiLevel::from_index(reading.aqi);
    let (lat, lon) = reading
        .coordinates
        .map_or((None, None), |c| (c.lat, c.lon));
    let coordinate = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), |v| format!("{:.4}", v));

    let mut lines = vec![
        format!("Air Quality Results for {}", reading.city).bold().to_string(),
        format!("Location: Lat {} | Lon {}", coordinate(lat), coordinate(lon)),
        format!(
            "AQI category {} ({}) {}",
            current.category,
            category_label(current.category),
            level_badge(reading.aqi)
        ),
    ];
    if let Some(meaning) = current.meaning.as_deref().filter(|m| !m.is_empty()) {
        lines.push(meaning.italic().to_string());
    }

    let mut table = new_table();
    table.set_header(vec!["Pollutant", "Level (μg/m³)"]);
    for pollutant in Pollutant::ALL {
        table.add_row(vec![
            Cell::new(pollutant.label()),
            Cell::new(format_value(reading.components.get(pollutant))),
        ]);
    }
    lines.push(table.to_string());

    lines.push("Health Tips".bold().to_string());
    lines.extend(
        level
            .advice()
            .tips()
            .iter()
            .map(|tip| format!("  {} {}", "•".color(text_color(level)), tip)),
    );
    finish(lines)
}

/// Per-day history table, or the empty placeholder.
pub fn render_history(city: &str, days: &[DailyAggregate]) -> String {
    if days.is_empty() {
        return format!("{}\n", "No historical data available for this city".yellow());
    }

    let mut table = new_table();
    table.set_header(vec!["Date", "Avg AQI", "Max AQI", "Min AQI", "Level", "Samples"]);
    for day in days {
        table.add_row(vec![
            Cell::new(day.date.format("%a, %b %-d").to_string()),
            Cell::new(format!("{:.1}", day.avg_aqi)),
            Cell::new(format!("{:.1}", day.max_aqi)),
            Cell::new(format!("{:.1}", day.min_aqi)),
            level_cell(day.avg_aqi),
            Cell::new(day.hourly_data.len()),
        ]);
    }

    finish(vec![
        format!("Air Quality History for {}", city).bold().to_string(),
        format!("Last {} days", days.len()),
        table.to_string(),
    ])
}

/// Hour-by-hour pollutant levels for one day.
pub fn render_day_detail(day: &DailyAggregate, zone: DayZone) -> String {
    let mut header = vec!["Hour".to_string(), "AQI".to_string()];
    header.extend(HOURLY_POLLUTANTS.iter().map(|p| p.label().to_string()));

    let mut table = new_table();
    table.set_header(header);
    for (label, reading) in day.hour_labels(zone).into_iter().zip(&day.hourly_data) {
        let mut row = vec![Cell::new(label), Cell::new(format!("{:.0}", reading.aqi))];
        row.extend(
            HOURLY_POLLUTANTS
                .iter()
                .map(|p| Cell::new(format_value(reading.components.get(*p)))),
        );
        table.add_row(row);
    }

    let title = format!(
        "Pollutant Levels by Hour for {} ({})",
        day.date.format("%a, %b %-d"),
        zone
    );
    finish(vec![title.bold().to_string(), table.to_string()])
}

/// Either the forecast list or the historical list, depending on `view`.
pub fn render_predictions(city: &str, data: &PredictionData, view: PredictionView) -> String {
    let mut table = new_table();

    let title = match view {
        PredictionView::Predictions => {
            let title = format!("Air Quality Predictions for {}", city).bold().to_string();
            if data.predictions.is_empty() {
                return finish(vec![title, "No predictions available".yellow().to_string()]);
            }
            table.set_header(vec!["Day", "Date", "Predicted AQI", "Level"]);
            for point in &data.predictions {
                table.add_row(vec![
                    Cell::new(format!("Day {}", point.day)),
                    Cell::new(point.date.format("%a, %b %-d").to_string()),
                    Cell::new(format!("{:.0}", point.predicted_aqi)),
                    level_cell(point.predicted_aqi),
                ]);
            }
            title
        },
        PredictionView::Historical => {
            let title = format!("Air Quality History for {}", city).bold().to_string();
            if data.historical_data.is_empty() {
                let placeholder = "No historical data available for this city".yellow();
                return finish(vec![title, placeholder.to_string()]);
            }
            table.set_header(vec!["Date", "AQI", "Level"]);
            for point in &data.historical_data {
                table.add_row(vec![
                    Cell::new(point.date.format("%a, %b %-d").to_string()),
                    Cell::new(format!("{:.0}", point.aqi)),
                    level_cell(point.aqi),
                ]);
            }
            title
        },
    };

    finish(vec![title, table.to_string()])
}

/// Horizontal bar chart of the combined trend; the first `historical_len` points are history.
pub fn render_trend(trend: &[TrendPoint], historical_len: usize) -> String {
    let mut lines = vec!["AQI Trend (Historical + Predictions)".bold().to_string()];

    let max = trend.iter().map(|p| p.aqi).fold(1.0_f64, f64::max);
    for (i, point) in trend.iter().enumerate() {
        if i == historical_len && i > 0 {
            lines.push("  ── predictions ──".dimmed().to_string());
        }
        let width = ((point.aqi.max(0.0) / max) * TREND_BAR_WIDTH).round() as usize;
        let level = AqiLevel::from_index(point.aqi);
        lines.push(format!(
            "{:>5} {} {:.0}",
            point.date.format("%-d/%-m").to_string(),
            "█".repeat(width.max(1)).color(text_color(level)),
            point.aqi
        ));
    }
    finish(lines)
}

/// One-line user-facing failure message.
pub fn render_error(err: &AppError) -> String {
    format!("{} {}", "⚠".red(), err.user_message().red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::fake;
    use chrono::NaiveDate;

    #[test]
    fn test_render_current_marks_missing_pollutants() {
        let mut current = fake::current("London", 4);
        current.reading.coordinates = None;

        let text = render_current(&current);

        assert!(text.contains("Air Quality Results for London"));
        assert!(text.contains("Poor"));
        assert!(text.contains("N/A")); // PM10 and SO2 are absent
        assert!(text.contains("240.00"));
        assert!(text.contains("Keep windows closed if possible."));
    }

    #[test]
    fn test_render_history_empty_placeholder() {
        let text = render_history("Sydney", &[]);
        assert!(text.contains("No historical data available for this city"));
    }

    #[test]
    fn test_render_history_rows() {
        let days = crate::history::aggregate_by_day(
            vec![
                fake::reading("Paris", 1, 8, 40.0),
                fake::reading("Paris", 1, 9, 60.0),
            ],
            DayZone::Utc,
        );
        let text = render_history("Paris", &days);
        assert!(text.contains("Last 1 days"));
        assert!(text.contains("Mon, Jan 1"));
        assert!(text.contains("50.0"));
        assert!(text.contains("Good"));
    }

    #[test]
    fn test_render_day_detail_has_hour_rows() {
        let days = crate::history::aggregate_by_day(
            vec![
                fake::reading("Paris", 1, 8, 40.0),
                fake::reading("Paris", 1, 9, 60.0),
            ],
            DayZone::Utc,
        );
        let text = render_day_detail(&days[0], DayZone::Utc);
        assert!(text.contains("08:00"));
        assert!(text.contains("09:00"));
        assert!(text.contains("18.50"));
    }

    #[test]
    fn test_render_predictions_views() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let data = PredictionData {
            predictions: vec![crate::models::PredictionPoint {
                day: 1,
                date,
                predicted_aqi: 160.0,
            }],
            historical_data: Vec::new(),
        };

        let predictions = render_predictions("Delhi", &data, PredictionView::Predictions);
        assert!(predictions.contains("Day 1"));
        assert!(predictions.contains("Unhealthy"));

        let historical = render_predictions("Delhi", &data, PredictionView::Historical);
        assert!(historical.contains("No historical data available"));
    }

    #[test]
    fn test_render_trend_separates_predictions() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let trend = vec![
            TrendPoint { date: day(1), aqi: 50.0 },
            TrendPoint { date: day(2), aqi: 100.0 },
        ];
        let text = render_trend(&trend, 1);
        assert!(text.contains("predictions"));
        assert!(text.contains("1/2"));
        assert!(text.contains("2/2"));
    }
}
