mod api;
mod cli;
mod config;
mod display;
mod error;
mod history;
mod logging;
mod models;
mod screens;

use clap::Parser;
use cli::{App, Cli, Tab};
use colored::*;
use config::AppConfig;
use error::Result;
use screens::{POPULAR_CITIES, SAMPLE_CITIES};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?.with_zone_override(cli.zone.as_deref())?;

    // Held until exit so buffered file logs are flushed
    let log_guard = logging::init(&config.log)?;

    info!("Initializing air quality app...");
    let mut app = match App::new(&config, cli.offline) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!("{}", display::render_error(&e));
            return Err(e);
        },
    };

    if let Some(command) = cli.command {
        return match app.run_command(command).await {
            Ok(out) => {
                print!("{}", out);
                Ok(())
            },
            Err(e) => {
                error!("Command execution failed: {:?}", e);
                eprintln!("{}", display::render_error(&e));
                drop(log_guard);
                std::process::exit(1);
            },
        };
    }

    println!("{}", "Welcome to the Air Quality Checker!".cyan().bold());
    println!("Days are grouped in {}\n", app.zone());

    loop {
        let tab = cli::prompt_tab()?;
        println!("\n---\n");

        let result = match tab {
            Tab::AirQuality => air_quality_tab(&mut app).await,
            Tab::History => history_tab(&mut app).await,
            Tab::Predictor => predictor_tab(&mut app).await,
            Tab::Exit => {
                println!("{}", "Exiting application. Goodbye!".green());
                break;
            },
        };

        if let Err(e) = result {
            error!("Command execution failed: {:?}", e);
            println!("{}", display::render_error(&e));
        }

        println!("\n---\n");
    }

    Ok(())
}

async fn air_quality_tab(app: &mut App) -> Result<()> {
    let city = match cli::prompt_popular_city(&POPULAR_CITIES)? {
        Some(city) => city,
        None => cli::prompt_city(&SAMPLE_CITIES)?,
    };
    print!("{}", app.check_current(&city).await?);
    Ok(())
}

async fn history_tab(app: &mut App) -> Result<()> {
    let city = cli::prompt_city(&SAMPLE_CITIES)?;
    let days = cli::prompt_days()?;
    print!("{}", app.show_history(&city, days).await?);

    let mut selected = None;
    while let Some(day) = cli::prompt_day(&app.history_days(), selected)? {
        let detail = app.toggle_day(day)?;
        selected = if detail.is_empty() { None } else { Some(day) };
        print!("{}", detail);
    }
    Ok(())
}

async fn predictor_tab(app: &mut App) -> Result<()> {
    let city = cli::prompt_city(&SAMPLE_CITIES)?;
    let days = cli::prompt_days()?;
    print!("{}", app.show_predictions(&city, days).await?);

    while let Some(view) = cli::prompt_view(app.prediction_view())? {
        print!("{}", app.switch_view(view)?);
    }
    Ok(())
}
