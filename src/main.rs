// src/main.rs
//
// Diary bootstrap: load config, open the local store, sync with the
// backend once and print a summary.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use filmdiary::application::AppState;
use filmdiary::config::load_effective_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. LOGGING
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("filmdiary=info")),
        )
        .init();

    // 2. CONFIGURATION
    let config = load_effective_config().context("failed to load configuration")?;

    // 3. APPLICATION STATE
    let state = AppState::initialize(config).context("failed to initialize the diary")?;

    // 4. INITIAL SYNC
    if let Err(e) = state.diary_service.refresh().await {
        let notice = state
            .diary_service
            .last_error()
            .map(|n| n.to_string())
            .unwrap_or_else(|| e.to_string());
        log::warn!("Could not load film logs: {}", notice);
    }

    // 5. SUMMARY
    let stats = state.statistics_service.current()?;
    log::info!(
        "{} films logged, {} this year, average rating {:.1}",
        stats.total_films,
        stats.films_this_year,
        stats.average_rating
    );
    for genre in &stats.top_genres {
        log::info!("  {}: {}", genre.genre, genre.count);
    }

    match state.rubric_service.default_rubric()? {
        Some(rubric) => {
            log::info!("Default rubric: {}", rubric.name);
            if let Some(warning) = rubric.weight_warning() {
                log::warn!("{}", warning);
            }
        }
        None => log::info!("No default rubric set"),
    }

    Ok(())
}
