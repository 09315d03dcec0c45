use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hockey_schedule_ics::config::{Config, DEFAULT_CONFIG_PATH};
use hockey_schedule_ics::ical;
use hockey_schedule_ics::parser;
use hockey_schedule_ics::season::SeasonYears;
use hockey_schedule_ics::truenorth::TrueNorth;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();

    let config = match Config::load(Path::new(DEFAULT_CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration stage failed");
            return ExitCode::FAILURE;
        }
    };

    let capture = match TrueNorth::fetch(&config.team_page_url).await {
        Ok(capture) => capture,
        Err(e) => {
            error!(error = %e, "Fetch stage failed");
            return ExitCode::FAILURE;
        }
    };

    let season = SeasonYears::from_page_text(&capture.page_text, chrono::Local::now().date_naive());

    let mut games = Vec::new();
    let mut skipped = 0usize;
    for raw in &capture.raw_items {
        let Some(item) = raw.as_object() else {
            warn!("Skipping non-object schedule item");
            skipped += 1;
            continue;
        };
        match parser::parse_game(item, &season) {
            Ok(game) => games.push(game),
            Err(reason) => {
                warn!(%reason, "Skipping schedule item");
                skipped += 1;
            }
        }
    }

    let calendar = ical::build_calendar(&games, &config);
    let emitted = calendar.components.len();
    if let Err(e) = ical::write_calendar(&config.output_file, &calendar) {
        error!(error = %e, "Emit stage failed");
        return ExitCode::FAILURE;
    }

    info!(
        total = capture.raw_items.len(),
        skipped,
        emitted,
        "Run complete"
    );
    ExitCode::SUCCESS
}
