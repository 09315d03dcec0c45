use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

/// Default location of the settings document, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Run configuration, loaded once at startup and passed explicitly to each stage.
/// Unrecognized keys in the settings document are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_team_name")]
    pub team_name: String,
    pub team_page_url: String,
    #[serde(default = "default_game_duration_hours")]
    pub game_duration_hours: f64,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

fn default_team_name() -> String {
    "Team".to_string()
}

fn default_game_duration_hours() -> f64 {
    1.0
}

fn default_output_file() -> PathBuf {
    PathBuf::from("docs/hockey_schedule.ics")
}

impl Config {
    /// Read and validate the settings document. Missing `team_page_url` and a
    /// non-positive game duration are startup errors.
    pub fn load(path: &Path) -> Result<Self, String> {
        let body = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        let config: Config = serde_json::from_str(&body)
            .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;

        if config.team_page_url.trim().is_empty() {
            return Err("config key team_page_url must not be empty".to_string());
        }
        if !(config.game_duration_hours > 0.0) {
            return Err(format!(
                "config key game_duration_hours must be positive, got {}",
                config.game_duration_hours
            ));
        }

        info!(
            team_name = %config.team_name,
            url = %config.team_page_url,
            output = %config.output_file.display(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
