pub mod agenda;
pub mod analyze;
pub mod doctor;
pub mod serve;

use std::path::Path;

use agendai_config::AppConfig;

/// Load from `path` when given, else from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let loaded = match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    };
    loaded.map_err(|e| format!("Failed to load config: {e}").into())
}
