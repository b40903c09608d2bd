mod config;

pub use config::{CalculatorConfig, Config, ListConfig, PromptConfig, TimerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/dayboard[-dev]/` based on DAYBOARD_ENV.
///
/// Set DAYBOARD_ENV=dev to use the development config directory. The
/// directory is not created here; only [`Config::save`] writes to it.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .ok_or(ConfigError::NoConfigDir)?;

    let env = std::env::var("DAYBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    Ok(if env == "dev" {
        base_dir.join("dayboard-dev")
    } else {
        base_dir.join("dayboard")
    })
}
