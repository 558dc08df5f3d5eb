mod config;

pub use config::{Config, LogConfig};

use std::path::PathBuf;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "POMOTIMER_CONFIG";

/// Returns `<config_dir>/pomotimer[-dev]/` based on POMOTIMER_ENV.
///
/// Set POMOTIMER_ENV=dev to use the development directory. The directory
/// is not created; nothing is ever written there.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));

    let env = std::env::var("POMOTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("pomotimer-dev")
    } else {
        base_dir.join("pomotimer")
    }
}
