use std::path::Path;

use clap::Subcommand;
use pomotimer_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "timer.pomodoro_time", "log.level")
        key: String,
    },
    /// Print the effective configuration as TOML
    List,
    /// Print the configuration file path
    Path,
    /// Load the configuration file and report problems
    Check,
}

pub fn run(
    action: ConfigAction,
    path: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::List => {
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Check => {
            if !path.exists() {
                println!("{} (not found, using defaults)", path.display());
            } else {
                // Validate the raw file; the loaded config has already been clamped.
                let raw: Config = toml::from_str(&std::fs::read_to_string(path)?)?;
                raw.timer.validate()?;
                println!("{} ok", path.display());
            }
        }
    }
    Ok(())
}
