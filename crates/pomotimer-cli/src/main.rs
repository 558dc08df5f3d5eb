use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pomotimer_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "pomotimer", version, about = "Pomodoro timer for the terminal")]
struct Cli {
    /// Configuration file (defaults to $POMOTIMER_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pomotimer={level},pomotimer_core={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load_from(&path)?;
    init_tracing(&config.log.level);

    match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Config { action } => commands::config::run(action, &path, &config),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomotimer", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
