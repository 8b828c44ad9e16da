//! NutriScan CLI - Analyze nutrition labels from the command line.

use clap::Parser;
use nutriscan_cli::commands;
use nutriscan_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> nutriscan_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config, defaults when the file is absent
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;
    config.validate()?;

    // Determine output settings
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let theme = cli.theme.map(Into::into).unwrap_or(config.settings.theme);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled, theme);

    // Handle commands
    match cli.command {
        Command::Analyze(args) => {
            let api_key = config.resolve_api_key(cli.api_key)?;
            commands::execute_analyze(args, &config, &config_path, api_key, &formatter).await?;
        }
        Command::Parse(args) => {
            commands::execute_parse(args, &formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
