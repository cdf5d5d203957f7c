mod config;
mod run;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use voxrelay_security::ProcessKey;

#[derive(Parser)]
#[command(name = "voxrelay")]
#[command(about = "voxrelay: Telegram voice replies from OpenAI and ElevenLabs")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true, env = "VOXRELAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot (default)
    Run,
    /// Print a fresh process encryption key for ENCRYPTION_KEY
    GenKey,
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let (config, report) = config::load(cli.config.as_deref()).await?;
            voxrelay_logging::init_logger(config.logging.dir.as_deref(), &config.logging.level);
            report.log();
            if !report.is_valid() {
                bail!("configuration has {} error(s); see the log above", report.errors.len());
            }
            run::run_bot(config).await?;
        }
        Commands::GenKey => {
            println!("{}", ProcessKey::generate().to_base64());
        }
        Commands::Config => {
            let (config, report) = config::load(cli.config.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&voxrelay_config::redact(&config))?);
            for warning in &report.warnings {
                println!("warning: {}: {}", warning.path, warning.message);
            }
            for error in &report.errors {
                println!("error: {}: {}", error.path, error.message);
            }
        }
    }

    Ok(())
}
