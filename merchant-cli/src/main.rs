mod api;
mod cli;
mod config;
mod forms;
mod sheet;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;

use cli::{Cli, Commands};
use config::Config;

/// Default log filter for the given number of `-v` flags
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(verbose: u8) {
    // RUST_LOG wins over -v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(verbose)))
        .format_timestamp(None)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(cli.config.as_deref()).context("Failed to load configuration")
}

async fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Update(args) => {
            let config = load_config(&cli)?;
            cli::commands::handle_update_command(args.clone(), &config).await
        }
        Commands::Upload { file, yes, rows } => {
            let config = load_config(&cli)?;
            cli::commands::handle_upload_command(file, *yes, *rows, &config).await
        }
        Commands::Preview { file, rows, format } => {
            let rows = rows.unwrap_or_else(config::preview_rows_from_env);
            cli::commands::handle_preview_command(file, rows, *format)
        }
        Commands::Template { output } => {
            cli::commands::handle_template_command(output)?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
