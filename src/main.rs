// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::{CommandFactory, Parser};
use cli::{Args, is_config_update};
use commands::{
    handle_config_update_command, handle_list_config_command, open_service, run_command,
};
use tabellone::config::Config;
use tabellone::error::AppError;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Configuration operations run before logging is installed
    if args.list_config {
        return handle_list_config_command().await;
    }
    if is_config_update(&args) {
        return handle_config_update_command(&args).await;
    }

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load().await?;
    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    info!(
        "tabellone {} starting, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_file_path
    );

    let service = open_service(&args, &config).await?;
    if let Err(e) = run_command(&service, &command) {
        error!("Command failed: {e}");
        return Err(e);
    }

    Ok(())
}
