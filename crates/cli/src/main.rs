mod cli;
mod logging;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use sheetload_core::config::constants;
use sheetload_core::error::Result;
use sheetload_core_full::Settings;
use sheetload_core_full::commands::{RunOptions, check_command, run_command};

fn main() {
    constants::init_constants();

    let log_file = match logging::create_log_file() {
        Ok((file, path)) => Some((file, path)),
        Err(e) => {
            eprintln!("Log file not created: {e}");
            None
        }
    };
    let log_path = log_file.as_ref().map(|(_, path)| path.clone());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .with(log_file.map(|(file, _)| {
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(EnvFilter::new("debug"))
        }))
        .init();

    if let Some(path) = log_path {
        debug!("Log file: {}", path.display());
    }

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Cli::parse();
    match args.cmd {
        Commands::Run {
            input_dir,
            sheet,
            table,
            primary_key,
            replace,
            dry_run,
            config,
        } => {
            let mut settings = load_settings(config)?;
            if let Some(input_dir) = input_dir {
                settings.excel.input_path = input_dir;
            }
            if let Some(sheet) = sheet {
                settings.excel.sheet_name = sheet;
            }
            if let Some(table) = table {
                settings.target_table = table;
            }
            if primary_key.is_some() {
                settings.primary_key = primary_key;
            }

            let report = run_command(&settings, RunOptions { replace, dry_run })?;
            info!("✓ {} new row(s) in {}", report.inserted, report.table);
        }
        Commands::Check { config } => {
            let settings = load_settings(config)?;
            check_command(&settings)?;
            info!("✓ PostgreSQL reachable at {}", settings.pg.display_url());
        }
    }
    Ok(())
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings> {
    let settings = Settings::load(config.as_deref())?;
    debug!("Settings: {:?}", settings);
    Ok(settings)
}
