//! Application startup
//!
//! Order matters: the configuration file is read before the logger starts
//! because it may choose the log level, format and sink. Errors before that
//! point go to stderr; everything after goes through the logger.

use super::cli::Args;
use super::error::{AppError, AppResult};
use super::runner::{self, RunReport};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version;
use clap::Parser;

/// Run the application, returning the process exit code
pub async fn startup() -> i32 {
    let mut args = Args::parse();

    match args.load_config_file().await {
        Ok(Some(config)) => {
            if let Err(e) = args.apply_file_config(&config) {
                eprintln!("Error in configuration file: {}", e);
                return 1;
            }
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    let use_color = args.use_color();
    colored::control::set_override(use_color);

    let log_file = args
        .effective_log_file()
        .map(|path| path.to_string_lossy().into_owned());
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    )
    .map_err(|e| AppError::Logging {
        message: e.to_string(),
    }) {
        eprintln!("Error: {}", e);
        return 1;
    }

    log::info!("boundbuf {} starting", version::describe());
    log::debug!("Final arguments: {:?}", args);

    let shutdown = ShutdownCoordinator::new();
    shutdown.install_signal_handlers();

    match run_and_verify(&args, &shutdown).await {
        Ok(report) => {
            print!("{}", report.summary());
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Running producer/consumer workload");
            1
        }
    }
}

async fn run_and_verify(args: &Args, shutdown: &ShutdownCoordinator) -> AppResult<RunReport> {
    let report = runner::run(args.run_settings()?, shutdown).await?;
    report.verify()?;
    log::info!(
        "Verified {} values delivered exactly once",
        report.total_consumed()
    );
    Ok(report)
}
