//! File logging for the tracker.
//!
//! Logs rotate inside `<data_dir>/logs`. Initialization happens at most once
//! per process; later calls with the same directory are no-ops.
//!
//! Records are written straight to the file: the handle lives in a static
//! that is never dropped, so nothing buffered would survive process exit.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "calorie";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    log_dir: PathBuf,
    logger: LoggerHandle,
}

/// Starts the file logger.
///
/// # Errors
/// - Returns an error when `level` is not a valid log spec.
/// - Returns an error when logging is already active in another directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized at `{}`",
            state.log_dir.display()
        ));
    }

    let level = normalize_level(level)?;
    LOGGING_STATE
        .get_or_try_init(|| -> Result<LoggingState, String> {
            std::fs::create_dir_all(log_dir)
                .map_err(|err| format!("failed to create log directory `{}`: {err}", log_dir.display()))?;

            let logger = Logger::try_with_str(level)
                .map_err(|err| format!("invalid log level `{level}`: {err}"))?
                .log_to_file(FileSpec::default().directory(log_dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::Direct)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))?;

            info!(
                "event=app_start status=ok level={} version={}",
                level,
                env!("CARGO_PKG_VERSION")
            );

            Ok(LoggingState {
                log_dir: log_dir.to_path_buf(),
                logger,
            })
        })
        .map(|_| ())
}

/// Flushes pending records. Call before the process exits.
pub fn flush_logging() {
    if let Some(state) = LOGGING_STATE.get() {
        state.logger.flush();
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}
