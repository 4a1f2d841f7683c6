#![deny(missing_docs)]
//! Shared logging utilities for the chat outline workspace.
//!
//! This crate provides the `outline_*` logging macros used across the codebase,
//! a destination-aware initializer for embedding hosts and a minimal test
//! initializer for the global logger.

use std::cell::Cell;
use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local count of completed outline scans.
    static SCAN_EPOCH: Cell<u64> = const { Cell::new(0) };
}

/// Sets the scan epoch for the current thread.
/// The change watcher calls this once per completed scan.
pub fn set_scan_epoch(epoch: u64) {
    SCAN_EPOCH.with(|v| v.set(epoch));
}

/// Retrieves the scan epoch for the current thread.
/// Returns 0 if no scan has completed yet.
pub fn scan_epoch() -> u64 {
    SCAN_EPOCH.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! outline_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! outline_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! outline_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! outline_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! outline_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Where `initialize` sends log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// `./chat_outline.log`, truncated at startup.
    File,
    /// Standard error, colored when supported.
    Terminal,
    /// Terminal and log file together.
    Both,
}

const LOG_FILE: &str = "./chat_outline.log";

/// Installs the global logger at info level for an embedding host.
///
/// Returns `false` and keeps the existing logger when one is already installed,
/// or when the file destination cannot be opened.
pub fn initialize(destination: LogDestination) -> bool {
    let loggers = loggers_for(destination, LevelFilter::Info, Path::new(LOG_FILE));
    if loggers.is_empty() {
        return false;
    }
    CombinedLogger::init(loggers).is_ok()
}

fn loggers_for(
    destination: LogDestination,
    level: LevelFilter,
    log_path: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let config = host_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        if let Some(file_logger) = file_logger(level, config, log_path) {
            loggers.push(file_logger);
        }
    }
    loggers
}

/// Timestamps every line and keeps the module target only on errors.
fn host_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            // No logger exists yet to report through.
            eprintln!("Warning: could not open log file {}: {}", log_path.display(), err);
            None
        }
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
