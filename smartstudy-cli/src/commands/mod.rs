//! CLI command implementations

pub mod auth;
pub mod config;
pub mod doctor;
pub mod logs;
pub mod notes;
pub mod quiz;

use std::fmt::{Debug, Display};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use smartstudy_core::{LogEvent, LoggingService, StudyContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Log a failed operation with the error's message and debug form
pub fn log_failure<E>(logger: &Option<Arc<LoggingService>>, event: LogEvent, err: &E)
where
    E: Display + Debug,
{
    if let Some(l) = logger {
        let _ = l.log_error(event, &err.to_string(), Some(&format!("{:?}", err)));
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SMARTSTUDY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".smartstudy"))
        .context("Could not find home directory")
}

/// Get or create the study context, restoring any saved session
pub fn get_context(logger: Option<Arc<LoggingService>>) -> Result<StudyContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    StudyContext::new(&data_dir, logger).context("Failed to initialize study context")
}
