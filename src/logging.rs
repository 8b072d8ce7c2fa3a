//! File-backed structured logging.
//!
//! The terminal belongs to the session, so events never go to stdout or
//! stderr: they are appended to `MCQ_TUI_LOG` or dropped.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{EnvConfig, DEFAULT_LOG_LEVEL};

/// Installs the global subscriber.
///
/// Returns `Ok(false)` when no log file is configured or another subscriber
/// is already installed.
pub fn init_file_logging(config: &EnvConfig) -> io::Result<bool> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };
    let file = open_log_file(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Falls back to the default level on a malformed directive.
fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
