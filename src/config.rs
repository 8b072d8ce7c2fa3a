//! Environment configuration.

use std::env;
use std::path::PathBuf;

use crate::platform::stdin_buffer::StdinBufferOptions;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ESC_TIMEOUT_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// `MCQ_TUI_LOG`: append structured logs to this file.
    pub log_file: Option<PathBuf>,
    /// `MCQ_TUI_LOG_LEVEL`: env-filter directive for the log file.
    pub log_level: String,
    /// `MCQ_TUI_ESC_TIMEOUT_MS`
    pub esc_timeout_ms: u64,
    /// `NO_COLOR`
    pub no_color: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            esc_timeout_ms: DEFAULT_ESC_TIMEOUT_MS,
            no_color: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_file: env_string_opt("MCQ_TUI_LOG").map(PathBuf::from),
            log_level: env_string_opt("MCQ_TUI_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            esc_timeout_ms: env_string_opt("MCQ_TUI_ESC_TIMEOUT_MS")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_ESC_TIMEOUT_MS),
            no_color: env_string_opt("NO_COLOR").is_some(),
        }
    }

    pub fn stdin_buffer_options(&self) -> StdinBufferOptions {
        StdinBufferOptions {
            timeout_ms: self.esc_timeout_ms,
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
