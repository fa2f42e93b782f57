//! Logging setup
//!
//! Logging is filtered by `QUOTEBOOK_LOG` (default `warn`) and written to
//! `config.log_file` when set, stderr otherwise.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use quotebook_core::Config;

/// Environment variable holding the log level
const LOG_ENV: &str = "QUOTEBOOK_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber
pub fn init_logging(config: &Config) {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
    let env_filter = EnvFilter::new(filter_directives(&level));

    if let Some(ref log_path) = config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                info!("Logging to {:?}", log_path);
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter directives scoping `level` to this workspace's crates
fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { DEFAULT_LEVEL } else { level };
    format!("quotebook_core={},quotebook_cli={}", level, level)
}
