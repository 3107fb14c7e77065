//! File logging
//!
//! The terminal belongs to the viewer, so log output goes to a file and is
//! only enabled on request through `MDRS_LOG` (an `EnvFilter` directive
//! such as `debug` or `mdrs=trace`).

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MDRS_LOG";

/// Where log output is written
pub fn log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("mdrs"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mdrs.log")
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directive)
}

/// Install the file subscriber when `MDRS_LOG` is set.
///
/// Returns the log file path, or `None` when logging stays off.
pub fn init_tracing() -> Result<Option<PathBuf>> {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return Ok(None);
    };

    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_file_name() {
        assert!(log_path().ends_with("mdrs.log"));
    }
}
