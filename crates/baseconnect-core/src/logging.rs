//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ResultExt};

const LOG_FILE_NAME: &str = "bcscan.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/baseconnect/logs/` so that the terminal
/// stays free for the scanner UI. Log level is controlled by the
/// `BASECONNECT_LOG` environment variable.
///
/// # Examples
/// ```bash
/// BASECONNECT_LOG=debug bcscan
/// BASECONNECT_LOG=baseconnect_camera=trace bcscan
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    // Default to info, allow override via BASECONNECT_LOG
    let env_filter = EnvFilter::try_from_env("BASECONNECT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(
            "baseconnect_scan=info,baseconnect_app=info,baseconnect_camera=info,baseconnect_tui=info,warn",
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("BaseConnect scanner starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("baseconnect").join("logs"))
}

/// Path of today's log file (the appender rolls daily, UTC dates)
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    let today = chrono::Utc::now().format("%Y-%m-%d");
    Ok(dir.join(format!("{}.{}", LOG_FILE_NAME, today)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_log_file_is_dated() {
        let path = get_current_log_file().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        assert!(name.starts_with("bcscan.log."));
        // bcscan.log.YYYY-MM-DD
        assert_eq!(name.len(), "bcscan.log.".len() + 10);
        assert!(path.parent().unwrap().ends_with("baseconnect/logs"));
    }
}
