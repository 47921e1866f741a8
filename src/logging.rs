//! Log file setup
//!
//! The terminal belongs to the UI, so log output goes to `recipebook.log` in the
//! platform data directory. `RUST_LOG` overrides the default `info` level.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "recipebook.log";

/// Returns the platform data directory used for the log file
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "recipebook").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Installs the global subscriber writing to `<log_dir>/recipebook.log`
///
/// Returns the path of the log file.
pub fn init_tracing(log_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish(),
    )?;
    Ok(path)
}
