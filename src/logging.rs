//! Log output setup
//!
//! The TUI owns stdout, so logs go to a file. The filter comes from
//! `RUST_LOG` and defaults to `helloweather=info`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "helloweather=info";

/// Log file name inside the data directory
const LOG_FILE: &str = "helloweather.log";

/// Default log path in the platform data directory
///
/// Returns `None` if the directory cannot be determined.
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "helloweather")?;
    Some(project_dirs.data_local_dir().join(LOG_FILE))
}

/// Installs the global subscriber writing to `path` (appending)
///
/// Calling this twice leaves the first subscriber in place.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    tracing::info!("Logging to {}", path.display());
    Ok(())
}
