//! Client log paths and crash report lookup.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::GameVersion;

/// Main game log file name.
pub const LATEST_LOG: &str = "latest.log";

/// Forge loader log file name.
pub const FML_LOG: &str = "fml-client-latest.log";

const CRASH_REPORT_EXT: &str = "txt";

/// Provides access to one client's directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLayout {
    base_dir: PathBuf,
}

impl ClientLayout {
    /// Resolves `<app_data>/<app_name>/clients/<folder>` for a version.
    pub fn new(app_data: &Path, app_name: &str, version: GameVersion) -> Self {
        Self {
            base_dir: app_data
                .join(app_name)
                .join("clients")
                .join(version.folder()),
        }
    }

    /// Creates a layout rooted at an explicit client directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the client directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the `logs/` directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Returns the path of `latest.log`.
    pub fn latest_log(&self) -> PathBuf {
        self.logs_dir().join(LATEST_LOG)
    }

    /// Returns the path of `fml-client-latest.log`.
    pub fn fml_log(&self) -> PathBuf {
        self.logs_dir().join(FML_LOG)
    }

    /// Returns the `crash-reports/` directory.
    pub fn crash_reports_dir(&self) -> PathBuf {
        self.base_dir.join("crash-reports")
    }

    /// Returns the most recent crash report of this client.
    pub fn latest_crash_report(&self) -> Option<PathBuf> {
        find_latest_crash_report(&self.crash_reports_dir())
    }
}

/// Finds the most recently modified `.txt` file in `dir`.
///
/// Returns `None` when the directory is missing or has no matching files.
pub fn find_latest_crash_report(dir: &Path) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "crash report directory not readable");
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            let path = entry.path();
            let is_report = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CRASH_REPORT_EXT));
            if !is_report {
                return None;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, path))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}
