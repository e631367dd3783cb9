//! Reporter configuration.
//!
//! Defaults are compiled in. A `bugreport.toml` next to the working
//! directory may override any of them:
//!
//! ```toml
//! webhook_url = "https://discord.com/api/webhooks/..."
//! exit_delay_secs = 10
//!
//! [dxdiag]
//! timeout_secs = 120
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use ncbugreport_hardware::{DxDiagConfig, HardwareConfig};
use ncbugreport_webhook::WEBHOOK_PLACEHOLDER;
use serde::{Deserialize, Serialize};

/// Optional override file, looked up in the working directory.
pub const CONFIG_FILE: &str = "bugreport.toml";

/// Reporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord webhook receiving the report.
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,

    /// Paste service base URL.
    #[serde(default = "default_paste_url")]
    pub paste_url: String,

    /// Launcher folder name under the application-data directory.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Overrides the platform application-data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_data_dir: Option<PathBuf>,

    /// Append-only run log.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Saved nickname.
    #[serde(default = "default_nickname_file")]
    pub nickname_file: PathBuf,

    /// Largest log file uploaded, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Pause before the process exits.
    #[serde(default = "default_exit_delay")]
    pub exit_delay_secs: u64,

    /// Upper bound on each OS query command, in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    #[serde(default)]
    pub dxdiag: DxDiagSettings,
}

/// `[dxdiag]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DxDiagSettings {
    pub executable: PathBuf,
    pub report_path: PathBuf,
    pub settle_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for DxDiagSettings {
    fn default() -> Self {
        let defaults = DxDiagConfig::default();
        Self {
            executable: defaults.executable,
            report_path: defaults.report_path,
            settle_delay_ms: defaults.settle_delay.as_millis() as u64,
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

fn default_webhook_url() -> String {
    option_env!("NCBUGREPORT_WEBHOOK_URL")
        .unwrap_or(WEBHOOK_PLACEHOLDER)
        .to_string()
}

fn default_paste_url() -> String {
    ncbugreport_mclogs::client::DEFAULT_BASE_URL.into()
}

fn default_app_name() -> String {
    "nuclearcraft".into()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("bugreport.log")
}

fn default_nickname_file() -> PathBuf {
    PathBuf::from("memory.txt")
}

fn default_max_upload_bytes() -> u64 {
    ncbugreport_mclogs::client::DEFAULT_MAX_SIZE
}

fn default_exit_delay() -> u64 {
    5
}

fn default_query_timeout() -> u64 {
    HardwareConfig::default().query_timeout.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            paste_url: default_paste_url(),
            app_name: default_app_name(),
            app_data_dir: None,
            log_file: default_log_file(),
            nickname_file: default_nickname_file(),
            max_upload_bytes: default_max_upload_bytes(),
            exit_delay_secs: default_exit_delay(),
            query_timeout_secs: default_query_timeout(),
            dxdiag: DxDiagSettings::default(),
        }
    }
}

impl Config {
    /// Loads `bugreport.toml` from the working directory, or the defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads the given file, or the defaults when it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Directory holding the launcher folder.
    pub fn app_data_dir(&self) -> PathBuf {
        self.app_data_dir.clone().unwrap_or_else(platform_app_data_dir)
    }

    /// Settings for the hardware inspector.
    pub fn hardware(&self) -> HardwareConfig {
        HardwareConfig {
            dxdiag: DxDiagConfig {
                executable: self.dxdiag.executable.clone(),
                report_path: self.dxdiag.report_path.clone(),
                settle_delay: Duration::from_millis(self.dxdiag.settle_delay_ms),
                timeout: Duration::from_secs(self.dxdiag.timeout_secs),
            },
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_secs(self.exit_delay_secs)
    }
}

/// Returns the per-user roaming application-data directory.
fn platform_app_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:\\Users\\Default\\AppData\\Roaming"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }
}
