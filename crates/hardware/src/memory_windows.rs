//! Windows readers backed by CIM (WMI) queries.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;

use crate::HardwareError;
use crate::command::output_within;

const CREATE_NO_WINDOW: u32 = 0x0800_0000;

const MEMORY_SPEED_QUERY: &str =
    "Get-CimInstance Win32_PhysicalMemory | Select-Object -First 1 -ExpandProperty Speed";

/// Reads the speed (MHz) of the first installed memory module.
pub async fn read_memory_speed(limit: Duration) -> Result<u32, HardwareError> {
    let mut command = Command::new("powershell");
    command
        .args(["-NoProfile", "-NonInteractive", "-Command", MEMORY_SPEED_QUERY])
        .creation_flags(CREATE_NO_WINDOW);

    let stdout = output_within(command, limit).await?;
    stdout
        .parse()
        .map_err(|_| HardwareError::Query(format!("unexpected speed value: {stdout:?}")))
}

/// Returns the drive label and mount point of the system drive.
pub fn system_drive() -> (String, PathBuf) {
    let drive = std::env::var("SystemDrive").unwrap_or_else(|_| "C:".into());
    let label = drive.trim_end_matches(':').to_string();
    (label, PathBuf::from(format!("{drive}\\")))
}
