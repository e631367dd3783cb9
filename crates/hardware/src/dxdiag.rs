//! GPU detection through a `dxdiag /t` text report.
//!
//! The report lists every display device as a block of `Key: Value` lines.
//! Only two keys matter here: `Card name:` opens a device record and
//! `Display Memory:` carries its memory in MB.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use crate::HardwareError;

const CARD_NAME: &str = "Card name:";
const DISPLAY_MEMORY: &str = "Display Memory:";

/// Substrings (lowercase) that mark remote, mirror and monitor pseudo-devices.
const VIRTUAL_MARKERS: &[&str] = &["virtual", "monitor", "display"];

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How the diagnostic tool is run.
#[derive(Debug, Clone)]
pub struct DxDiagConfig {
    /// Executable name or path.
    pub executable: PathBuf,
    /// Where the tool is asked to write its text report.
    pub report_path: PathBuf,
    /// How long the report must stay unchanged before it is read. Also the
    /// longest wait for the report to appear once the tool has exited.
    pub settle_delay: Duration,
    /// Upper bound on the tool's run time.
    pub timeout: Duration,
}

impl Default for DxDiagConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("dxdiag"),
            report_path: std::env::temp_dir().join("dxdiag_output.txt"),
            settle_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(60),
        }
    }
}

/// A physical display adapter picked from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuDevice {
    pub name: String,
    pub memory_mb: u32,
}

impl GpuDevice {
    /// Memory rounded up to whole gigabytes, e.g. `"6 ГБ"`.
    pub fn vram(&self) -> String {
        format_vram(self.memory_mb)
    }
}

/// Formats MB as gigabytes, always rounding up.
pub fn format_vram(memory_mb: u32) -> String {
    format!("{} ГБ", memory_mb.div_ceil(1024))
}

/// Returns true for device names that are not real GPUs.
pub fn is_virtual_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    VIRTUAL_MARKERS.iter().any(|m| lower.contains(m))
}

/// Picks the non-virtual device with the largest display memory.
///
/// A device with 0 MB is never selected. Returns `None` when nothing passes
/// the filter.
pub fn parse_report(report: &str) -> Option<GpuDevice> {
    let mut best: Option<GpuDevice> = None;
    let mut current: Option<GpuDevice> = None;

    for line in report.lines() {
        if let Some(name) = marker_value(line, CARD_NAME) {
            finalize(current.take(), &mut best);
            current = Some(GpuDevice {
                name: name.to_string(),
                memory_mb: 0,
            });
        } else if let Some(value) = marker_value(line, DISPLAY_MEMORY) {
            if let (Some(device), Some(mb)) = (current.as_mut(), parse_mb(value)) {
                device.memory_mb = mb;
            }
        }
    }

    // The last record has no following marker to close it.
    finalize(current, &mut best);
    best
}

fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker)
        .map(|idx| line[idx + marker.len()..].trim())
}

/// Parses the leading integer of a value such as `"16384 MB"`.
fn parse_mb(value: &str) -> Option<u32> {
    value.split_whitespace().next()?.parse().ok()
}

fn finalize(candidate: Option<GpuDevice>, best: &mut Option<GpuDevice>) {
    let Some(device) = candidate else {
        return;
    };
    if is_virtual_device(&device.name) {
        tracing::debug!(name = %device.name, "skipping virtual display device");
        return;
    }
    let max = best.as_ref().map_or(0, |b| b.memory_mb);
    if device.memory_mb > max {
        *best = Some(device);
    }
}

/// Removes the report file when dropped.
struct ReportFile<'a>(&'a Path);

impl Drop for ReportFile<'_> {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.0.display(), error = %e, "failed to remove dxdiag report");
            }
        }
    }
}

/// Runs the diagnostic tool and parses its report.
///
/// The report file is removed afterwards on every path, including errors
/// and timeouts. `Ok(None)` means the report listed no usable GPU.
pub async fn query_gpu(config: &DxDiagConfig) -> Result<Option<GpuDevice>, HardwareError> {
    let report = ReportFile(&config.report_path);
    // A leftover report from an earlier run must not be mistaken for a fresh one.
    let _ = std::fs::remove_file(report.0);

    let program = config.executable.display().to_string();
    tracing::debug!(program = %program, report = %report.0.display(), "running dxdiag");

    let mut child = tokio::process::Command::new(&config.executable)
        .arg("/t")
        .arg(report.0)
        .kill_on_drop(true)
        .spawn()?;

    let status = match tokio::time::timeout(config.timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
            let _ = child.kill().await;
            return Err(HardwareError::Timeout {
                program,
                secs: config.timeout.as_secs(),
            });
        }
    };

    if !status.success() {
        return Err(HardwareError::Exit {
            program,
            status: status.to_string(),
        });
    }

    if !wait_for_report(report.0, config.settle_delay, config.timeout).await {
        return Err(HardwareError::Unavailable("dxdiag report"));
    }

    let bytes = tokio::fs::read(report.0).await?;
    Ok(parse_report(&String::from_utf8_lossy(&bytes)))
}

/// Waits until the report exists and has stopped changing.
///
/// The file must appear within `settle` of the tool exiting, then stay the
/// same size and mtime for `settle`. Gives up after `limit` and reads
/// whatever is there.
async fn wait_for_report(path: &Path, settle: Duration, limit: Duration) -> bool {
    let start = Instant::now();
    let mut last: Option<(u64, Option<SystemTime>)> = None;
    let mut changed_at = start;

    loop {
        let now = Instant::now();
        let snapshot = std::fs::metadata(path)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| (m.len(), m.modified().ok()));

        match snapshot {
            None if now.duration_since(start) >= settle => return false,
            None => {}
            Some(current) => {
                if last != Some(current) {
                    last = Some(current);
                    changed_at = now;
                } else if now.duration_since(changed_at) >= settle {
                    return true;
                }
                if now.duration_since(start) >= limit {
                    tracing::warn!(path = %path.display(), "dxdiag report still changing, reading it anyway");
                    return true;
                }
            }
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
