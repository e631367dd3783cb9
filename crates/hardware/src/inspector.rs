//! One-shot PC hardware snapshot.

use std::fmt::{self, Write as _};
use std::path::Path;
use std::time::Duration;

use sysinfo::{Disks, System};

use crate::dxdiag::{self, DxDiagConfig, GpuDevice};
use crate::{HardwareError, UNKNOWN, describe_chain, platform};

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

const QUERY_FAILED: &str = "Неизвестно (ошибка при получении данных)";

/// Hardware inspector settings.
#[derive(Debug, Clone)]
pub struct HardwareConfig {
    pub dxdiag: DxDiagConfig,
    /// Upper bound on each OS query command (RAM speed).
    pub query_timeout: Duration,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            dxdiag: DxDiagConfig::default(),
            query_timeout: Duration::from_secs(30),
        }
    }
}

/// Processor reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuInfo {
    pub name: String,
    pub clock_mhz: u64,
    /// Physical cores, when the OS reports them.
    pub cores: Option<usize>,
    pub threads: usize,
}

/// RAM reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    /// Speed of the first module, when the platform reports it.
    pub speed_mhz: Option<u32>,
}

/// Free space on the system drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskInfo {
    /// Drive label shown to the user (`C` on Windows, `/` elsewhere).
    pub label: String,
    pub free_bytes: u64,
}

/// Snapshot of the machine, each metric read independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcInfo {
    pub cpu: Option<CpuInfo>,
    pub gpu: Option<GpuDevice>,
    pub memory: Option<MemoryInfo>,
    pub disk: Option<DiskInfo>,
    /// Drive label used when the disk query failed.
    pub disk_label: String,
}

/// Collects every metric; failures are logged and leave that metric unknown.
pub async fn inspect(config: &HardwareConfig) -> PcInfo {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.refresh_memory();

    let (disk_label, mount) = platform::system_drive();

    let cpu = guarded("Ошибка при получении информации о процессоре", read_cpu(&sys));
    let gpu = match dxdiag::query_gpu(&config.dxdiag).await {
        Ok(gpu) => gpu,
        Err(e) => {
            tracing::error!("Ошибка при получении данных через DxDiag: {}", describe_chain(&e));
            None
        }
    };
    let memory = guarded(
        "Ошибка при получении информации о RAM",
        read_memory(&sys, config.query_timeout).await,
    );
    let disk = guarded(
        &format!("Ошибка при получении информации о диске {disk_label}"),
        read_disk(&disk_label, &mount),
    );

    PcInfo {
        cpu,
        gpu,
        memory,
        disk,
        disk_label,
    }
}

fn guarded<T>(context: &str, reading: Result<T, HardwareError>) -> Option<T> {
    match reading {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("{context}: {}", describe_chain(&e));
            None
        }
    }
}

fn read_cpu(sys: &System) -> Result<CpuInfo, HardwareError> {
    let first = sys
        .cpus()
        .first()
        .ok_or(HardwareError::Unavailable("processor"))?;

    Ok(CpuInfo {
        name: first.brand().trim().to_string(),
        clock_mhz: first.frequency(),
        cores: sys.physical_core_count(),
        threads: sys.cpus().len(),
    })
}

async fn read_memory(sys: &System, limit: Duration) -> Result<MemoryInfo, HardwareError> {
    let total_bytes = sys.total_memory();
    if total_bytes == 0 {
        return Err(HardwareError::Unavailable("memory size"));
    }

    let speed_mhz = match platform::read_memory_speed(limit).await {
        Ok(speed) => Some(speed),
        Err(HardwareError::Unsupported) => None,
        Err(e) => {
            tracing::warn!("Не удалось определить скорость RAM: {}", describe_chain(&e));
            None
        }
    };

    Ok(MemoryInfo {
        total_bytes,
        speed_mhz,
    })
}

fn read_disk(label: &str, mount: &Path) -> Result<DiskInfo, HardwareError> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == mount)
        .ok_or(HardwareError::Unavailable("system drive"))?;

    Ok(DiskInfo {
        label: label.to_string(),
        free_bytes: disk.available_space(),
    })
}

impl fmt::Display for PcInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cpu {
            Some(cpu) => {
                writeln!(f, "Процессор: {}", cpu.name)?;
                writeln!(f, "Скорость: {} МГц", cpu.clock_mhz)?;
                match cpu.cores {
                    Some(cores) => writeln!(f, "Ядра: {cores}")?,
                    None => writeln!(f, "Ядра: {UNKNOWN}")?,
                }
                writeln!(f, "Потоки: {}", cpu.threads)?;
            }
            None => writeln!(f, "Процессор: {QUERY_FAILED}")?,
        }
        writeln!(f)?;

        match &self.gpu {
            Some(gpu) => {
                writeln!(f, "Видеокарта: {}", gpu.name)?;
                writeln!(f, "Память: {}", gpu.vram())?;
            }
            None => {
                writeln!(f, "Видеокарта: {UNKNOWN}")?;
                writeln!(f, "Память: {UNKNOWN}")?;
            }
        }
        writeln!(f)?;

        match &self.memory {
            Some(mem) => {
                match mem.speed_mhz {
                    Some(speed) => writeln!(f, "Скорость RAM: {speed} МГц")?,
                    None => writeln!(f, "Скорость RAM: {UNKNOWN} МГц")?,
                }
                writeln!(f, "Общий объём RAM: {} ГБ", mem.total_bytes / BYTES_PER_GB)?;
            }
            None => {
                writeln!(f, "Скорость RAM: {QUERY_FAILED}")?;
                writeln!(f, "Общий объём RAM: {QUERY_FAILED}")?;
            }
        }
        writeln!(f)?;

        match &self.disk {
            Some(disk) => writeln!(
                f,
                "Свободно на диске {}: {} ГБ",
                disk.label,
                disk.free_bytes / BYTES_PER_GB
            ),
            None => writeln!(f, "Свободно на диске {}: {QUERY_FAILED}", self.disk_label),
        }
    }
}

impl PcInfo {
    /// Renders the multi-line block embedded in the report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{self}");
        out
    }
}
