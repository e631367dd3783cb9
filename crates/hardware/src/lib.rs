//! Hardware inspector for bug reports.
//!
//! Reads CPU, RAM and free disk space from the OS, and picks the primary GPU
//! out of a `dxdiag` text report. Every reading degrades to "unknown" on its
//! own; nothing here aborts the report.

mod command;
pub mod dxdiag;
mod error;
pub mod inspector;

#[cfg(target_os = "windows")]
#[path = "memory_windows.rs"]
mod platform;

#[cfg(not(target_os = "windows"))]
#[path = "memory_other.rs"]
mod platform;

pub use dxdiag::{DxDiagConfig, GpuDevice};
pub use error::{HardwareError, describe_chain};
pub use inspector::{CpuInfo, HardwareConfig, MemoryInfo, PcInfo, inspect};

/// Placeholder rendered for any metric that could not be read.
pub const UNKNOWN: &str = "Неизвестно";
