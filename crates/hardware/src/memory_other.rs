//! Readers for platforms without a memory-module query.

use std::path::PathBuf;
use std::time::Duration;

use crate::HardwareError;

pub async fn read_memory_speed(_limit: Duration) -> Result<u32, HardwareError> {
    Err(HardwareError::Unsupported)
}

pub fn system_drive() -> (String, PathBuf) {
    ("/".into(), PathBuf::from("/"))
}
