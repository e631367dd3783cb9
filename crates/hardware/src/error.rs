//! Hardware query error types.

use std::error::Error as StdError;

/// Errors produced while reading a hardware metric.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not reported by the OS")]
    Unavailable(&'static str),

    #[error("query failed: {0}")]
    Query(String),

    #[error("{program} did not finish within {secs} s")]
    Timeout { program: String, secs: u64 },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: String },

    #[error("unsupported on this platform")]
    Unsupported,
}

/// Formats an error and each of its wrapped causes, one cause per line.
pub fn describe_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str("\nВнутренняя ошибка: ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}
