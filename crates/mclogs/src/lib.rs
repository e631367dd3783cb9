//! mclo.gs paste API client.
//!
//! Uploads a log file's text and reports either the shareable URL or a
//! message explaining why the file was not uploaded.

pub mod client;
pub mod types;

pub use client::Client;
pub use types::{UploadFailure, UploadOutcome};
