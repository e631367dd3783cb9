//! Discord webhook delivery of bug reports.
//!
//! [`BugReport`] holds the collected texts and turns them into the fixed
//! embed payload; [`Notifier`] posts that payload to the webhook.

pub mod notifier;
pub mod types;

pub use notifier::{Error, Notifier, WEBHOOK_PLACEHOLDER};
pub use types::{BugReport, Embed, EmbedField, REPORT_COLOR, WebhookPayload};
