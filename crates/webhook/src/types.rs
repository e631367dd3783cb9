//! Webhook payload types.

use serde::{Deserialize, Serialize};

/// Embed side-bar color (red).
pub const REPORT_COLOR: u32 = 0xFF0000;

/// Request body accepted by a Discord webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

/// A rich embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

/// A name/value row inside an embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl EmbedField {
    fn block(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            inline: false,
        }
    }
}

/// Everything collected for one report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugReport {
    pub nickname: String,
    pub description: String,
    pub game_version: String,
    pub pc_info: String,
    pub latest_log: String,
    pub fml_log: String,
    pub crash_report: String,
}

impl BugReport {
    /// Builds the single-embed payload with its five fields in fixed order.
    pub fn to_payload(&self) -> WebhookPayload {
        WebhookPayload {
            embeds: vec![Embed {
                title: self.nickname.clone(),
                description: self.description.clone(),
                color: REPORT_COLOR,
                fields: vec![
                    EmbedField::block("Версия игры", &self.game_version),
                    EmbedField::block("Характеристики ПК", &self.pc_info),
                    EmbedField::block("Ссылка на latest.log", &self.latest_log),
                    EmbedField::block("Ссылка на fml-client-latest.log", &self.fml_log),
                    EmbedField::block("Ссылка на crash-report", &self.crash_report),
                ],
            }],
        }
    }
}
