//! Webhook notifier.

use crate::types::WebhookPayload;

/// Value left in place of a real webhook URL.
pub const WEBHOOK_PLACEHOLDER: &str = "ВАШ_WEBHOOK_URL";

/// Errors from delivering a report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("URL WebHook не указан. Пожалуйста, замените 'ВАШ_WEBHOOK_URL' на действительный URL.")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Не удалось отправить данные в Discord. Код: {status}. Ошибка: {body}")]
    Api { status: u16, body: String },
}

/// Posts payloads to one webhook URL.
pub struct Notifier {
    http: reqwest::Client,
    url: String,
}

impl Notifier {
    /// Creates a notifier, refusing an empty or placeholder URL.
    pub fn new(url: &str) -> Result<Self, Error> {
        let url = url.trim();
        if url.is_empty() || url == WEBHOOK_PLACEHOLDER {
            return Err(Error::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("ncbugreport/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    /// Sends the payload as JSON. Any 2xx status counts as delivered.
    pub async fn send(&self, payload: &WebhookPayload) -> Result<(), Error> {
        let resp = self.http.post(&self.url).json(payload).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "webhook accepted report");
        Ok(())
    }
}
