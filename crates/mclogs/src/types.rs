//! Upload results and API response types.

use std::fmt;

use serde::Deserialize;

/// Result of uploading one log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The paste URL.
    Uploaded(String),
    Failed(UploadFailure),
}

impl UploadOutcome {
    /// Returns the URL on success.
    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Uploaded(url) => Some(url),
            UploadOutcome::Failed(_) => None,
        }
    }
}

/// Text placed in the report: the URL or the failure message.
impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Uploaded(url) => f.write_str(url),
            UploadOutcome::Failed(failure) => write!(f, "{failure}"),
        }
    }
}

/// Why a log file was not uploaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadFailure {
    #[error("Файл {name} не найден.")]
    NotFound { name: String },

    #[error("Файл {name} слишком большой (более {limit_mb} МБ).")]
    TooLarge { name: String, limit_mb: u64 },

    #[error("Файл {name} пустой.")]
    Empty { name: String },

    #[error("Не удалось прочитать {name}: {reason}")]
    Read { name: String, reason: String },

    #[error("URL для {name} не найден в ответе API.")]
    MissingUrl { name: String },

    #[error("Не удалось загрузить {name}: {message}")]
    Rejected { name: String, message: String },

    #[error("Не удалось загрузить {name}: HTTP {status}")]
    Status { name: String, status: u16 },

    #[error("Не удалось загрузить {name}: {reason}")]
    Transport { name: String, reason: String },
}

/// Fallback when a rejection carries no `message`.
pub(crate) const UNKNOWN_ERROR: &str = "Неизвестная ошибка.";

/// `POST /1/log` response body (internal).
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub success: serde_json::Value,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    /// The API sends a boolean; a stringified `"True"` is accepted as well.
    pub fn is_success(&self) -> bool {
        match &self.success {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) => s == "True" || s == "true",
            _ => false,
        }
    }

    /// Maps the response to an outcome for the file `name`.
    pub fn into_outcome(self, name: &str) -> UploadOutcome {
        if self.is_success() {
            return match self.url {
                Some(url) => UploadOutcome::Uploaded(url),
                None => UploadOutcome::Failed(UploadFailure::MissingUrl { name: name.into() }),
            };
        }
        UploadOutcome::Failed(UploadFailure::Rejected {
            name: name.into(),
            message: self.message.unwrap_or_else(|| UNKNOWN_ERROR.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn boolean_and_string_success() {
        assert!(parse(r#"{"success":true}"#).is_success());
        assert!(parse(r#"{"success":"True"}"#).is_success());
        assert!(!parse(r#"{"success":false}"#).is_success());
        assert!(!parse(r#"{"success":"False"}"#).is_success());
        assert!(!parse(r#"{}"#).is_success());
    }

    #[test]
    fn success_with_url() {
        let outcome = parse(r#"{"success":true,"id":"x1","url":"https://mclo.gs/x1"}"#)
            .into_outcome("latest.log");
        assert_eq!(outcome, UploadOutcome::Uploaded("https://mclo.gs/x1".into()));
        assert_eq!(outcome.url(), Some("https://mclo.gs/x1"));
    }

    #[test]
    fn success_without_url() {
        let outcome = parse(r#"{"success":true}"#).into_outcome("latest.log");
        assert_eq!(outcome.to_string(), "URL для latest.log не найден в ответе API.");
        assert!(outcome.url().is_none());
    }

    #[test]
    fn rejection_uses_message() {
        let outcome = parse(r#"{"success":false,"error":"Required POST argument 'content' is empty."}"#)
            .into_outcome("latest.log");
        assert_eq!(
            outcome.to_string(),
            "Не удалось загрузить latest.log: Неизвестная ошибка."
        );

        let outcome = parse(r#"{"success":false,"message":"Log too long"}"#).into_outcome("x.txt");
        assert_eq!(outcome.to_string(), "Не удалось загрузить x.txt: Log too long");
    }

    #[test]
    fn failure_messages() {
        let not_found = UploadFailure::NotFound {
            name: "latest.log".into(),
        };
        assert_eq!(not_found.to_string(), "Файл latest.log не найден.");

        let too_large = UploadFailure::TooLarge {
            name: "fml-client-latest.log".into(),
            limit_mb: 10,
        };
        assert_eq!(
            too_large.to_string(),
            "Файл fml-client-latest.log слишком большой (более 10 МБ)."
        );

        let empty = UploadFailure::Empty {
            name: "latest.log".into(),
        };
        assert_eq!(empty.to_string(), "Файл latest.log пустой.");
    }
}
