//! mclo.gs API client.
//!
//! Async HTTP client using `reqwest`. Every failure, local or remote, comes
//! back as an [`UploadOutcome::Failed`] value; nothing is thrown at the caller.

use std::path::Path;

use reqwest::multipart::Form;

use crate::types::{ApiResponse, UploadFailure, UploadOutcome};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mclo.gs";

/// Largest file accepted for upload (10 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Errors from the HTTP exchange itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// mclo.gs API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    max_size: u64,
}

impl Client {
    /// Creates a client for the public mclo.gs API.
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ncbugreport/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_size: DEFAULT_MAX_SIZE,
        })
    }

    /// Sets a custom base URL (self-hosted instance or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the upload size ceiling in bytes.
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    /// Uploads a log file, shown to the user as `name`.
    ///
    /// Missing, oversized and empty files are rejected before any request
    /// is made; the size check uses metadata only.
    pub async fn upload_file(&self, path: &Path, name: &str) -> UploadOutcome {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            _ => {
                tracing::debug!(path = %path.display(), "log file not found");
                return UploadOutcome::Failed(UploadFailure::NotFound { name: name.into() });
            }
        };

        if metadata.len() > self.max_size {
            tracing::warn!(path = %path.display(), size = metadata.len(), "log file too large");
            return UploadOutcome::Failed(UploadFailure::TooLarge {
                name: name.into(),
                limit_mb: self.max_size.div_ceil(BYTES_PER_MB),
            });
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read log file");
                return UploadOutcome::Failed(UploadFailure::Read {
                    name: name.into(),
                    reason: e.to_string(),
                });
            }
        };

        let content = String::from_utf8_lossy(&bytes).into_owned();
        if content.is_empty() {
            return UploadOutcome::Failed(UploadFailure::Empty { name: name.into() });
        }

        self.upload_text(content, name).await
    }

    /// Uploads raw log text, shown to the user as `name`.
    pub async fn upload_text(&self, content: String, name: &str) -> UploadOutcome {
        tracing::debug!(name, bytes = content.len(), "uploading log");
        match self.post_log(content).await {
            Ok(resp) => resp.into_outcome(name),
            Err(Error::Api { status, body }) => {
                tracing::error!(name, status, body = %body, "paste API returned an error status");
                UploadOutcome::Failed(UploadFailure::Status {
                    name: name.into(),
                    status,
                })
            }
            Err(e) => {
                tracing::error!(name, error = %e, "log upload failed");
                UploadOutcome::Failed(UploadFailure::Transport {
                    name: name.into(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Performs the multipart `POST /1/log` request.
    async fn post_log(&self, content: String) -> Result<ApiResponse, Error> {
        let url = format!("{}/1/log", self.base_url);
        let form = Form::new().text("content", content);
        let resp = self.http.post(&url).multipart(form).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP request (headers and body) from the stream.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            if head.contains("transfer-encoding: chunked") {
                if buf.ends_with(b"0\r\n\r\n") {
                    break;
                }
                continue;
            }
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Starts a mock HTTP server that answers one request with `status` and
    /// `body`, returning the raw request it received.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let resp = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
            request
        });

        (url, handle)
    }

    fn write_log(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn upload_returns_url() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "latest.log", "[12:00:00] [Client thread/INFO]: Setting user: Steve");
        let (url, handle) = mock_server(
            200,
            r#"{"success":true,"id":"Ab3dE","url":"https://mclo.gs/Ab3dE","raw":"https://api.mclo.gs/1/raw/Ab3dE"}"#,
        )
        .await;

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client.upload_file(&log, "latest.log").await;
        assert_eq!(outcome, UploadOutcome::Uploaded("https://mclo.gs/Ab3dE".into()));

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /1/log "));
        assert!(request.contains("multipart/form-data"));
        assert!(request.contains(r#"name="content""#));
        assert!(request.contains("Setting user: Steve"));
    }

    #[tokio::test]
    async fn stringified_success_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "latest.log", "line");
        let (url, handle) = mock_server(200, r#"{"success":"True","url":"https://mclo.gs/x"}"#).await;

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client.upload_file(&log, "latest.log").await;
        assert_eq!(outcome.url(), Some("https://mclo.gs/x"));

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn api_rejection_uses_message() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "crash.txt", "boom");
        let (url, handle) =
            mock_server(200, r#"{"success":false,"message":"Rate limit exceeded"}"#).await;

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client.upload_file(&log, "crash.txt").await;
        assert_eq!(
            outcome.to_string(),
            "Не удалось загрузить crash.txt: Rate limit exceeded"
        );

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn http_error_is_a_failed_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "latest.log", "line");
        let (url, handle) = mock_server(500, r#"{"error":"internal"}"#).await;

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client.upload_file(&log, "latest.log").await;
        assert_eq!(
            outcome,
            UploadOutcome::Failed(UploadFailure::Status {
                name: "latest.log".into(),
                status: 500,
            })
        );
        assert_eq!(outcome.to_string(), "Не удалось загрузить latest.log: HTTP 500");

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn invalid_json_is_a_failed_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "latest.log", "line");
        let (url, handle) = mock_server(200, "<html>maintenance</html>").await;

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client.upload_file(&log, "latest.log").await;
        assert!(matches!(
            outcome,
            UploadOutcome::Failed(UploadFailure::Transport { .. })
        ));

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_makes_no_request() {
        let tmp = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client
            .upload_file(&tmp.path().join("latest.log"), "latest.log")
            .await;
        assert_eq!(outcome.to_string(), "Файл latest.log не найден.");

        let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "no connection expected");
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_upload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fml-client-latest.log");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(DEFAULT_MAX_SIZE + 1).unwrap();
        drop(file);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

        let client = Client::new().unwrap().with_base_url(url);
        let outcome = client.upload_file(&path, "fml-client-latest.log").await;
        assert_eq!(
            outcome.to_string(),
            "Файл fml-client-latest.log слишком большой (более 10 МБ)."
        );

        let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "no connection expected");
    }

    #[tokio::test]
    async fn custom_ceiling_applies() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "latest.log", "more than sixteen bytes of text");

        let client = Client::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:9")
            .with_max_size(16);
        let outcome = client.upload_file(&log, "latest.log").await;
        assert!(matches!(
            outcome,
            UploadOutcome::Failed(UploadFailure::TooLarge { limit_mb: 1, .. })
        ));
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let log = write_log(tmp.path(), "latest.log", "");

        let client = Client::new().unwrap().with_base_url("http://127.0.0.1:9");
        let outcome = client.upload_file(&log, "latest.log").await;
        assert_eq!(outcome.to_string(), "Файл latest.log пустой.");
    }

    #[tokio::test]
    async fn connection_refused_is_a_failed_outcome() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::new()
            .unwrap()
            .with_base_url(format!("http://127.0.0.1:{port}"));
        let outcome = client.upload_text("line".into(), "latest.log").await;
        match outcome {
            UploadOutcome::Failed(UploadFailure::Transport { name, .. }) => {
                assert_eq!(name, "latest.log");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = Client::new().unwrap().with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_new_succeeds() {
        assert!(Client::new().is_ok());
    }
}
