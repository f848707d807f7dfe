use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::backend::ChatBackend;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ChatReply, ChatRequest, CreateSessionParams, FileUpload, History, HistoryMessage,
    SessionList, SessionSummary, UploadedFile,
};

/// Environment variable consulted when no base URL is given.
pub const BASE_URL_ENV: &str = "RAGCHAT_BASE_URL";

pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A decoded response body.
///
/// Responses are parsed as JSON only when the content type says so; anything
/// else is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// The response declared `application/json`.
    Json(Value),
    /// Any other response.
    Text(String),
}

impl ApiBody {
    /// Deserialize a JSON body into `T`.
    ///
    /// A text body is a serialization error: every typed endpoint answers JSON.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ApiBody::Json(value) => serde_json::from_value(value).map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            }),
            ApiBody::Text(text) => Err(Error::serialization(
                format!("Expected a JSON response, got: {}", text),
                None,
            )),
        }
    }
}

/// HTTP client for the chat backend.
#[derive(Clone)]
pub struct RagChat {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl RagChat {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the RAGCHAT_BASE_URL
    /// environment variable; it defaults to a backend on localhost.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The normalized base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a request and decode its body.
    ///
    /// Non-2xx statuses become [`Error::Api`] carrying the response body, or the
    /// status reason when the body is empty.
    pub async fn api(&self, method: Method, url: Url, request: RequestBuilder) -> Result<ApiBody> {
        if let Some(logger) = &self.logger {
            logger.log_request(method.as_str(), url.as_str());
        }
        tracing::debug!(method = %method, url = %url, "backend request");
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.execute(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match result {
            Ok((status, body)) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(method.as_str(), url.as_str(), status, &body);
                }
                Ok(body)
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                tracing::warn!(method = %method, url = %url, error = %err, "backend request failed");
                if let Some(logger) = &self.logger {
                    logger.log_failure(method.as_str(), url.as_str(), &err);
                }
                Err(err)
            }
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(u16, ApiBody)> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        let status = response.status().as_u16();
        let body = Self::read_body(response).await?;
        Ok((status, body))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    async fn read_body(response: Response) -> Result<ApiBody> {
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|val| val.to_str().ok())
            .map(|val| val.contains("application/json"))
            .unwrap_or(false);
        let text = response.text().await.map_err(|e| {
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        })?;
        if !is_json {
            return Ok(ApiBody::Text(text));
        }
        if text.trim().is_empty() {
            return Ok(ApiBody::Json(Value::Null));
        }
        Ok(ApiBody::Json(serde_json::from_str(&text)?))
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        match response.text().await {
            Ok(body) => Error::api(status.as_u16(), error_message(status, &body)),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }
}

impl fmt::Debug for RagChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagChat")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait]
impl ChatBackend for RagChat {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let url = self.endpoint("api/sessions")?;
        let request = self.client.get(url.clone());
        let list: SessionList = self.api(Method::GET, url, request).await?.into_json()?;
        Ok(list.items)
    }

    async fn create_session(&self, title: &str) -> Result<SessionSummary> {
        let url = self.endpoint("api/sessions")?;
        let params = CreateSessionParams {
            title: title.to_string(),
        };
        let request = self.client.post(url.clone()).json(&params);
        self.api(Method::POST, url, request).await?.into_json()
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut url = self.endpoint("api/sessions")?;
        url.path_segments_mut()
            .map_err(|_| Error::url("base URL cannot carry a path", None))?
            .push(session_id);
        let request = self.client.delete(url.clone());
        self.api(Method::DELETE, url, request).await?;
        Ok(())
    }

    async fn history(&self, session_id: &str, limit: Option<u32>) -> Result<Vec<HistoryMessage>> {
        let mut url = self.endpoint("api/history")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("session_id", session_id);
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
        }
        let request = self.client.get(url.clone());
        let history: History = self.api(Method::GET, url, request).await?.into_json()?;
        Ok(history.items)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint("api/chat")?;
        let builder = self.client.post(url.clone()).json(request);
        self.api(Method::POST, url, builder).await?.into_json()
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<UploadedFile> {
        let url = self.endpoint("api/files")?;
        let part = Part::bytes(upload.data.to_vec()).file_name(upload.filename);
        let form = Form::new().part("file", part);
        let request = self.client.post(url.clone()).multipart(form);
        self.api(Method::POST, url, request).await?.into_json()
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Parse a base URL, forcing a trailing `/` so endpoint paths join beneath it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{raw} cannot be used as a base URL"), None));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// The message surfaced for a non-success response: the body, or the status
/// reason when the body is empty.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one canned HTTP response; the handle yields the raw request.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut seen = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
                if request_complete(&seen) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&seen).into_owned()
        });
        (format!("http://{addr}/"), handle)
    }

    fn request_complete(seen: &[u8]) -> bool {
        let Some(end) = seen.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&seen[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        seen.len() >= end + 4 + length
    }

    fn http_response(status_line: &str, content_type: Option<&str>, body: &str) -> String {
        let mut out = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n",
            body.len()
        );
        if let Some(content_type) = content_type {
            out.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        out.push_str("\r\n");
        out.push_str(body);
        out
    }

    #[test]
    fn test_client_creation() {
        let client = RagChat::new(Some("http://example.com/chat".to_string())).unwrap();
        assert_eq!(client.base_url().as_str(), "http://example.com/chat/");
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);

        let client = RagChat::with_options(
            Some("http://example.com/".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "http://example.com/");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(
            client.endpoint("api/sessions").unwrap().as_str(),
            "http://example.com/api/sessions"
        );
    }

    #[test]
    fn bad_base_urls() {
        assert!(RagChat::new(Some("not a url".to_string())).is_err());
        assert!(RagChat::new(Some("mailto:someone@example.com".to_string())).is_err());
    }

    #[test]
    fn error_message_prefers_body() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"detail":"session not found"}"#),
            r#"{"detail":"session not found"}"#
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(
            error_message(StatusCode::from_u16(599).unwrap(), ""),
            "599"
        );
    }

    #[test]
    fn text_body_is_not_json() {
        let err = ApiBody::Text("ok".to_string())
            .into_json::<SessionList>()
            .unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[tokio::test]
    async fn list_sessions_over_http() {
        let body = json!({"items": [{"session_id": "s-1", "title": "Trip"}]}).to_string();
        let (base, server) =
            serve_once(http_response("200 OK", Some("application/json"), &body)).await;
        let client = RagChat::new(Some(base)).unwrap();
        let sessions = client.list_sessions().await.unwrap();
        assert_eq!(sessions, vec![SessionSummary::new("s-1").with_title("Trip")]);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/sessions HTTP/1.1"));
    }

    #[tokio::test]
    async fn history_encodes_query() {
        let (base, server) = serve_once(http_response(
            "200 OK",
            Some("application/json; charset=utf-8"),
            r#"{"items": [{"role": "user", "content": "hi"}]}"#,
        ))
        .await;
        let client = RagChat::new(Some(base)).unwrap();
        let items = client.history("a b&c", Some(50)).await.unwrap();
        assert_eq!(items.len(), 1);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/history?session_id=a+b%26c&limit=50 HTTP/1.1"));
    }

    #[tokio::test]
    async fn delete_accepts_empty_success() {
        let (base, server) = serve_once(http_response("204 No Content", None, "")).await;
        let client = RagChat::new(Some(base)).unwrap();
        client.delete_session("s-1").await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/sessions/s-1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn non_success_surfaces_body() {
        let (base, _server) = serve_once(http_response(
            "404 Not Found",
            Some("application/json"),
            r#"{"detail":"session not found"}"#,
        ))
        .await;
        let client = RagChat::new(Some(base)).unwrap();
        let err = client.delete_session("gone").await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.message(), r#"{"detail":"session not found"}"#);
    }

    #[tokio::test]
    async fn non_success_without_body_uses_reason() {
        let (base, _server) =
            serve_once(http_response("500 Internal Server Error", None, "")).await;
        let client = RagChat::new(Some(base)).unwrap();
        let err = client.list_sessions().await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[tokio::test]
    async fn chat_posts_json() {
        let (base, server) = serve_once(http_response(
            "200 OK",
            Some("application/json"),
            r#"{"assistant_message": "Hello!", "citations": [], "token_usage": {"prompt": 3, "completion": 2}}"#,
        ))
        .await;
        let client = RagChat::new(Some(base)).unwrap();
        let request = ChatRequest {
            session_id: "s-1".to_string(),
            message: "hi".to_string(),
            use_rag: false,
            file_ids: vec!["f-1".to_string()],
        };
        let reply = client.chat(&request).await.unwrap();
        assert_eq!(reply.assistant_message, "Hello!");
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/chat HTTP/1.1"));
        let body = raw.split("\r\n\r\n").nth(1).unwrap();
        let sent: ChatRequest = serde_json::from_str(body).unwrap();
        assert_eq!(sent, request);
    }

    #[derive(Default)]
    struct RecordingLogger {
        lines: std::sync::Mutex<Vec<String>>,
    }

    impl ClientLogger for RecordingLogger {
        fn log_request(&self, method: &str, url: &str) {
            self.lines.lock().unwrap().push(format!("--> {method} {url}"));
        }

        fn log_response(&self, method: &str, url: &str, status: u16, _: &ApiBody) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("<-- {status} {method} {url}"));
        }

        fn log_failure(&self, method: &str, url: &str, error: &Error) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("<-- {method} {url} {:?}", error.status_code()));
        }
    }

    #[tokio::test]
    async fn logger_sees_request_and_failure() {
        let (base, _server) = serve_once(http_response("503 Service Unavailable", None, "")).await;
        let logger = Arc::new(RecordingLogger::default());
        let client = RagChat::new(Some(base.clone()))
            .unwrap()
            .with_logger(logger.clone());
        client.list_sessions().await.unwrap_err();
        let lines = logger.lines.lock().unwrap().clone();
        assert_eq!(
            lines,
            vec![
                format!("--> GET {base}api/sessions"),
                format!("<-- GET {base}api/sessions Some(503)"),
            ]
        );
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_field() {
        let (base, server) = serve_once(http_response(
            "200 OK",
            Some("application/json"),
            r#"{"file_id": "f-9", "filename": "notes.txt", "status": "indexed", "indexed": true}"#,
        ))
        .await;
        let client = RagChat::new(Some(base)).unwrap();
        let uploaded = client
            .upload_file(FileUpload::new("notes.txt", &b"hello notes"[..]))
            .await
            .unwrap();
        assert_eq!(uploaded.file_id, "f-9");
        assert!(uploaded.is_indexed());
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/files HTTP/1.1"));
        assert!(raw.contains(r#"name="file"; filename="notes.txt""#));
        assert!(raw.contains("hello notes"));
    }

    #[tokio::test]
    async fn plain_text_success_is_text() {
        let (base, _server) =
            serve_once(http_response("200 OK", Some("text/plain"), "pong")).await;
        let client = RagChat::new(Some(base)).unwrap();
        let url = client.endpoint("ping").unwrap();
        let request = client.client.get(url.clone());
        let body = client.api(Method::GET, url, request).await.unwrap();
        assert_eq!(body, ApiBody::Text("pong".to_string()));
    }
}
