//! Reply service: the remote collaborator that answers user messages.
//!
//! The wire contract is one JSON exchange per turn:
//! `POST {endpoint}` with `{"message": "..."}` answered by `{"reply": "..."}`.
//! Everything else (non-2xx, connection failure, unusable body) is a
//! [`ReplyError`].

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Request body sent to the reply service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// The user's text, untrimmed.
    pub message: String,
    /// Optional background context passed through to the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ReplyRequest {
    /// Create a request carrying only the user's message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// Attach background context.
    #[must_use]
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

/// Successful response body.
#[derive(Debug, Deserialize)]
struct ReplyResponse {
    reply: String,
}

/// Body of the service's root health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthStatus {
    /// `"ok"` when the service is up.
    pub status: String,
    /// Free-form description from the service.
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    /// Whether the service reported itself up.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Coarse classification of a failed reply request, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network unreachable, connection refused, body read failure.
    Transport,
    /// Non-2xx HTTP status.
    Protocol,
    /// Response body unparseable or missing `reply`.
    Payload,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Protocol => "protocol",
            FailureKind::Payload => "payload",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a reply request.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    /// Could not reach the service or read its response.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Service answered with a non-success status.
    #[error("Reply service returned HTTP {status}")]
    Protocol { status: u16 },

    /// Service answered 2xx but the body was not a usable reply.
    #[error("Malformed reply payload: {0}")]
    Payload(#[source] serde_json::Error),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl ReplyError {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ReplyError::Transport(_) | ReplyError::InvalidEndpoint(_) => FailureKind::Transport,
            ReplyError::Protocol { .. } => FailureKind::Protocol,
            ReplyError::Payload(_) => FailureKind::Payload,
        }
    }
}

/// Source of bot replies.
#[async_trait]
pub trait ReplyService: Send + Sync {
    /// Ask the service for a reply to one user message.
    async fn reply(&self, request: &ReplyRequest) -> Result<String, ReplyError>;
}

/// [`ReplyService`] backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpReplyService {
    client: Client,
    endpoint: Url,
}

impl HttpReplyService {
    /// Create a client for the given endpoint with no request timeout.
    pub fn new(endpoint: &str) -> Result<Self, ReplyError> {
        Self::with_timeout(endpoint, None)
    }

    /// Create a client for the given endpoint.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ReplyError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ReplyError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ReplyError::Transport(Box::new(e)))?;

        Ok(Self { client, endpoint })
    }

    /// Create a client from the configured endpoint and timeout.
    pub fn from_config(config: &Config) -> Result<Self, ReplyError> {
        Self::with_timeout(&config.endpoint, config.request_timeout())
    }

    /// The chat endpoint requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Root URL of the service (`/` on the endpoint's host).
    pub fn root_url(&self) -> Url {
        let mut root = self.endpoint.clone();
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);
        root
    }

    /// Query the service's root health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ReplyError> {
        let url = self.root_url();
        debug!(url = %url, "checking reply service health");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReplyError::Transport(Box::new(e)))?;

        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(ReplyError::Payload)
    }
}

#[async_trait]
impl ReplyService for HttpReplyService {
    async fn reply(&self, request: &ReplyRequest) -> Result<String, ReplyError> {
        debug!(endpoint = %self.endpoint, "posting reply request");

        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ReplyError::Transport(Box::new(e)))?;

        let body = read_success_body(response).await?;
        let parsed: ReplyResponse = serde_json::from_str(&body).map_err(ReplyError::Payload)?;
        Ok(parsed.reply)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, ReplyError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ReplyError::Protocol {
            status: status.as_u16(),
        });
    }
    response
        .text()
        .await
        .map_err(|e| ReplyError::Transport(Box::new(e)))
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal one-shot HTTP server for exercising the client.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A request as received by the test server.
    #[derive(Debug)]
    pub struct CapturedRequest {
        pub head: String,
        pub body: String,
    }

    /// Serve exactly one response, returning the base URL and a handle that
    /// resolves to the captured request.
    pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{addr}"), handle)
    }

    /// Accept one connection and never answer it.
    pub async fn serve_silent() -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
        CapturedRequest { head, body }
    }
}
