use futures::StreamExt;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::entities::{Message, RelayRequest};
use crate::service::reducer::StreamReducer;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Too many requests, please try again later")]
    RateLimited,
    #[error("Payment required, please add funds to continue")]
    QuotaExhausted,
    #[error("Relay returned status {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Network(String),
    #[error("No data received for {0}s")]
    Timeout(u64),
    #[error("Turn aborted")]
    Aborted,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Progress of a streamed turn, reported as it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent<'a> {
    /// The relay accepted the request and the event stream is open.
    Opened,
    /// A new fragment arrived; `content` is everything received so far.
    Delta { fragment: &'a str, content: &'a str },
}

/// HTTP client for the support-chat relay endpoint.
#[derive(Clone)]
pub struct SupportChatClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    idle_timeout: Duration,
}

impl SupportChatClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            access_token: None,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `history` and streams the answer, returning the full assistant
    /// text once the stream ends.
    ///
    /// 429 and 402 responses are reported by status before any body is read.
    /// The idle timeout bounds the wait for the response headers as well as
    /// the gap between body chunks.
    /// Dropping the returned future closes the connection.
    pub async fn stream_turn<F>(
        &self,
        history: Vec<Message>,
        mut on_event: F,
    ) -> Result<String, ClientError>
    where
        F: FnMut(TurnEvent<'_>),
    {
        let mut request = self.http.post(&self.endpoint).json(&RelayRequest { messages: history });
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = tokio::time::timeout(self.idle_timeout, request.send())
            .await
            .map_err(|_| ClientError::Timeout(self.idle_timeout.as_secs()))??;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(ClientError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => return Err(ClientError::QuotaExhausted),
            status if !status.is_success() => return Err(ClientError::Status(status.as_u16())),
            _ => {}
        }
        on_event(TurnEvent::Opened);

        let mut body = Box::pin(response.bytes_stream());
        let mut reducer = StreamReducer::new();
        let mut content = String::new();
        loop {
            let next = tokio::time::timeout(self.idle_timeout, body.next())
                .await
                .map_err(|_| ClientError::Timeout(self.idle_timeout.as_secs()))?;
            let (fragments, eof) = match next {
                Some(chunk) => (reducer.feed(&chunk?), false),
                None => (reducer.finish(), true),
            };
            for fragment in &fragments {
                content.push_str(fragment);
                on_event(TurnEvent::Delta { fragment, content: &content });
            }
            if eof || reducer.is_done() {
                break;
            }
        }

        if reducer.anomalies() > 0 {
            log::warn!("Stream finished with {} unparseable lines", reducer.anomalies());
        }
        Ok(content)
    }
}
