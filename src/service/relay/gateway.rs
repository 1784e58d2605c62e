use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{header, StatusCode};
use std::pin::Pin;
use std::time::Duration;
use uuid::Uuid;

use super::error::RelayError;
use crate::entities::{GatewayRequest, Message};
use crate::utils::config::RelayConfig;

/// Upstream event-stream bytes, relayed to the caller unchanged.
pub type RelayStream = Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send>>;

/// Places the system prompt ahead of the caller's history.
pub fn compose_messages(system_prompt: &str, history: Vec<Message>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(system_prompt));
    messages.extend(history);
    messages
}

/// Client for the hosted chat-completion gateway.
///
/// Built once at startup and shared through `web::Data`; it holds no
/// per-request state.
pub struct GatewayClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    system_prompt: String,
    idle_timeout: Duration,
}

impl GatewayClient {
    pub fn new(
        config: &RelayConfig,
        api_key: Option<String>,
        system_prompt: String,
    ) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder().connect_timeout(config.connect_timeout()).build()?;
        Ok(Self {
            http,
            url: config.gateway_url.clone(),
            model: config.model.clone(),
            api_key,
            system_prompt,
            idle_timeout: config.idle_timeout(),
        })
    }

    /// Reads the secret from the environment and the prompt from config.
    pub fn from_config(config: &RelayConfig) -> anyhow::Result<Self> {
        let system_prompt = config.system_prompt()?;
        Ok(Self::new(config, config.api_key(), system_prompt)?)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn compose_request(&self, history: Vec<Message>) -> GatewayRequest {
        GatewayRequest {
            model: self.model.clone(),
            messages: compose_messages(&self.system_prompt, history),
            stream: true,
        }
    }

    /// Opens a streamed completion for `history`.
    ///
    /// Known upstream statuses (429, 402) map to their own variants; any
    /// other non-OK status is logged with its body and reported as an opaque
    /// `Upstream` error. Waiting for the response headers is bounded by the
    /// idle timeout, like every later chunk.
    pub async fn open_stream(
        &self,
        request_id: Uuid,
        history: Vec<Message>,
    ) -> Result<RelayStream, RelayError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RelayError::Configuration("gateway API key is not configured".to_string())
        })?;

        let body = self.compose_request(history);
        log::debug!(
            "[{}] Forwarding {} messages to {} (model {})",
            request_id,
            body.messages.len(),
            self.url,
            body.model
        );

        let send = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .header(header::ACCEPT, "text/event-stream")
            .json(&body)
            .send();
        let response = tokio::time::timeout(self.idle_timeout, send)
            .await
            .map_err(|_| {
                log::error!(
                    "[{}] AI gateway sent no response headers within {}s",
                    request_id,
                    self.idle_timeout.as_secs()
                );
                RelayError::Timeout(self.idle_timeout.as_secs())
            })?
            .map_err(|e| {
                log::error!("[{}] AI gateway unreachable: {}", request_id, e);
                RelayError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    log::warn!("[{}] AI gateway rate limited the request", request_id);
                    RelayError::RateLimited
                }
                StatusCode::PAYMENT_REQUIRED => {
                    log::warn!("[{}] AI gateway quota exhausted", request_id);
                    RelayError::QuotaExhausted
                }
                _ => {
                    let detail = tokio::time::timeout(self.idle_timeout, response.text())
                        .await
                        .ok()
                        .and_then(Result::ok)
                        .unwrap_or_default();
                    log::error!("[{}] AI gateway error: {} {}", request_id, status, detail);
                    RelayError::Upstream { status: status.as_u16() }
                }
            });
        }

        Ok(idle_timeout(Box::pin(response.bytes_stream()), self.idle_timeout, request_id))
    }
}

/// Ends the stream with `RelayError::Timeout` when no chunk arrives within
/// `idle`. The inner stream is dropped on the first error.
fn idle_timeout<S>(inner: S, idle: Duration, request_id: Uuid) -> RelayStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin + Send + 'static,
{
    let chunks = stream::unfold(Some(inner), move |state| async move {
        let mut inner = state?;
        match tokio::time::timeout(idle, inner.next()).await {
            Ok(Some(Ok(bytes))) => Some((Ok(bytes), Some(inner))),
            Ok(Some(Err(e))) => {
                log::error!("[{}] Upstream stream failed: {}", request_id, e);
                Some((Err(RelayError::from(e)), None))
            }
            Ok(None) => {
                log::debug!("[{}] Upstream stream finished", request_id);
                None
            }
            Err(_) => {
                log::warn!("[{}] Upstream idle for {}s, closing stream", request_id, idle.as_secs());
                Some((Err(RelayError::Timeout(idle.as_secs())), None))
            }
        }
    });
    Box::pin(chunks)
}
