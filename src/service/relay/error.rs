use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::middleware::error_handler::ErrorResponse;

/// Failures of a single relay call.
///
/// Display strings are for server-side logs. What the caller sees is
/// rendered by [`ResponseError::error_response`] and never carries
/// upstream bodies or secrets.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Upstream rate limit exceeded")]
    RateLimited,
    #[error("Upstream quota exhausted")]
    QuotaExhausted,
    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream idle for more than {0}s")]
    Timeout(u64),
}

impl RelayError {
    fn client_message(&self) -> String {
        match self {
            RelayError::Configuration(_) => t!("errors.relay.not_configured").to_string(),
            RelayError::InvalidRequest(_) => t!("errors.relay.invalid_request").to_string(),
            RelayError::RateLimited => t!("errors.relay.rate_limited").to_string(),
            RelayError::QuotaExhausted => t!("errors.relay.payment_required").to_string(),
            RelayError::Upstream { .. } | RelayError::Network(_) | RelayError::Timeout(_) => {
                t!("errors.relay.gateway_error").to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Network(err.to_string())
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            RelayError::Configuration(_)
            | RelayError::Upstream { .. }
            | RelayError::Network(_)
            | RelayError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse::new(status, self.client_message()))
    }
}
