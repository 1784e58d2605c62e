use derive_more::Display;
use thiserror::Error;

use super::chat_client::ClientError;

/// Why a turn ended in `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TurnFailure {
    #[display("rate limited")]
    RateLimited,
    #[display("quota exhausted")]
    QuotaExhausted,
    #[display("relay error")]
    Relay,
    #[display("network error")]
    Network,
    #[display("aborted")]
    Aborted,
}

impl From<&ClientError> for TurnFailure {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::RateLimited => TurnFailure::RateLimited,
            ClientError::QuotaExhausted => TurnFailure::QuotaExhausted,
            ClientError::Status(_) => TurnFailure::Relay,
            ClientError::Network(_) | ClientError::Timeout(_) => TurnFailure::Network,
            ClientError::Aborted => TurnFailure::Aborted,
        }
    }
}

/// Lifecycle of one conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum TurnState {
    #[default]
    #[display("idle")]
    Idle,
    #[display("awaiting-response")]
    AwaitingResponse,
    #[display("streaming")]
    Streaming,
    #[display("complete")]
    Complete,
    #[display("error ({_0})")]
    Error(TurnFailure),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Illegal turn transition: {from} -> {to}")]
pub struct StateError {
    pub from: TurnState,
    pub to: TurnState,
}

impl TurnState {
    /// Input is refused while a turn is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, TurnState::AwaitingResponse | TurnState::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Complete | TurnState::Error(_))
    }

    pub fn transition(self, to: TurnState) -> Result<TurnState, StateError> {
        use TurnState::*;
        let allowed = match (self, to) {
            (Idle, AwaitingResponse) => true,
            (AwaitingResponse, Streaming) => true,
            (Streaming, Streaming) | (Streaming, Complete) => true,
            (Idle | AwaitingResponse | Streaming, Error(_)) => true,
            (_, Idle) => !self.is_busy(),
            _ => false,
        };
        if allowed {
            Ok(to)
        } else {
            Err(StateError { from: self, to })
        }
    }
}
