//! Client side of the support chat: relay client, turn state machine,
//! transcript and session.

pub mod chat_client;
pub mod session;
pub mod state;
pub mod transcript;

pub use chat_client::{ClientError, SupportChatClient, TurnEvent};
pub use session::{ChatSession, SessionError, TurnCanceller, TurnOutcome};
pub use state::{StateError, TurnFailure, TurnState};
pub use transcript::{Transcript, TranscriptEntry, TurnId};
