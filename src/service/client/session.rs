use futures::future::{AbortHandle, Abortable};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

use super::chat_client::{ClientError, SupportChatClient, TurnEvent};
use super::state::{StateError, TurnFailure, TurnState};
use super::transcript::{Transcript, TurnId};
use crate::entities::{Conversation, Message, Role};
use crate::service::store::{ConversationStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session is mid-turn. Calls take `&mut self` and a dropped turn
    /// settles to `Error(Aborted)`, so callers only see this if the state
    /// was left busy by other means.
    #[error("A turn is already in progress")]
    Busy,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    State(#[from] StateError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, nothing was sent.
    Ignored,
    /// The stream ended; the text may be empty if no fragment arrived.
    Completed(String),
    Failed(TurnFailure),
}

/// Cancels the turn currently in flight, from any task.
#[derive(Clone, Default)]
pub struct TurnCanceller {
    current: Arc<Mutex<Option<AbortHandle>>>,
}

impl TurnCanceller {
    /// Returns `false` when no turn was running.
    pub fn cancel(&self) -> bool {
        match self.current.lock() {
            Ok(mut current) => match current.take() {
                Some(handle) => {
                    handle.abort();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn install(&self, handle: AbortHandle) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(handle);
        }
    }

    fn clear(&self) {
        if let Ok(mut current) = self.current.lock() {
            current.take();
        }
    }
}

/// One user's support chat: transcript, turn state and persistence.
pub struct ChatSession {
    client: SupportChatClient,
    store: Arc<dyn ConversationStore>,
    conversation_id: Option<Uuid>,
    transcript: Transcript,
    state: TurnState,
    canceller: TurnCanceller,
}

impl ChatSession {
    pub fn new(client: SupportChatClient, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            store,
            conversation_id: None,
            transcript: Transcript::new(),
            state: TurnState::Idle,
            canceller: TurnCanceller::default(),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn conversation_id(&self) -> Option<Uuid> {
        self.conversation_id
    }

    pub fn canceller(&self) -> TurnCanceller {
        self.canceller.clone()
    }

    pub async fn send(&mut self, input: &str) -> Result<TurnOutcome, SessionError> {
        self.send_observed(input, |_| {}).await
    }

    /// Sends `input` as a new turn, calling `on_fragment` for every piece of
    /// streamed text.
    pub async fn send_observed<F>(
        &mut self,
        input: &str,
        mut on_fragment: F,
    ) -> Result<TurnOutcome, SessionError>
    where
        F: FnMut(&str),
    {
        if input.trim().is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        if self.state.is_busy() {
            return Err(SessionError::Busy);
        }

        let conversation_id = match self.conversation_id {
            Some(id) => id,
            None => {
                let conversation = self.store.create_conversation(Some(input.to_string())).await?;
                self.conversation_id = Some(conversation.id);
                self.transcript.clear();
                conversation.id
            }
        };

        self.state = self.state.transition(TurnState::Idle)?;
        let turn = TurnId::new();
        let mut history = self.transcript.messages();
        history.push(Message::user(input));
        self.transcript.push_user(turn, input);
        self.state = self.state.transition(TurnState::AwaitingResponse)?;
        let mut guard =
            InFlightTurn { state: &mut self.state, canceller: &self.canceller, settled: false };

        if let Err(e) = self.store.save_message(conversation_id, Role::User, input.to_string()).await
        {
            log::error!("Error saving user message: {}", e);
        }

        let (handle, registration) = AbortHandle::new_pair();
        guard.canceller.install(handle);

        let streamed = {
            let transcript = &mut self.transcript;
            let state = &mut *guard.state;
            Abortable::new(
                self.client.stream_turn(history, |event| {
                    advance(state, TurnState::Streaming);
                    if let TurnEvent::Delta { fragment, content } = event {
                        transcript.upsert_assistant(turn, content);
                        on_fragment(fragment);
                    }
                }),
                registration,
            )
            .await
        };
        guard.settled = true;
        drop(guard);

        let result = streamed.unwrap_or(Err(ClientError::Aborted));
        match result {
            Ok(content) => {
                self.state = self.state.transition(TurnState::Complete)?;
                if !content.is_empty() {
                    if let Err(e) = self
                        .store
                        .save_message(conversation_id, Role::Assistant, content.clone())
                        .await
                    {
                        log::error!("Error saving assistant message: {}", e);
                    }
                }
                Ok(TurnOutcome::Completed(content))
            }
            Err(err) => {
                log::error!("Chat error: {}", err);
                let failure = TurnFailure::from(&err);
                self.state = self.state.transition(TurnState::Error(failure))?;
                Ok(TurnOutcome::Failed(failure))
            }
        }
    }

    /// Starts an empty conversation and makes it current.
    pub async fn new_conversation(&mut self) -> Result<Conversation, SessionError> {
        self.ensure_idle()?;
        let conversation = self.store.create_conversation(None).await?;
        self.conversation_id = Some(conversation.id);
        self.transcript.clear();
        self.state = TurnState::Idle;
        Ok(conversation)
    }

    pub async fn select_conversation(&mut self, conversation_id: Uuid) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let messages = self.store.load_messages(conversation_id).await?;
        self.conversation_id = Some(conversation_id);
        self.transcript = Transcript::from_messages(messages.into_iter().map(Message::from));
        self.state = TurnState::Idle;
        Ok(())
    }

    pub async fn delete_conversation(&mut self, conversation_id: Uuid) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.store.delete_conversation(conversation_id).await?;
        if self.conversation_id == Some(conversation_id) {
            self.conversation_id = None;
            self.transcript.clear();
            self.state = TurnState::Idle;
        }
        Ok(())
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, SessionError> {
        Ok(self.store.list_conversations().await?)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.state.is_busy() {
            Err(SessionError::Busy)
        } else {
            Ok(())
        }
    }
}

/// Settles a turn whose `send` future was dropped before the stream ended.
struct InFlightTurn<'a> {
    state: &'a mut TurnState,
    canceller: &'a TurnCanceller,
    settled: bool,
}

impl Drop for InFlightTurn<'_> {
    fn drop(&mut self) {
        self.canceller.clear();
        if !self.settled && self.state.is_busy() {
            log::warn!("Turn dropped while {}, marking it aborted", self.state);
            *self.state = TurnState::Error(TurnFailure::Aborted);
        }
    }
}

fn advance(state: &mut TurnState, to: TurnState) {
    match state.transition(to) {
        Ok(next) => *state = next,
        Err(e) => log::warn!("{}", e),
    }
}
