//! Client-side chat controller: owns the live transcript, mirrors it into the
//! device cache after every change and talks to the submit endpoint.

pub mod cache;
pub mod transport;

use chrono::{ DateTime, Utc };
use log::{ error, info, warn };
use std::sync::Arc;
use thiserror::Error;

use crate::models::chat::ChatMessage;
use crate::transcript::{ history_panel, transcript_view, PanelEntry, TranscriptEntry };
pub use cache::{ FileCache, MemoryCache, TranscriptCache, CACHE_KEY };
pub use transport::{ HttpTransport, Transport, TransportError };

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
    /// Last submission did not reach the server; the next submit starts over.
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: SessionState,
    cache: Box<dyn TranscriptCache>,
    transport: Arc<dyn Transport>,
    clock: Clock,
}

impl ChatSession {
    pub fn open(cache: Box<dyn TranscriptCache>, transport: Arc<dyn Transport>) -> Self {
        let messages = cache.load();
        info!("Restored {} cached message(s)", messages.len());
        Self {
            messages,
            state: SessionState::Idle,
            cache,
            transport,
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current time, never earlier than the newest message.
    fn next_instant(&self) -> DateTime<Utc> {
        let now = (self.clock)();
        match self.messages.last().and_then(ChatMessage::instant) {
            Some(last) if last > now => last,
            _ => now,
        }
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if let Err(e) = self.cache.save(&self.messages) {
            warn!("Failed to write transcript cache: {}", e);
        }
    }

    /// Appends `input` as a user message, sends the transcript and appends the
    /// answer. A failed send leaves the user message in place.
    pub async fn submit(&mut self, input: &str) -> Result<ChatMessage, SessionError> {
        let content = input.trim();
        if content.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let at = self.next_instant();
        self.push(ChatMessage::user(content, at));
        self.state = SessionState::Sending;

        let outcome = self.transport.send(&self.messages).await;
        match outcome {
            Ok(text) => {
                let reply = ChatMessage::bot(text, self.next_instant());
                self.push(reply.clone());
                self.state = SessionState::Idle;
                Ok(reply)
            }
            Err(e) => {
                error!("Error: {}", e);
                self.state = SessionState::Failed(e.to_string());
                Err(SessionError::Transport(e))
            }
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.state = SessionState::Idle;
        if let Err(e) = self.cache.remove() {
            warn!("Failed to remove transcript cache: {}", e);
        }
    }

    pub fn history_panel(&self, now: DateTime<Utc>) -> Vec<PanelEntry> {
        history_panel(&self.messages, now)
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        transcript_view(&self.messages)
    }
}
