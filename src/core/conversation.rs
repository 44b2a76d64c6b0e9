use chrono::Utc;
use std::error::Error;
use std::fmt;

use crate::core::companion::{Companion, CompanionId};
use crate::core::message::{Message, MessageIdSource, Sender};
use crate::generator::prompt::PromptTurn;
use crate::generator::GeneratedReply;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// The input was empty or whitespace only.
    Empty,
    /// A reply is still outstanding for the previous message.
    ReplyPending,
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationError::Empty => write!(f, "Cannot send an empty message"),
            ConversationError::ReplyPending => {
                write!(f, "Still waiting for the previous reply")
            }
        }
    }
}

impl Error for ConversationError {}

/// Snapshot handed to the generator when a user turn starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub ticket: u64,
    pub companion: CompanionId,
    pub companion_name: String,
    pub history: Vec<PromptTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply was appended and the companion's mood updated.
    Replied,
    /// The call failed; pending was cleared and nothing was appended.
    Failed,
    /// The ticket no longer matches the outstanding turn.
    Discarded,
}

/// Transcript and typing state for the active companion.
///
/// Messages are append-only. At most one reply is outstanding at a time;
/// results are matched against the ticket issued for that turn so stale
/// results (after a reset) are dropped.
#[derive(Debug)]
pub struct ConversationState {
    companion: Companion,
    messages: Vec<Message>,
    pending: Option<u64>,
    next_ticket: u64,
    ids: MessageIdSource,
}

impl ConversationState {
    pub fn new(companion: CompanionId) -> Self {
        Self {
            companion: Companion::builtin(companion),
            messages: Vec::new(),
            pending: None,
            next_ticket: 1,
            ids: MessageIdSource::default(),
        }
    }

    /// Switch to `companion` with an empty transcript. Any in-flight reply
    /// becomes stale.
    pub fn reset(&mut self, companion: CompanionId) {
        self.companion = Companion::builtin(companion);
        self.messages.clear();
        self.pending = None;
    }

    pub fn companion(&self) -> &Companion {
        &self.companion
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<u64> {
        self.pending
    }

    pub fn history(&self) -> Vec<PromptTurn> {
        self.messages.iter().map(PromptTurn::from).collect()
    }

    /// Append the user's message and mark a reply as outstanding.
    pub fn begin_turn(&mut self, content: &str) -> Result<PendingTurn, ConversationError> {
        if content.trim().is_empty() {
            return Err(ConversationError::Empty);
        }
        if self.pending.is_some() {
            return Err(ConversationError::ReplyPending);
        }

        self.push(Sender::User, content);

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);

        Ok(PendingTurn {
            ticket,
            companion: self.companion.id,
            companion_name: self.companion.name.to_string(),
            history: self.history(),
        })
    }

    pub fn complete_turn(&mut self, ticket: u64, reply: GeneratedReply) -> TurnOutcome {
        if self.pending != Some(ticket) {
            return TurnOutcome::Discarded;
        }
        self.push(Sender::Ai, reply.text);
        self.companion.set_mood(reply.mood);
        self.pending = None;
        TurnOutcome::Replied
    }

    pub fn fail_turn(&mut self, ticket: u64) -> TurnOutcome {
        if self.pending != Some(ticket) {
            return TurnOutcome::Discarded;
        }
        self.pending = None;
        TurnOutcome::Failed
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn push(&mut self, sender: Sender, content: impl Into<String>) {
        let now = Utc::now();
        let id = self.ids.next_id(now);
        self.messages
            .push(Message::with_timestamp(id, sender, content, now));
    }
}
