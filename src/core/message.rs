use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }

    /// Role name used when the transcript is replayed to a model.
    pub fn to_api_role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_ai(self) -> bool {
        self == Sender::Ai
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            _ => Err(format!("invalid message sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// A single transcript entry. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: impl Into<String>, sender: Sender, content: impl Into<String>) -> Self {
        Self::with_timestamp(id, sender, content, Utc::now())
    }

    pub fn with_timestamp(
        id: impl Into<String>,
        sender: Sender,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender,
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_ai(&self) -> bool {
        self.sender.is_ai()
    }
}

/// Hands out `<epoch-millis>-<seq>` ids that stay unique within a conversation
/// even when two messages share a millisecond.
#[derive(Debug, Default)]
pub struct MessageIdSource {
    next_seq: u64,
}

impl MessageIdSource {
    pub fn next_id(&mut self, at: DateTime<Utc>) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("{}-{}", at.timestamp_millis(), seq)
    }
}
