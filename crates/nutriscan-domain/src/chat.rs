//! Chat module - turns of the follow-up conversation

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person asking questions
    User,

    /// The model answering them
    Ai,
}

impl Sender {
    /// Label used when the history is serialized into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Ai => "AI",
        }
    }
}

/// One turn of the follow-up conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who wrote the turn
    pub sender: Sender,

    /// Raw text of the turn; AI replies are never parsed
    pub text: String,
}

impl ChatMessage {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create an AI turn
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
        }
    }
}
