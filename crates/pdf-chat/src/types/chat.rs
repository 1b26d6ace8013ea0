//! Chat wire types

use serde::{Deserialize, Serialize};

/// Role of a chat message, serialized for the chat completions API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions to the model
    System,
    /// Model-side content (carries the retrieved supporting text)
    Assistant,
    /// The customer's message
    User,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: ChatRole,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Inbound chat request: a single user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub message: String,
}

/// Reply to a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Fixed framing line shown above the answer
    pub message: String,
    /// Raw model reply
    pub answer: String,
    /// Number of chunks retrieved for this question
    pub chunks_retrieved: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ChatReply {
    /// Create a reply wrapping the raw model answer
    pub fn new(answer: String, chunks_retrieved: usize, processing_time_ms: u64) -> Self {
        Self {
            message: "Here is the answer to your question:".to_string(),
            answer,
            chunks_retrieved,
            processing_time_ms,
        }
    }
}

/// Static greeting sent at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    /// Greeting text
    pub message: String,
}
