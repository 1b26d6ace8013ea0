//! Core types shared across the service

pub mod chat;
pub mod document;

pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatRole, Greeting};
pub use document::{DocumentChunk, ScoredChunk};
