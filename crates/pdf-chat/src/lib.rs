//! pdf-chat: question answering over a previously ingested PDF document
//!
//! Retrieval-augmented generation glue: each inbound chat message is embedded,
//! the top-k most similar stored chunks are fetched from an Astra DB vector
//! collection, and the chunks plus the question are forwarded to the OpenAI
//! chat completions API. The raw model reply is returned to the user.

pub mod astra;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use types::{
    chat::{ChatMessage, ChatReply, ChatRequest, ChatRole},
    document::{DocumentChunk, ScoredChunk},
};
