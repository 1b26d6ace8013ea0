//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::chat::ChatMessage;

/// Trait for chat completion backends
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run a chat completion over the assembled messages, returning the raw
    /// reply text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
