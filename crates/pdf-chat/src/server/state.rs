//! Application state for the chat server
//!
//! The store and model clients live in one explicitly constructed context
//! object handed to every route; there is no module-level state.

use std::sync::Arc;

use crate::astra::{bundle, AstraVectorStore};
use crate::config::ChatConfig;
use crate::error::Result;
use crate::providers::OpenAiClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// Astra DB vector store
    store: AstraVectorStore,
    /// OpenAI client (embeddings and chat completion)
    openai: OpenAiClient,
}

impl AppState {
    /// Create new application state from validated configuration
    pub fn new(config: ChatConfig) -> Result<Self> {
        let endpoint = match &config.astra.api_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                let bundle = bundle::read_bundle(&config.astra.secure_bundle_path)?;
                bundle::data_api_endpoint(&bundle)?
            }
        };
        tracing::info!("Astra Data API endpoint: {}", endpoint);

        let store = AstraVectorStore::new(endpoint, &config.astra)?;
        tracing::info!(
            "Vector store initialized (keyspace: {}, collection: {})",
            config.astra.keyspace,
            config.astra.collection
        );

        let openai = OpenAiClient::new(&config.openai)?;
        tracing::info!(
            "OpenAI client initialized (chat: {}, embeddings: {})",
            config.openai.chat_model,
            config.openai.embed_model
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                openai,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Get the vector store
    pub fn store(&self) -> &AstraVectorStore {
        &self.inner.store
    }

    /// Get the OpenAI client
    pub fn openai(&self) -> &OpenAiClient {
        &self.inner.openai
    }
}
