//! Provider abstractions for embeddings, chat completion, and vector storage

pub mod chat;
pub mod embedding;
pub mod openai;
pub mod vector_store;

pub use chat::ChatProvider;
pub use embedding::EmbeddingProvider;
pub use openai::OpenAiClient;
pub use vector_store::VectorStore;
