//! Configuration for the chat service
//!
//! All credentials come from the environment and are read exactly once at
//! startup. Missing required variables abort startup with an error naming
//! every absent variable, before any external connection is attempted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Path to the Astra DB secure connect bundle (zip archive)
pub const ENV_SECURE_BUNDLE_PATH: &str = "ASTRA_DB_SECURE_BUNDLE_PATH";
/// Astra DB application token (`AstraCS:...`)
pub const ENV_APPLICATION_TOKEN: &str = "ASTRA_DB_APPLICATION_TOKEN";
/// Astra DB keyspace holding the document collection
pub const ENV_KEYSPACE: &str = "ASTRA_DB_KEYSPACE";
/// OpenAI API key
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Optional override for the Astra Data API endpoint
pub const ENV_API_ENDPOINT: &str = "ASTRA_DB_API_ENDPOINT";
/// Optional override for the OpenAI base URL (proxies, compatible APIs)
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
/// Optional server bind host
pub const ENV_HOST: &str = "PDF_CHAT_HOST";
/// Optional server bind port
pub const ENV_PORT: &str = "PDF_CHAT_PORT";

/// Main chat service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatConfig {
    /// Astra DB connection configuration
    pub astra: AstraConfig,
    /// OpenAI configuration
    pub openai: OpenAiConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Chunking configuration (ingestion path)
    pub chunking: ChunkingConfig,
    /// Server configuration
    pub server: ServerConfig,
}

/// Astra DB connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstraConfig {
    /// Path to the secure connect bundle zip
    pub secure_bundle_path: PathBuf,
    /// Application token used for Data API authentication
    pub token: String,
    /// Keyspace holding the document collection
    pub keyspace: String,
    /// Collection (table) name for PDF text chunks
    pub collection: String,
    /// Data API endpoint override; derived from the bundle when absent
    pub api_endpoint: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AstraConfig {
    fn default() -> Self {
        Self {
            secure_bundle_path: PathBuf::new(),
            token: String::new(),
            keyspace: String::new(),
            collection: "pdftexttable".to_string(),
            api_endpoint: None,
            timeout_secs: 30,
        }
    }
}

/// OpenAI configuration for embeddings and chat completions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: String,
    /// Base URL (default: the official API)
    pub base_url: String,
    /// Chat completion model
    pub chat_model: String,
    /// Embedding model
    pub embed_model: String,
    /// Embedding dimensions (1536 for text-embedding-ada-002)
    pub dimensions: usize,
    /// Sampling temperature; 0.0 for deterministic replies
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            embed_model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
            temperature: 0.0,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of similar chunks fetched per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Text chunking configuration for the ingestion path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

impl ChatConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function
    ///
    /// All four required variables are checked up front so the startup error
    /// names every missing variable, not just the first one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        const REQUIRED: [&str; 4] = [
            ENV_SECURE_BUNDLE_PATH,
            ENV_APPLICATION_TOKEN,
            ENV_KEYSPACE,
            ENV_OPENAI_API_KEY,
        ];

        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(Error::MissingEnv(missing));
        }

        let mut config = Self::default();
        // Presence was checked above
        config.astra.secure_bundle_path =
            PathBuf::from(lookup(ENV_SECURE_BUNDLE_PATH).unwrap_or_default());
        config.astra.token = lookup(ENV_APPLICATION_TOKEN).unwrap_or_default();
        config.astra.keyspace = lookup(ENV_KEYSPACE).unwrap_or_default();
        config.openai.api_key = lookup(ENV_OPENAI_API_KEY).unwrap_or_default();

        if let Some(endpoint) = lookup(ENV_API_ENDPOINT) {
            config.astra.api_endpoint = Some(endpoint.trim_end_matches('/').to_string());
        }
        if let Some(base_url) = lookup(ENV_OPENAI_BASE_URL) {
            config.openai.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(host) = lookup(ENV_HOST) {
            config.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_PORT} is not a valid port: {port}")))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_SECURE_BUNDLE_PATH, "/tmp/scb.zip"),
            (ENV_APPLICATION_TOKEN, "AstraCS:test-token"),
            (ENV_KEYSPACE, "pdfchat"),
            (ENV_OPENAI_API_KEY, "sk-test"),
        ])
    }

    fn lookup_in<'a>(env: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| env.get(name).map(|v| v.to_string())
    }

    #[test]
    fn loads_with_all_required_vars() {
        let env = base_env();
        let config = ChatConfig::from_lookup(lookup_in(&env)).unwrap();

        assert_eq!(config.astra.keyspace, "pdfchat");
        assert_eq!(config.astra.collection, "pdftexttable");
        assert_eq!(config.openai.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.openai.temperature, 0.0);
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn reports_every_missing_var() {
        let mut env = base_env();
        env.remove(ENV_APPLICATION_TOKEN);
        env.remove(ENV_OPENAI_API_KEY);

        let err = ChatConfig::from_lookup(lookup_in(&env)).unwrap_err();
        match err {
            Error::MissingEnv(names) => {
                assert_eq!(names.len(), 2);
                assert!(names.contains(&ENV_APPLICATION_TOKEN.to_string()));
                assert!(names.contains(&ENV_OPENAI_API_KEY.to_string()));
            }
            other => panic!("expected MissingEnv, got {other:?}"),
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut env = base_env();
        env.insert(ENV_KEYSPACE, "   ");

        let err = ChatConfig::from_lookup(lookup_in(&env)).unwrap_err();
        assert!(matches!(err, Error::MissingEnv(names) if names == [ENV_KEYSPACE]));
    }

    #[test]
    fn optional_overrides_apply() {
        let mut env = base_env();
        env.insert(ENV_API_ENDPOINT, "https://example.apps.astra.datastax.com/");
        env.insert(ENV_OPENAI_BASE_URL, "http://localhost:8000/v1");
        env.insert(ENV_PORT, "9090");

        let config = ChatConfig::from_lookup(lookup_in(&env)).unwrap();
        assert_eq!(
            config.astra.api_endpoint.as_deref(),
            Some("https://example.apps.astra.datastax.com")
        );
        assert_eq!(config.openai.base_url, "http://localhost:8000/v1");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let mut env = base_env();
        env.insert(ENV_PORT, "not-a-port");

        let err = ChatConfig::from_lookup(lookup_in(&env)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
