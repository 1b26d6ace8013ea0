//! Astra DB Data API vector store
//!
//! Talks JSON over HTTPS to the Data API of the database named by the secure
//! connect bundle. Documents carry the chunk text plus a `$vector` field;
//! similarity search is a `find` sorted by `$vector` with
//! `includeSimilarity`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use crate::config::AstraConfig;
use crate::error::{Error, Result};
use crate::providers::vector_store::VectorStore;
use crate::types::document::{DocumentChunk, ScoredChunk};

/// Header carrying the application token
const TOKEN_HEADER: &str = "Token";

/// Vector store backed by the Astra DB Data API
pub struct AstraVectorStore {
    client: Client,
    endpoint: String,
    keyspace: String,
    collection: String,
    token: String,
}

impl AstraVectorStore {
    /// Create a new store client
    ///
    /// `endpoint` is the Data API base URL, either derived from the secure
    /// connect bundle or taken from the `ASTRA_DB_API_ENDPOINT` override.
    pub fn new(endpoint: impl Into<String>, config: &AstraConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            keyspace: config.keyspace.clone(),
            collection: config.collection.clone(),
            token: config.token.clone(),
        })
    }

    fn keyspace_url(&self) -> String {
        format!("{}/api/json/v1/{}", self.endpoint, self.keyspace)
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.keyspace_url(), self.collection)
    }

    /// POST a Data API command and surface API-level errors
    async fn post_command(&self, url: &str, command: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(command)
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("request failed: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("invalid response: {e}")))?;

        check_api_errors(&body)?;

        if !status.is_success() {
            return Err(Error::vector_db(format!("HTTP {status}")));
        }

        Ok(body)
    }
}

#[async_trait]
impl VectorStore for AstraVectorStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<()> {
        let command = create_collection_command(&self.collection, dimensions);

        match self.post_command(&self.keyspace_url(), &command).await {
            Ok(_) => Ok(()),
            // Re-running against an existing collection is not a failure
            Err(Error::VectorDb(msg)) if msg.contains("already exist") => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn insert_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let command = insert_command(chunks);
        let body = self.post_command(&self.collection_url(), &command).await?;

        let inserted = body
            .pointer("/status/insertedIds")
            .and_then(|ids| ids.as_array())
            .map_or(chunks.len(), |ids| ids.len());

        Ok(inserted)
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let command = find_command(query_embedding, top_k);
        let body = self.post_command(&self.collection_url(), &command).await?;

        parse_search_response(body)
    }

    async fn health_check(&self) -> Result<bool> {
        let command = json!({ "findCollections": {} });

        match self.post_command(&self.keyspace_url(), &command).await {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "astra"
    }
}

/// Build the `find` command for similarity search
fn find_command(query_embedding: &[f32], top_k: usize) -> Value {
    json!({
        "find": {
            "sort": { "$vector": query_embedding },
            "projection": { "$vector": 0 },
            "options": {
                "limit": top_k,
                "includeSimilarity": true,
            },
        }
    })
}

/// Build the `insertMany` command for a batch of embedded chunks
fn insert_command(chunks: &[DocumentChunk]) -> Value {
    let documents: Vec<Value> = chunks
        .iter()
        .map(|chunk| {
            json!({
                "_id": chunk.id.to_string(),
                "document_id": chunk.document_id.to_string(),
                "content": chunk.content,
                "source": chunk.source,
                "chunk_index": chunk.chunk_index,
                "$vector": chunk.embedding,
            })
        })
        .collect();

    json!({
        "insertMany": {
            "documents": documents,
            "options": { "ordered": false },
        }
    })
}

/// Build the `createCollection` command with vector options
fn create_collection_command(name: &str, dimensions: usize) -> Value {
    json!({
        "createCollection": {
            "name": name,
            "options": {
                "vector": {
                    "dimension": dimensions,
                    "metric": "cosine",
                },
            },
        }
    })
}

/// Reject responses carrying a Data API `errors` array
fn check_api_errors(body: &Value) -> Result<()> {
    if let Some(errors) = body.get("errors").and_then(|e| e.as_array()) {
        let message = errors
            .iter()
            .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; ");
        let message = if message.is_empty() {
            "unknown Data API error".to_string()
        } else {
            message
        };
        return Err(Error::vector_db(message));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    data: FindData,
}

#[derive(Debug, Deserialize)]
struct FindData {
    #[serde(default)]
    documents: Vec<AstraDocument>,
}

#[derive(Debug, Deserialize)]
struct AstraDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    chunk_index: Option<u32>,
    #[serde(rename = "$similarity", default)]
    similarity: Option<f32>,
}

/// Parse a `find` response body into scored chunks
fn parse_search_response(body: Value) -> Result<Vec<ScoredChunk>> {
    let response: FindResponse = serde_json::from_value(body)
        .map_err(|e| Error::vector_db(format!("unexpected find response: {e}")))?;

    let results = response
        .data
        .documents
        .into_iter()
        .map(|doc| {
            // A stored document keeps the same id across queries even when it
            // is not a UUID
            let id = Uuid::parse_str(&doc.id).unwrap_or_else(|_| {
                tracing::warn!("Document _id '{}' is not a UUID", doc.id);
                Uuid::nil()
            });
            let document_id = doc
                .document_id
                .as_deref()
                .and_then(|s| Uuid::parse_str(s).ok())
                .unwrap_or_else(Uuid::nil);

            ScoredChunk {
                chunk: DocumentChunk {
                    id,
                    document_id,
                    content: doc.content,
                    source: doc.source.unwrap_or_default(),
                    chunk_index: doc.chunk_index.unwrap_or(0),
                    embedding: Vec::new(),
                },
                similarity: doc.similarity.unwrap_or(0.0),
            }
        })
        .collect();

    Ok(results)
}
