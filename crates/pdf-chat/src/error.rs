//! Error types for the chat service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for chat service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chat service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variables are not set
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    /// Secure connect bundle error
    #[error("Invalid secure connect bundle '{path}': {message}")]
    Bundle { path: String, message: String },

    /// PDF parsing error
    #[error("Failed to parse PDF '{filename}': {message}")]
    PdfParse { filename: String, message: String },

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorDb(String),

    /// Chat completion error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a bundle error
    pub fn bundle(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Bundle {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a PDF parse error
    pub fn pdf_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PdfParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::MissingEnv(_) => (StatusCode::BAD_REQUEST, "config_error", self.to_string()),
            Error::Bundle { .. } => (StatusCode::BAD_REQUEST, "bundle_error", self.to_string()),
            Error::PdfParse { .. } => (StatusCode::BAD_REQUEST, "parse_error", self.to_string()),
            Error::Embedding(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "embedding_error",
                msg.clone(),
            ),
            Error::VectorDb(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "vector_db_error",
                msg.clone(),
            ),
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
