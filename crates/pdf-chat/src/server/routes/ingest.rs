//! Ingest endpoint

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

use crate::error::Result;
use crate::ingestion;
use crate::server::state::AppState;

/// Request to ingest a PDF from the local filesystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Path to the PDF file
    pub path: PathBuf,
}

/// Response from document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Assigned document ID
    pub document_id: Uuid,
    /// Source filename
    pub filename: String,
    /// Number of chunks inserted
    pub chunks_inserted: usize,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// POST /api/ingest - parse, chunk, embed, and store one PDF
pub async fn ingest_document(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    let start = Instant::now();

    tracing::info!("Ingesting PDF: {}", request.path.display());

    let outcome = ingestion::ingest_pdf(
        &request.path,
        &state.config().chunking,
        state.openai(),
        state.store(),
    )
    .await?;

    Ok(Json(IngestResponse {
        document_id: outcome.document_id,
        filename: outcome.filename,
        chunks_inserted: outcome.chunks_inserted,
        ingested_at: Utc::now(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
