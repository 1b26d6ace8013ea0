//! Chat server binary
//!
//! Run with: cargo run -p pdf-chat --bin pdf-chat-server

use pdf_chat::providers::{ChatProvider, VectorStore};
use pdf_chat::{config::ChatConfig, server::ChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                        PDF Chat                           ║
║       Ask questions about an ingested PDF document        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration; aborts here when required variables are missing,
    // before any external connection is attempted
    let config = ChatConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Keyspace: {}", config.astra.keyspace);
    tracing::info!("  - Collection: {}", config.astra.collection);
    tracing::info!("  - Chat model: {}", config.openai.chat_model);
    tracing::info!("  - Embedding model: {}", config.openai.embed_model);
    tracing::info!("  - Chunks per question: {}", config.retrieval.top_k);

    let server = ChatServer::new(config)?;

    // Non-fatal reachability checks; the first real request surfaces errors
    match server.state().store().health_check().await {
        Ok(true) => tracing::info!("Astra DB is reachable"),
        _ => tracing::warn!("Astra DB is not reachable; check the bundle and token"),
    }
    match server.state().openai().health_check().await {
        Ok(true) => tracing::info!("OpenAI API is reachable"),
        _ => tracing::warn!("OpenAI API is not reachable; check the API key"),
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  GET  /api/chat/start - Session greeting");
    println!("  POST /api/chat       - Ask a question");
    println!("  POST /api/ingest     - Ingest a PDF");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
