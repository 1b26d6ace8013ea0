//! Chat endpoints: session greeting and the message handler

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::generation::ChatPromptBuilder;
use crate::providers::{ChatProvider, EmbeddingProvider, VectorStore};
use crate::retrieval;
use crate::server::state::AppState;
use crate::types::chat::{ChatReply, ChatRequest, Greeting};

/// Static greeting sent at session start
const GREETING: &str = "Hello! Ask any question about the ingested PDF document.\n\n\
If nothing has been ingested yet, POST the file path to /api/ingest first.";

/// GET /api/chat/start - static session greeting
pub async fn chat_start() -> Json<Greeting> {
    Json(Greeting {
        message: GREETING.to_string(),
    })
}

/// POST /api/chat - answer one user message
pub async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let start = Instant::now();

    tracing::info!("Question: \"{}\"", request.message);

    let top_k = state.config().retrieval.top_k;
    let (answer, chunks_retrieved) = answer_message(
        state.openai(),
        state.store(),
        state.openai(),
        &request.message,
        top_k,
    )
    .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Answered in {}ms using {} chunks",
        processing_time_ms,
        chunks_retrieved
    );

    Ok(Json(ChatReply::new(
        answer,
        chunks_retrieved,
        processing_time_ms,
    )))
}

/// Core of the message handler: similarity search, prompt assembly, chat
/// completion. External calls are awaited sequentially.
pub(crate) async fn answer_message(
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    llm: &dyn ChatProvider,
    question: &str,
    top_k: usize,
) -> Result<(String, usize)> {
    let results = retrieval::similar_chunks(embedder, store, question, top_k).await?;

    // An empty result set is not an error: the template already tells the
    // model to ask the customer to rephrase
    let supporting_text = ChatPromptBuilder::build_supporting_text(&results);
    let messages = ChatPromptBuilder::build_messages(question, &supporting_text);

    let answer = llm.complete(&messages).await?;

    Ok((answer, results.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::chat::{ChatMessage, ChatRole};
    use crate::types::document::{DocumentChunk, ScoredChunk};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0; 3])
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FixedStore {
        contents: Vec<&'static str>,
    }

    #[async_trait]
    impl VectorStore for FixedStore {
        async fn ensure_collection(&self, _dimensions: usize) -> Result<()> {
            Ok(())
        }

        async fn insert_chunks(&self, _chunks: &[DocumentChunk]) -> Result<usize> {
            Ok(0)
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            top_k: usize,
        ) -> Result<Vec<ScoredChunk>> {
            Ok(self
                .contents
                .iter()
                .take(top_k)
                .map(|content| ScoredChunk {
                    chunk: DocumentChunk::new(Uuid::nil(), *content, "paper.pdf", 0),
                    similarity: 0.9,
                })
                .collect())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct CapturingLlm {
        seen_messages: Mutex<Vec<ChatMessage>>,
    }

    impl CapturingLlm {
        fn new() -> Self {
            Self {
                seen_messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for CapturingLlm {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            *self.seen_messages.lock().unwrap() = messages.to_vec();
            Ok("the model reply".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "capturing"
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl ChatProvider for FailingLlm {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
            Err(Error::llm("completion unavailable"))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    #[tokio::test]
    async fn forwards_all_retrieved_chunks_and_returns_raw_reply() {
        let store = FixedStore {
            contents: vec!["alpha chunk", "beta chunk", "gamma chunk"],
        };
        let llm = CapturingLlm::new();

        let (answer, retrieved) =
            answer_message(&FixedEmbedder, &store, &llm, "what is alpha?", 3)
                .await
                .unwrap();

        assert_eq!(answer, "the model reply");
        assert_eq!(retrieved, 3);

        let messages = llm.seen_messages.lock().unwrap();
        assert_eq!(messages.len(), 5);

        let assistant = messages
            .iter()
            .find(|m| m.role == ChatRole::Assistant)
            .unwrap();
        assert!(assistant.content.contains("alpha chunk"));
        assert!(assistant.content.contains("beta chunk"));
        assert!(assistant.content.contains("gamma chunk"));

        let user = messages.iter().find(|m| m.role == ChatRole::User).unwrap();
        assert!(user.content.contains("what is alpha?"));
    }

    #[tokio::test]
    async fn proceeds_with_empty_retrieval() {
        let store = FixedStore { contents: vec![] };
        let llm = CapturingLlm::new();

        let (answer, retrieved) = answer_message(&FixedEmbedder, &store, &llm, "anything", 3)
            .await
            .unwrap();

        assert_eq!(answer, "the model reply");
        assert_eq!(retrieved, 0);
    }

    #[tokio::test]
    async fn llm_failures_propagate() {
        let store = FixedStore {
            contents: vec!["a chunk"],
        };

        let err = answer_message(&FixedEmbedder, &store, &FailingLlm, "anything", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }
}
