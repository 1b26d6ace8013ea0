//! OpenAI client for embeddings and chat completions
//!
//! A single reqwest client serves both provider traits. Requests retry with
//! exponential backoff up to the configured limit.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use crate::providers::chat::ChatProvider;
use crate::providers::embedding::EmbeddingProvider;
use crate::types::chat::ChatMessage;

/// OpenAI API client with automatic retry
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("unknown error")))
    }

    /// Pull a useful message out of an OpenAI error body
    async fn response_error(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        format!("HTTP {status}: {detail}")
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let embeddings = self.embed_batch(&input).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("API returned no embeddings"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.config.base_url);
        let model = self.config.embed_model.clone();
        let input = texts.to_vec();
        let api_key = self.config.api_key.clone();
        let client = self.client.clone();

        self.retry_request(|| {
            let url = url.clone();
            let model = model.clone();
            let input = input.clone();
            let api_key = api_key.clone();
            let client = client.clone();

            async move {
                let request = EmbeddingRequest { model, input };

                let response = client
                    .post(&url)
                    .bearer_auth(&api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::embedding(format!("request failed: {e}")))?;

                if !response.status().is_success() {
                    return Err(Error::embedding(Self::response_error(response).await));
                }

                let mut body: EmbeddingResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::embedding(format!("invalid response: {e}")))?;

                // The API is free to reorder; restore input order
                body.data.sort_by_key(|d| d.index);
                Ok(body.data.into_iter().map(|d| d.embedding).collect())
            }
        })
        .await
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let model = self.config.chat_model.clone();
        let temperature = self.config.temperature;
        let messages = messages.to_vec();
        let api_key = self.config.api_key.clone();
        let client = self.client.clone();

        tracing::info!("Requesting chat completion with model: {}", model);

        self.retry_request(|| {
            let url = url.clone();
            let model = model.clone();
            let messages = messages.clone();
            let api_key = api_key.clone();
            let client = client.clone();

            async move {
                let request = CompletionRequest {
                    model,
                    messages,
                    temperature,
                };

                let response = client
                    .post(&url)
                    .bearer_auth(&api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("request failed: {e}")))?;

                if !response.status().is_success() {
                    return Err(Error::llm(Self::response_error(response).await));
                }

                let body: CompletionResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::llm(format!("invalid response: {e}")))?;

                body.choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .ok_or_else(|| Error::llm("API returned no choices"))
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);

        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.chat_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chat::ChatRole;

    #[test]
    fn completion_request_serializes_roles_lowercase() {
        let request = CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![
                ChatMessage::system("be helpful"),
                ChatMessage::assistant("supporting text"),
                ChatMessage::user("a question"),
            ],
            temperature: 0.0,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "assistant");
        assert_eq!(value["messages"][2]["role"], "user");
    }

    #[test]
    fn completion_response_parses_choice_content() {
        let body = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "the answer" } }
            ]
        }"#;

        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "the answer");
    }

    #[test]
    fn embedding_response_restores_input_order() {
        let body = r#"{
            "data": [
                { "embedding": [0.2], "index": 1 },
                { "embedding": [0.1], "index": 0 }
            ]
        }"#;

        let mut response: EmbeddingResponse = serde_json::from_str(body).unwrap();
        response.data.sort_by_key(|d| d.index);
        assert_eq!(response.data[0].embedding, vec![0.1]);
        assert_eq!(response.data[1].embedding, vec![0.2]);
    }
}
