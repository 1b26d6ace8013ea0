//! Fixed chat template for PDF question answering
//!
//! The template frames the model as a sales person answering a customer
//! question from supporting text. The retrieved chunks ride in an assistant
//! message, concatenated verbatim; the question rides in the user message.

use crate::types::chat::ChatMessage;
use crate::types::document::ScoredChunk;

/// Prompt builder for chat requests
pub struct ChatPromptBuilder;

impl ChatPromptBuilder {
    /// Concatenate retrieved chunk text verbatim, one chunk per line
    pub fn build_supporting_text(chunks: &[ScoredChunk]) -> String {
        let mut supporting_text = String::new();
        for result in chunks {
            supporting_text.push('\n');
            supporting_text.push_str(&result.chunk.content);
        }
        supporting_text
    }

    /// Assemble the full message list for a question
    pub fn build_messages(question: &str, supporting_text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You are a helpful sales person. You are helping a customer with a question. \
                 The customer asks you a question. You answer the question.",
            ),
            ChatMessage::system(
                "An assistant will provide you with some supporting text. \
                 You will have to answer the question based on the supporting text.",
            ),
            ChatMessage::system(
                "If the assistant does not provide you with relevant supporting text, \
                 you can ask the customer to rephrase the question.",
            ),
            ChatMessage::assistant(format!(
                "The following are some supporting text: {supporting_text}"
            )),
            ChatMessage::user(format!("Hi, I have a question. {question}")),
        ]
    }
}
