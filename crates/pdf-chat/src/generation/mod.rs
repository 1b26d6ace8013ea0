//! Prompt assembly for chat completion

pub mod prompt;

pub use prompt::ChatPromptBuilder;
