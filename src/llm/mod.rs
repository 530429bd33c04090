use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

pub use gemini::GeminiClient;

/// Model used for every chat request.
pub const CHAT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider is not configured")]
    Unavailable,

    #[error("LLM call failed: {0}")]
    CallFailed(String),

    #[error("LLM response malformed: {0}")]
    MalformedResponse(String),
}

/// A text-in, text-out generative model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
