//! HTTP client for the external story-AI service.
//!
//! The conversational book flow needs three capabilities: classify whether
//! an answer is relevant to its question, generate a clarifying sub-question
//! when it is not, and assemble a full story from the recorded Q&A pairs.
//! All three sit behind the [`StoryAi`] trait so handlers can be tested with
//! an in-process fake instead of a live service.

pub mod client;

pub use client::HttpStoryAi;

use async_trait::async_trait;

/// Errors from the story-AI service layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Story AI error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// The story-AI capabilities consumed by the conversational flow.
#[async_trait]
pub trait StoryAi: Send + Sync {
    /// Classify whether `answer` is a relevant response to `question`.
    async fn check_relevance(&self, question: &str, answer: &str) -> Result<bool, AiError>;

    /// Generate a clarifying sub-question for an off-topic answer.
    async fn generate_sub_question(&self, question: &str, answer: &str)
        -> Result<String, AiError>;

    /// Assemble a narrative from parallel question/answer lists.
    async fn generate_story(
        &self,
        questions: &[String],
        answers: &[String],
    ) -> Result<String, AiError>;
}
