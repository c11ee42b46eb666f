//! Reqwest-backed [`StoryAi`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{AiError, StoryAi};

/// HTTP request timeout for a single AI call. The flow degrades to a
/// fallback message on failure, so a hung call must not stall the request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sub-question returned when the service responds without content.
const DEFAULT_SUB_QUESTION: &str = "Could you clarify your answer?";

/// Story text returned when the service responds without a story.
const DEFAULT_STORY: &str = "Story could not be generated.";

/// HTTP client for the story-AI service.
pub struct HttpStoryAi {
    client: reqwest::Client,
    base_url: String,
}

/// Response of the relevance-check endpoint.
#[derive(Debug, Deserialize)]
struct RelevancyResponse {
    status: String,
}

/// Response of the sub-question endpoint.
#[derive(Debug, Deserialize)]
struct SubQuestionResponse {
    #[serde(default)]
    content: Vec<String>,
}

/// Response of the story-generator endpoint.
#[derive(Debug, Deserialize)]
struct StoryResponse {
    refined_story: Option<String>,
}

impl HttpStoryAi {
    /// Create a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Execute a POST and deserialize the JSON response, mapping non-2xx
    /// statuses to [`AiError::Api`].
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AiError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl StoryAi for HttpStoryAi {
    async fn check_relevance(&self, question: &str, answer: &str) -> Result<bool, AiError> {
        let body = serde_json::json!({
            "C_Q": question,
            "C_Q_A": answer,
        });
        let response: RelevancyResponse = self.post_json("/CQ_relevancy_check/", &body).await?;
        Ok(response.status == "success")
    }

    async fn generate_sub_question(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<String, AiError> {
        let body = serde_json::json!({
            "M_Q": question,
            "M_Q_A": answer,
        });
        let response: SubQuestionResponse =
            self.post_json("/generate_sub_question/", &body).await?;
        Ok(response
            .content
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_SUB_QUESTION.to_string()))
    }

    async fn generate_story(
        &self,
        questions: &[String],
        answers: &[String],
    ) -> Result<String, AiError> {
        let body = serde_json::json!({
            "questions": questions,
            "answers": answers,
        });
        let response: StoryResponse = self.post_json("/story_generator/", &body).await?;
        Ok(response
            .refined_story
            .unwrap_or_else(|| DEFAULT_STORY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevancy_response_parses_status() {
        let parsed: RelevancyResponse =
            serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert_eq!(parsed.status, "success");
    }

    #[test]
    fn sub_question_response_defaults_to_empty_content() {
        let parsed: SubQuestionResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.content.is_empty());

        let parsed: SubQuestionResponse =
            serde_json::from_str(r#"{"content": ["Why?", "How?"]}"#).unwrap();
        assert_eq!(parsed.content[0], "Why?");
    }

    #[test]
    fn story_response_tolerates_missing_story() {
        let parsed: StoryResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.refined_story.is_none());

        let parsed: StoryResponse =
            serde_json::from_str(r#"{"refined_story": "Once upon a time."}"#).unwrap();
        assert_eq!(parsed.refined_story.as_deref(), Some("Once upon a time."));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HttpStoryAi::new("http://ai.example/".to_string());
        assert_eq!(client.base_url, "http://ai.example");
    }
}
