use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat completion constrained to a single JSON object
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Content of the first choice, `None` when the model returned none
    async fn complete_json(&self, system: &str, user: &str) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str, // "json_object" for structured output
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";

    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(api_key: String) -> Self {
        Self::new(
            Self::DEFAULT_BASE_URL.to_string(),
            Self::DEFAULT_MODEL.to_string(),
            api_key,
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete_json(&self, system: &str, user: &str) -> Result<Option<String>> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            response_format: ResponseFormat { format_type: "json_object" },
        };

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send completion request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "Completion request rejected");
            anyhow::bail!("Completion request failed: {}", status);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        Ok(chat.choices.into_iter().next().and_then(|c| c.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_json_sends_json_object_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "be terse"},
                    {"role": "user", "content": "3 bed house"}
                ],
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"{\"bedrooms\":3}"}}]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(server.url(), "gpt-4o".to_string(), "sk-test".to_string());
        let content = client.complete_json("be terse", "3 bed house").await.unwrap();

        assert_eq!(content.as_deref(), Some(r#"{"bedrooms":3}"#));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_json_without_choices_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(server.url(), "gpt-4o".to_string(), "sk-test".to_string());
        assert!(client.complete_json("s", "u").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_json_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"rate limited"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(server.url(), "gpt-4o".to_string(), "sk-test".to_string());
        let err = client.complete_json("s", "u").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
