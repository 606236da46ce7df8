use crate::config::LlmConfig;
use crate::error::{InsightError, Result};
use crate::llm::types::*;
use log::{debug, info};
use reqwest::Client;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Thin client for the Anthropic Messages API. Every call is a single
/// system prompt plus one user turn; nothing is retried.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    defaults: Sampling,
}

impl LlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            defaults: Sampling {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.complete_with(system, user, self.defaults).await
    }

    pub async fn complete_with(&self, system: &str, user: &str, sampling: Sampling) -> Result<String> {
        let url = format!("{}/messages", self.base_url);
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            system: (!system.is_empty()).then_some(system),
            messages: vec![Message::user(user)],
        };

        debug!(
            "Requesting completion from {} ({} prompt chars, max_tokens {})",
            self.model,
            system.len() + user.len(),
            sampling.max_tokens
        );

        let res = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(InsightError::Api(format!(
                "Anthropic API error (status {}): {}",
                status, err_text
            )));
        }

        let body: MessagesResponse = res.json().await?;
        if let Some(usage) = body.usage {
            info!(
                "Completion used {} input and {} output tokens",
                usage.input_tokens, usage.output_tokens
            );
        }

        body.content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| InsightError::Api("Model returned no text content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = LlmConfig::default();
        assert!(matches!(LlmClient::from_config(&config), Err(InsightError::Config(_))));
    }

    #[test]
    fn test_response_text_block() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"<answer>hi</answer>"}],"stop_reason":"end_turn",
                "usage":{"input_tokens":10,"output_tokens":3}}"#,
        )
        .unwrap();
        assert!(matches!(&body.content[0], ContentBlock::Text { text } if text == "<answer>hi</answer>"));
        assert_eq!(body.usage.unwrap().output_tokens, 3);
    }

    #[test]
    fn test_request_omits_empty_system() {
        let request = MessagesRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 10,
            temperature: 0.2,
            system: None,
            messages: vec![Message::user("hello")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
