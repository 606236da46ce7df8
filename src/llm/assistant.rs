use log::info;

use crate::answer::extract_answer;
use crate::corpus::PromptBundle;
use crate::error::Result;
use crate::llm::client::LlmClient;
use crate::llm::types::Sampling;

/// Sends composed prompts and returns only the user-facing answer.
pub struct InsightAssistant {
    client: LlmClient,
}

impl InsightAssistant {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Ask with the client's default sampling settings.
    pub async fn answer(&self, prompt: &PromptBundle) -> Result<String> {
        let raw = self.client.complete(&prompt.system, &prompt.user_message()).await?;
        Ok(extract_answer(&raw).to_string())
    }

    /// Ask with explicit sampling, e.g. [`Sampling::DETAILED`] for
    /// cross-fund summaries.
    pub async fn answer_with(&self, prompt: &PromptBundle, sampling: Sampling) -> Result<String> {
        info!("Asking {} with max_tokens {}", self.client.model(), sampling.max_tokens);
        let raw = self
            .client
            .complete_with(&prompt.system, &prompt.user_message(), sampling)
            .await?;
        Ok(extract_answer(&raw).to_string())
    }
}
