use taskgen_core::config::LlmConfig;
use taskgen_core::extract::{extract_breakdown, ExtractionError};
use taskgen_core::health::CheckResult;
use taskgen_core::prompt::build_prompt;
use taskgen_core::{FeatureRequest, GeneratedBreakdown};
use thiserror::Error;

use crate::wire::GenerationParams;
use crate::{GeminiClient, GeminiError};

/// Retry hint surfaced to callers when the provider throttles us.
pub const RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(String),

    #[error("rate limited by provider: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },

    #[error("provider error: {0}")]
    Provider(#[source] GeminiError),

    #[error("failed to generate: {0}")]
    Extraction(#[from] ExtractionError),
}

impl From<GeminiError> for GenerateError {
    fn from(err: GeminiError) -> Self {
        if err.is_rate_limited() {
            GenerateError::RateLimited {
                message: err.to_string(),
                retry_after_secs: RETRY_AFTER_SECS,
            }
        } else {
            GenerateError::Provider(err)
        }
    }
}

// ─── Generator ────────────────────────────────────────────────────────────

/// Turns a [`FeatureRequest`] into a [`GeneratedBreakdown`] with a single
/// provider call.
#[derive(Debug, Clone)]
pub struct Generator {
    client: GeminiClient,
    params: GenerationParams,
}

impl Generator {
    pub fn new(client: GeminiClient, llm: &LlmConfig) -> Self {
        Self {
            client,
            params: GenerationParams {
                temperature: llm.temperature,
                max_output_tokens: llm.max_output_tokens,
            },
        }
    }

    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    /// Validate, prompt, call the provider once, and extract the result.
    pub async fn generate(
        &self,
        request: &FeatureRequest,
    ) -> Result<GeneratedBreakdown, GenerateError> {
        request
            .validate()
            .map_err(|e| GenerateError::Validation(e.to_string()))?;

        let prompt = build_prompt(request);
        tracing::debug!(chars = prompt.len(), model = %self.client.model(), "sending prompt");

        let text = self
            .client
            .generate_content(&prompt, Some(self.params))
            .await
            .map_err(|e| {
                tracing::warn!("generation call failed: {e}");
                GenerateError::from(e)
            })?;
        tracing::debug!(chars = text.len(), "received model response");

        let breakdown = extract_breakdown(&text).map_err(|e| {
            tracing::warn!("could not extract breakdown: {e}");
            e
        })?;

        tracing::info!(
            stories = breakdown.user_stories.len(),
            tasks = breakdown.engineering_tasks.len(),
            risks = breakdown.risks.len(),
            "generated breakdown"
        );
        Ok(breakdown)
    }

    /// Provider reachability for the status endpoint.
    pub async fn check_health(&self) -> CheckResult {
        match self.client.ping().await {
            Ok(()) => CheckResult::healthy("Gemini API is accessible")
                .with_detail("model", self.client.model()),
            Err(e) => CheckResult::unhealthy(e.to_string()),
        }
    }
}
