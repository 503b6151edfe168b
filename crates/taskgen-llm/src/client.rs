use std::time::Duration;

use taskgen_core::config::LlmConfig;

use crate::wire::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationParams};
use crate::{GeminiError, Result};

/// Header carrying the API key. Keeping the key out of the URL keeps it out
/// of reqwest's error text as well.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// Thin async client for Gemini's `generateContent` REST endpoint.
///
/// One method call is exactly one HTTP request. Nothing is retried here;
/// callers decide what to do with a [`GeminiError`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client for the model and endpoint in `llm`.
    ///
    /// A missing API key is not an error here so the server can still start
    /// and report the problem through its health check; every request made
    /// without a key fails with [`GeminiError::MissingApiKey`].
    pub fn new(api_key: Option<String>, llm: &LlmConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = llm.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            api_base: llm.api_base.trim_end_matches('/').to_string(),
            model: llm.model.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Send `prompt` and return the first candidate's text.
    pub async fn generate_content(
        &self,
        prompt: &str,
        params: Option<GenerationParams>,
    ) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let body = GenerateContentRequest::new(prompt, params);

        let resp = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(api_error(
                status.as_u16(),
                &bytes,
                status.canonical_reason().unwrap_or("request failed"),
            ));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| GeminiError::Decode(e.to_string()))?;

        parsed.first_text().ok_or_else(|| {
            GeminiError::EmptyResponse(parsed.finish_reason().unwrap_or("none").to_string())
        })
    }

    /// Minimal round-trip used by the health check.
    pub async fn ping(&self) -> Result<()> {
        self.generate_content("Hello", None).await.map(|_| ())
    }
}

/// Decode the provider's error envelope, falling back to the HTTP reason
/// phrase when the body is not the expected shape.
fn api_error(status: u16, body: &[u8], reason: &str) -> GeminiError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => GeminiError::Api {
            status,
            provider_status: envelope.error.status,
            message: envelope.error.message.unwrap_or_else(|| reason.to_string()),
        },
        Err(_) => GeminiError::Api {
            status,
            provider_status: None,
            message: reason.to_string(),
        },
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
