use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Gemini API error ({status}): {message}")]
    Api {
        status: u16,
        /// Provider status string, e.g. `RESOURCE_EXHAUSTED`.
        provider_status: Option<String>,
        message: String,
    },

    /// Built through `From`, which drops the request URL from the error.
    #[error("request to Gemini failed: {0}")]
    Transport(reqwest::Error),

    #[error("invalid response body from Gemini: {0}")]
    Decode(String),

    #[error("Gemini returned no text (finish reason: {0})")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Transport(err.without_url())
    }
}

impl GeminiError {
    /// Whether the provider is throttling us.
    ///
    /// Structured signals win: an HTTP status or provider status decides on
    /// its own. Message heuristics apply only to transport failures that
    /// carry no status code at all.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GeminiError::Api {
                status,
                provider_status,
                ..
            } => *status == 429 || provider_status.as_deref() == Some("RESOURCE_EXHAUSTED"),
            GeminiError::Transport(e) => match e.status() {
                Some(status) => status.as_u16() == 429,
                None => mentions_rate_limit(&e.to_string()),
            },
            GeminiError::MissingApiKey | GeminiError::Decode(_) | GeminiError::EmptyResponse(_) => {
                false
            }
        }
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["429", "quota", "rate limit", "too many requests"]
        .iter()
        .any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, provider_status: Option<&str>, message: &str) -> GeminiError {
        GeminiError::Api {
            status,
            provider_status: provider_status.map(str::to_string),
            message: message.into(),
        }
    }

    #[test]
    fn status_429_is_rate_limited() {
        assert!(api(429, None, "slow down").is_rate_limited());
    }

    #[test]
    fn resource_exhausted_is_rate_limited() {
        assert!(api(400, Some("RESOURCE_EXHAUSTED"), "limit").is_rate_limited());
    }

    #[test]
    fn structured_status_overrides_message_text() {
        // A 400 whose message happens to mention quota is still a plain error.
        assert!(!api(400, Some("INVALID_ARGUMENT"), "quota project not set").is_rate_limited());
        assert!(!api(500, None, "internal").is_rate_limited());
    }

    #[test]
    fn message_heuristics() {
        assert!(mentions_rate_limit("You exceeded your current quota"));
        assert!(mentions_rate_limit("HTTP 429"));
        assert!(mentions_rate_limit("Rate limit reached"));
        assert!(!mentions_rate_limit("connection refused"));
    }

    #[test]
    fn local_failures_are_not_rate_limited() {
        assert!(!GeminiError::MissingApiKey.is_rate_limited());
        assert!(!GeminiError::EmptyResponse("SAFETY".into()).is_rate_limited());
    }
}
