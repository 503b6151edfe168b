//! `taskgen-llm`: Gemini REST driver and the breakdown generator built on it.
//!
//! ```text
//! FeatureRequest
//!     │  taskgen_core::prompt::build_prompt
//!     ▼
//! GeminiClient    ← POST {api_base}/models/{model}:generateContent
//!     │              one call, no retries
//!     ▼
//! raw text        ← taskgen_core::extract::extract_breakdown
//!     │
//!     ▼
//! GeneratedBreakdown | GenerateError
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use taskgen_core::{config::LlmConfig, FeatureRequest};
//! use taskgen_llm::{GeminiClient, Generator};
//!
//! let client = GeminiClient::new(std::env::var("GEMINI_API_KEY").ok(), &LlmConfig::default())?;
//! let generator = Generator::new(client, &LlmConfig::default());
//! let request = FeatureRequest::new("Let customers export invoices", "shop owners", None, None)?;
//! let breakdown = generator.generate(&request).await?;
//! ```

pub mod client;
pub mod error;
pub mod generator;
pub mod wire;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use generator::{GenerateError, Generator, RETRY_AFTER_SECS};
pub use wire::GenerationParams;

/// Convenience `Result` alias for provider calls.
pub type Result<T> = std::result::Result<T, GeminiError>;
