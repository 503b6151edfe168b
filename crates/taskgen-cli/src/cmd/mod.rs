pub mod generate;
pub mod serve;
pub mod specs;
pub mod status;

use anyhow::Context;
use taskgen_core::config::Config;
use taskgen_llm::{GeminiClient, Generator};

pub(crate) fn build_generator(config: &Config, api_key: Option<String>) -> anyhow::Result<Generator> {
    let client =
        GeminiClient::new(api_key, &config.llm).context("failed to build Gemini HTTP client")?;
    Ok(Generator::new(client, &config.llm))
}
