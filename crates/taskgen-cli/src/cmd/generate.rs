use crate::output::print_json;
use anyhow::Context;
use taskgen_core::config::Config;
use taskgen_core::{FeatureRequest, FileStore, SpecStore};
use taskgen_llm::GenerateError;

/// Raw feature fields as typed on the command line.
pub struct Input {
    pub goal: String,
    pub users: String,
    pub constraints: Option<String>,
    pub template: Option<String>,
}

pub fn run(
    config: &Config,
    api_key: Option<String>,
    input: Input,
    save: bool,
    json: bool,
) -> anyhow::Result<()> {
    let feature = FeatureRequest::new(
        &input.goal,
        &input.users,
        input.constraints.as_deref(),
        input.template.as_deref(),
    )?;

    let generator = super::build_generator(config, api_key)?;
    let rt = tokio::runtime::Runtime::new()?;
    let generated = match rt.block_on(generator.generate(&feature)) {
        Ok(generated) => generated,
        Err(GenerateError::RateLimited {
            retry_after_secs, ..
        }) => {
            anyhow::bail!("Gemini rate limit reached; try again in about {retry_after_secs}s")
        }
        Err(e) => return Err(e.into()),
    };

    if !save {
        if json {
            print_json(&generated)?;
        } else {
            super::specs::print_breakdown(&generated);
        }
        return Ok(());
    }

    let store = FileStore::open(&config.data_dir).with_context(|| {
        format!(
            "failed to initialise data directory {}",
            config.data_dir.display()
        )
    })?;
    let spec = store.save(feature, generated)?;

    if json {
        print_json(&spec)?;
    } else {
        println!("Saved {}", spec.id);
        println!();
        super::specs::print_breakdown(&spec.generated);
    }
    Ok(())
}
