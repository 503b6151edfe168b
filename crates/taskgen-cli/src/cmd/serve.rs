use anyhow::Context;
use std::sync::Arc;
use taskgen_core::config::Config;
use taskgen_core::FileStore;
use taskgen_server::AppState;

pub fn run(
    config: &Config,
    api_key: Option<String>,
    port: Option<u16>,
    frontend_url: Option<String>,
) -> anyhow::Result<()> {
    let store = FileStore::open(&config.data_dir).with_context(|| {
        format!(
            "failed to initialise data directory {}",
            config.data_dir.display()
        )
    })?;
    tracing::info!(path = %store.path().display(), "spec store ready");

    let generator = super::build_generator(config, api_key)?;
    if !generator.client().has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; generation and the provider check will fail");
    }
    tracing::info!(model = %generator.client().model(), "generator ready");

    let state = AppState::new(Arc::new(store), generator);
    let port = port.unwrap_or(config.port);
    let frontend_url = frontend_url.or_else(|| config.frontend_url.clone());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(taskgen_server::serve(state, port, frontend_url.as_deref()))
}
