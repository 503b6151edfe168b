use anyhow::Context;
use std::path::{Path, PathBuf};
use taskgen_core::config::Config;
use taskgen_core::paths;

/// Resolve the effective configuration.
///
/// Priority:
/// 1. `--config` flag / `TASKGEN_CONFIG` env var (passed in as `explicit`)
/// 2. `taskgen.yaml` in the current directory
/// 3. Built-in defaults when neither file exists
///
/// `--data-dir` / `TASKGEN_DATA_DIR` overrides whatever the file says.
pub fn resolve(explicit: Option<&Path>, data_dir: Option<&Path>) -> anyhow::Result<Config> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(paths::CONFIG_FILE));

    let mut config = Config::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }

    for w in config.validate() {
        tracing::warn!(field = %w.field, "{}", w.message);
    }

    Ok(config)
}
