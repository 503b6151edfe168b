use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Transport timeout for a single provider call. Unset means the
    /// request waits as long as the connection stays open.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin. Any origin is allowed when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DATA_DIR)
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: default_port(),
            frontend_url: None,
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn specs_file(&self) -> PathBuf {
        paths::specs_file(&self.data_dir)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            warnings.push(ConfigWarning {
                field: "llm.temperature".into(),
                message: format!(
                    "temperature {} is outside the accepted range 0.0-2.0",
                    self.llm.temperature
                ),
            });
        }
        if self.llm.max_output_tokens == 0 {
            warnings.push(ConfigWarning {
                field: "llm.max_output_tokens".into(),
                message: "max_output_tokens is 0; the model cannot return anything".into(),
            });
        }
        if self.llm.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "llm.model".into(),
                message: "model name is empty".into(),
            });
        }
        if self.llm.request_timeout_secs == Some(0) {
            warnings.push(ConfigWarning {
                field: "llm.request_timeout_secs".into(),
                message: "a zero timeout fails every request".into(),
            });
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("taskgen.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 5000);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.max_output_tokens, 2048);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskgen.yaml");
        std::fs::write(&path, "port: 8080\nllm:\n  temperature: 0.2\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskgen.yaml");
        let mut config = Config::default();
        config.frontend_url = Some("http://localhost:3000".into());
        config.llm.request_timeout_secs = Some(30);
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskgen.yaml");
        std::fs::write(&path, "port: [not a number").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn validate_flags_out_of_range_values() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());
        config.llm.temperature = 3.5;
        config.llm.max_output_tokens = 0;
        let fields: Vec<String> = config.validate().into_iter().map(|w| w.field).collect();
        assert_eq!(fields, vec!["llm.temperature", "llm.max_output_tokens"]);
    }
}
