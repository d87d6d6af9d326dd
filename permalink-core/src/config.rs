use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deflate::DEFAULT_LEVEL;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

fn default_code_param() -> String {
    "code".to_string()
}

fn default_canvas_param() -> String {
    "canvas".to_string()
}

fn default_canvas_aliases() -> Vec<String> {
    vec!["buffer".to_string()]
}

fn default_compression_level() -> u32 {
    DEFAULT_LEVEL
}

/// Which query parameters hold which piece of state, and how they are encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Parameter carrying the document text
    #[serde(default = "default_code_param")]
    pub code_param: String,
    /// Extra names the document text is read from when `code_param` is absent
    #[serde(default)]
    pub code_aliases: Vec<String>,
    /// Parameter carrying the canvas value
    #[serde(default = "default_canvas_param")]
    pub canvas_param: String,
    /// Extra names the canvas value is read from. Older links used `buffer`.
    #[serde(default = "default_canvas_aliases")]
    pub canvas_aliases: Vec<String>,
    /// Deflate level, 0 (store) to 9 (smallest)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    /// Strip parameters that fail to decode from the URL after loading
    #[serde(default)]
    pub clean_invalid_params: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            code_param: default_code_param(),
            code_aliases: Vec::new(),
            canvas_param: default_canvas_param(),
            canvas_aliases: default_canvas_aliases(),
            compression_level: default_compression_level(),
            clean_invalid_params: false,
        }
    }
}

impl SyncConfig {
    /// Parse and validate a YAML config. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > 9 {
            return Err(ConfigError::Config(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }

        let mut names = vec![self.code_param.as_str(), self.canvas_param.as_str()];
        names.extend(self.code_aliases.iter().map(String::as_str));
        names.extend(self.canvas_aliases.iter().map(String::as_str));

        if names.iter().any(|name| name.is_empty()) {
            return Err(ConfigError::Config(
                "parameter names must not be empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for name in names {
            if !seen.insert(name) {
                return Err(ConfigError::Config(format!(
                    "parameter name '{name}' is used more than once"
                )));
            }
        }

        Ok(())
    }
}
