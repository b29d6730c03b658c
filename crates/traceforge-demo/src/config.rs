use config::builder::{ConfigBuilder, DefaultState};
use config::{Config as ConfigLoader, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use traceforge_llm::{ClientConfig, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub log_level: String,
    pub log_format: String,
}

impl DemoConfig {
    /// Load configuration from an optional file and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. built-in defaults
    /// 2. traceforge.toml (if present)
    /// 3. OPENAI_BASE_URL / OPENAI_API_KEY
    /// 4. TRACEFORGE_LOG_LEVEL / TRACEFORGE_LOG_FORMAT
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(
            Environment::with_prefix("OPENAI"),
            Environment::with_prefix("TRACEFORGE"),
        )
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLoader::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("log_level", "warn")?
            .set_default("log_format", "pretty")
    }

    fn load_with(openai: Environment, traceforge: Environment) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("traceforge").required(false))
            .add_source(openai)
            .add_source(traceforge)
            .build()?
            .try_deserialize()
    }

    /// Load config from TOML text on top of the defaults (useful for testing)
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Transport settings; the only thing handed below `main`
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}
