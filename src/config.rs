use crate::domain::catalog::Catalog;
use crate::error::{PaylinkError, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config/paylink";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and mode flags handed to the EBANX client.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewaySettings {
    pub integration_key: String,
    /// Talk to the EBANX sandbox instead of the live API.
    pub sandbox: bool,
    /// Report raw EBANX status codes instead of the generic retry message.
    pub debug: bool,
    /// Overrides the sandbox/live endpoint; used against mock servers.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl GatewaySettings {
    /// Requests cannot be signed without an integration key.
    pub fn validate(&self) -> Result<()> {
        if self.integration_key.trim().is_empty() {
            return Err(PaylinkError::ValidationError(
                "EBANX integration key is not configured".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            integration_key: String::new(),
            sandbox: true,
            debug: false,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub catalog: Catalog,
    /// Prepended to physical log table names, like a platform table prefix.
    pub table_prefix: String,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            catalog: Catalog::default(),
            table_prefix: String::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Layers configuration sources in this order:
    /// 1. Built-in defaults
    /// 2. `config/paylink.{toml,yaml,json}` or the file given as `path`, if present
    /// 3. Environment variables (`PAYLINK__GATEWAY__INTEGRATION_KEY`, ...)
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = path.unwrap_or(DEFAULT_CONFIG_FILE);
        let config = Config::builder()
            .add_source(File::with_name(file).required(path.is_some()))
            .add_source(Environment::with_prefix("PAYLINK").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
