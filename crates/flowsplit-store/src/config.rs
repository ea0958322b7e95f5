#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Connection settings for the n8n REST API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StoreConfig {
  /// Base URL of the n8n instance, e.g. https://n8n.example.com
  #[cfg_attr(feature = "config", arg(long = "api-url", env = "N8N_API_URL", global = true))]
  #[serde(default)]
  pub base_url: Option<String>,

  /// API key sent as X-N8N-API-KEY.
  #[cfg_attr(
    feature = "config",
    arg(long = "api-key", env = "N8N_API_KEY", hide_env_values = true, global = true)
  )]
  #[serde(default)]
  pub api_key: Option<String>,
}

impl StoreConfig {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      base_url: Some(base_url.into()),
      api_key: Some(api_key.into()),
    }
  }

  /// Both the URL and the key are set and non-empty.
  pub fn is_configured(&self) -> bool {
    let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    set(&self.base_url) && set(&self.api_key)
  }
}
