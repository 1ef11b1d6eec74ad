//! Configuration for the provider, retry behavior and history

use std::path::{Path, PathBuf};
use std::time::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Environment variable consulted when the config carries no key
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

pub const DEFAULT_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Shown in place of credentials in Debug output
pub const REDACTED: &str = "<redacted>";

/// Provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig
{   /// API base URL
    pub api_base: String
  , /// Model name used in the generateContent path
    pub model: String
  , /// Static credential, sent as the `key` query parameter
    pub api_key: Option<String>
  , /// Per-attempt request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl Default for ProviderConfig
{   fn default() -> Self
    {   ProviderConfig
        {   api_base: DEFAULT_API_BASE.to_string()
          , model: DEFAULT_MODEL.to_string()
          , api_key: None
          , timeout_secs: Some(60)
        }
    }
}

impl std::fmt::Debug for ProviderConfig
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   f.debug_struct("ProviderConfig")
          .field("api_base", &self.api_base)
          .field("model", &self.model)
          .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
          .field("timeout_secs", &self.timeout_secs)
          .finish()
    }
}

impl ProviderConfig
{   pub fn timeout(&self) -> Option<Duration>
    {   self.timeout_secs.map(Duration::from_secs)
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig
{   /// Max retries after the first attempt
    pub max_retries: u32
  , /// Base of the exponential backoff in milliseconds
    pub initial_backoff_ms: u64
  , /// Upper bound for a single exponential backoff
    pub max_backoff_ms: u64
  , /// Fixed delay after a transport failure
    pub network_retry_delay_ms: u64
  , /// Overall budget for one request, in milliseconds
    pub max_elapsed_ms: Option<u64>
}

impl Default for RetryConfig
{   fn default() -> Self
    {   RetryConfig
        {   max_retries: 3
          , initial_backoff_ms: 1000
          , max_backoff_ms: 10_000
          , network_retry_delay_ms: 2000
          , max_elapsed_ms: None
        }
    }
}

/// History file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig
{   /// Where the JSON history lives; None disables history
    pub path: Option<PathBuf>
  , /// Entries kept, newest first
    pub limit: usize
}

impl Default for HistoryConfig
{   fn default() -> Self
    {   HistoryConfig
        {   path: None
          , limit: 50
        }
    }
}

/// storygen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig
{   /// Provider configuration
    pub provider: ProviderConfig
  , /// Retry configuration
    pub retry: RetryConfig
  , /// History configuration
    pub history: HistoryConfig
}

impl StoryConfig
{   /// Load configuration from a JSON file.
    /// Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let config: StoryConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.provider.api_base.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "provider.api_base is empty".to_string()
            ));
        }
        if self.provider.model.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "provider.model is empty".to_string()
            ));
        }
        if self.provider.timeout_secs == Some(0)
        {   return Err(crate::error::Error::InvalidConfiguration(
              "provider.timeout_secs must be positive".to_string()
            ));
        }
        if self.history.limit == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "history.limit must be positive".to_string()
            ));
        }
        Ok(())
    }

    /// Resolve the credential: config first, then environment
    pub fn resolve_api_key(&self)
      -> Result<String, crate::error::Error>
    {   if let Some(key) = self.provider.api_key.as_deref()
        {   let key = key.trim();
            if !key.is_empty()
            {   debug!("Using API key from config");
                return Ok(key.to_string());
            }
        }

        match std::env::var(API_KEY_ENV)
        {   Ok(key) if !key.trim().is_empty() => {
              debug!("Using API key from {}", API_KEY_ENV);
              Ok(key.trim().to_string())
            }
          , _ => {
              warn!("No API key in config or {}", API_KEY_ENV);
              Err(crate::error::Error::MissingApiKey(
                format!("set provider.api_key or {}", API_KEY_ENV)
              ))
            }
        }
    }
}
