//! TOML configuration for a [`TelegramHook`].
//!
//! # Example `telegram-hook.toml`
//!
//! ```toml
//! app_name = "billing"
//! auth_token = "${TELEGRAM_TOKEN}"
//! target_id = "-1001234567890"
//! async_mode = true
//! request_timeout_ms = 5000
//! ```

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_URL;
use crate::error::{HookError, Result};
use crate::hook::{HookOptions, TelegramHook};

// Matches ${VAR_NAME}, or $VAR_NAME (uppercase only to avoid false positives)
static RE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Z_][A-Z0-9_]*)").unwrap()
});

/// Settings needed to build a [`TelegramHook`].
#[derive(Clone, Deserialize, Serialize)]
pub struct HookConfig {
    /// Label shown after the severity in every message.
    #[serde(default)]
    pub app_name: String,
    /// Bot API token from @BotFather.
    pub auth_token: String,
    /// Target chat or channel ID.
    pub target_id: String,
    /// Deliver in the background and ignore failures.
    #[serde(default)]
    pub async_mode: bool,
    /// Per-request HTTP deadline in milliseconds.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Bot API server root.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl HookConfig {
    /// Load and parse the configuration from a TOML file at the given path.
    ///
    /// `${VAR}` and `$VAR` placeholders are replaced with environment
    /// variable values before parsing. An error is returned if a referenced
    /// variable is not set.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&substitute_env_vars(&content)?)
    }

    /// Parse TOML text as-is.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn options(&self) -> HookOptions {
        let mut options = HookOptions::default()
            .with_async(self.async_mode)
            .with_api_url(self.api_url.clone());
        if let Some(timeout) = self.request_timeout() {
            options = options.with_timeout(timeout);
        }
        options
    }

    /// Build and validate the hook this configuration describes.
    pub async fn build(&self) -> Result<TelegramHook> {
        TelegramHook::new(
            self.app_name.clone(),
            &self.auth_token,
            self.target_id.clone(),
            self.options(),
        )
        .await
    }
}

impl fmt::Debug for HookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookConfig")
            .field("app_name", &self.app_name)
            .field("auth_token", &"<redacted>")
            .field("target_id", &self.target_id)
            .field("async_mode", &self.async_mode)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Replace `${VAR_NAME}` and `$VAR_NAME` placeholders with environment variable values.
///
/// Substituted values are inserted verbatim and never expanded again.
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing: Option<String> = None;
    let result = RE_VAR.replace_all(input, |cap: &Captures<'_>| {
        let var_name = cap
            .get(1)
            .or_else(|| cap.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match std::env::var(var_name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var_name) => Err(HookError::ConfigEnvVar(var_name)),
        None => Ok(result.into_owned()),
    }
}
