use std::fmt;

use thiserror::Error;

/// Unified error type for the telegram-hook library.
#[derive(Debug, Error)]
pub enum HookError {
    /// The HTTP request itself failed (connect, TLS, timeout, body read).
    #[error("Telegram API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not a valid Telegram API envelope.
    #[error("Invalid Telegram API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The Telegram API answered with `ok: false`.
    #[error("{0}")]
    Api(ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Environment variable not set: {0}")]
    ConfigEnvVar(String),
}

impl HookError {
    /// Whether this is a transport failure caused by the request deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HookError::Transport(e) if e.is_timeout())
    }
}

/// An `ok: false` answer from the Telegram Bot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Advisory `error_code` from the envelope.
    pub code: Option<i64>,
    /// Advisory `description` from the envelope.
    pub description: Option<String>,
    /// Pretty-printed envelope, attached by the credential probe only.
    pub envelope: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Received error response from Telegram API")?;
        if let Some(code) = self.code {
            write!(f, " (error code {})", code)?;
        }
        if let Some(ref desc) = self.description {
            write!(f, ": {}", desc)?;
        }
        if let Some(ref envelope) = self.envelope {
            write!(f, "\n{}", envelope)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

pub type Result<T> = std::result::Result<T, HookError>;
