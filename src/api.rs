//! Minimal Telegram Bot API client.
//!
//! Only two methods are used: `getme` to validate the bot token and
//! `sendmessage` to deliver a formatted record. Every response is read in
//! full and decoded as the uniform [`ApiResponse`] envelope, regardless of
//! HTTP status: Telegram reports failures as `{"ok": false, ...}` bodies.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, HookError, Result};
use crate::format::render_indented;

/// Public Telegram Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const GET_ME: &str = "getme";
const SEND_MESSAGE: &str = "sendmessage";

/// Body of a `sendmessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
}

impl SendMessage {
    /// An HTML-formatted message for `chat_id`.
    pub fn html(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: Some("HTML".to_string()),
        }
    }
}

/// Envelope returned by every Bot API method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Method-specific payload; never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ApiResponse {
    /// Turn an `ok: false` envelope into an [`ApiError`].
    ///
    /// With `with_envelope`, the error message also carries the envelope as
    /// tab-indented JSON.
    pub fn into_result(self, with_envelope: bool) -> Result<()> {
        if self.ok {
            return Ok(());
        }
        let envelope = if with_envelope {
            render_indented(&self).ok()
        } else {
            None
        };
        Err(HookError::Api(ApiError {
            code: self.error_code,
            description: self.description,
            envelope,
        }))
    }
}

/// HTTP client bound to one bot token.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_base: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client for `auth_token` against the API server at `api_url`.
    ///
    /// A zero `timeout` is treated as unset.
    pub fn new(
        client: reqwest::Client,
        api_url: &str,
        auth_token: &str,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            api_base: api_base(api_url, auth_token),
            timeout: timeout.filter(|t| !t.is_zero()),
        }
    }

    /// `{api_url}/bot{token}`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL for a Bot API method.
    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// Check the bot token with `getme`.
    ///
    /// Errors carry a dump of the response envelope to ease diagnosis.
    pub async fn probe(&self) -> Result<()> {
        let req = self.with_timeout(self.client.get(self.endpoint(GET_ME)));
        let res = req.send().await.map_err(|e| HookError::Transport(e.without_url()))?;
        let envelope = read_envelope(res).await?;
        envelope.into_result(true)
    }

    /// Post a message with `sendmessage`.
    pub async fn send(&self, message: &SendMessage) -> Result<()> {
        let req = self.with_timeout(self.client.post(self.endpoint(SEND_MESSAGE)).json(message));
        let res = match req.send().await {
            Ok(res) => res,
            Err(e) => {
                let e = e.without_url();
                warn!("Encountered error when issuing request to Telegram API, {}", e);
                return Err(HookError::Transport(e));
            }
        };
        let envelope = read_envelope(res).await?;
        envelope.into_result(false)
    }

    fn with_timeout(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(t) => req.timeout(t),
            None => req,
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `{api_url}/bot{token}`, without a doubled slash when `api_url` ends in one.
pub fn api_base(api_url: &str, auth_token: &str) -> String {
    format!("{}/bot{}", api_url.trim_end_matches('/'), auth_token)
}

/// Read the whole body, which hands the connection back to the pool, then decode it.
async fn read_envelope(res: reqwest::Response) -> Result<ApiResponse> {
    let body = res.bytes().await.map_err(|e| HookError::Transport(e.without_url()))?;
    Ok(serde_json::from_slice(&body)?)
}
