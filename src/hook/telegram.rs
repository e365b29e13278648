use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::api::{ApiClient, DEFAULT_API_URL, SendMessage};
use crate::error::Result;
use crate::format::format_message;
use crate::hook::Hook;
use crate::record::{Level, Record};

const LEVELS: &[Level] = &[Level::Error, Level::Fatal, Level::Panic];

/// Optional settings for [`TelegramHook::new`].
#[derive(Debug, Clone)]
pub struct HookOptions {
    /// Return from `fire` before delivery completes and drop delivery errors.
    pub async_mode: bool,
    /// Deadline for each HTTP request. Zero means no deadline.
    pub request_timeout: Option<Duration>,
    /// HTTP client to use instead of a fresh one.
    pub http_client: Option<reqwest::Client>,
    /// Root of the Bot API server.
    pub api_url: String,
}

impl Default for HookOptions {
    fn default() -> Self {
        Self {
            async_mode: false,
            request_timeout: None,
            http_client: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl HookOptions {
    pub fn with_async(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    /// Ignored unless `timeout` is non-zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.request_timeout = Some(timeout);
        }
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Forwards error, fatal and panic records to a Telegram chat.
///
/// Construction validates the bot token against the API, so an existing
/// `TelegramHook` always holds a token that was accepted at startup. The hook
/// is read-only afterwards and can be shared freely behind an `Arc`.
///
/// Delivery failures are reported through `tracing` ("Unable to send
/// message, ..."), so the host needs a subscriber installed to see them.
#[derive(Clone)]
pub struct TelegramHook {
    app_name: String,
    target_id: String,
    async_mode: bool,
    api: Arc<ApiClient>,
}

impl TelegramHook {
    /// Build a hook and verify `auth_token` with a `getme` call.
    ///
    /// Fails with the probe's error if the token is rejected or the API is
    /// unreachable; no hook is returned in that case.
    pub async fn new(
        app_name: impl Into<String>,
        auth_token: impl AsRef<str>,
        target_id: impl Into<String>,
        options: HookOptions,
    ) -> Result<Self> {
        let client = options.http_client.unwrap_or_default();
        let api = ApiClient::new(
            client,
            &options.api_url,
            auth_token.as_ref(),
            options.request_timeout,
        );
        let hook = Self {
            app_name: app_name.into(),
            target_id: target_id.into(),
            async_mode: options.async_mode,
            api: Arc::new(api),
        };

        hook.api.probe().await?;
        debug!(
            "Telegram hook ready for app '{}' (async: {})",
            hook.app_name, hook.async_mode
        );
        Ok(hook)
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn is_async(&self) -> bool {
        self.async_mode
    }

    /// The underlying API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The payload `fire` would send for `record`.
    pub fn message_for(&self, record: &Record) -> SendMessage {
        SendMessage::html(self.target_id.clone(), format_message(&self.app_name, record))
    }
}

#[async_trait::async_trait]
impl Hook for TelegramHook {
    fn levels(&self) -> &'static [Level] {
        LEVELS
    }

    async fn fire(&self, record: &Record) -> Result<()> {
        let message = self.message_for(record);

        if self.async_mode {
            let api = self.api.clone();
            debug!("Dispatching {} record to Telegram in background", record.level);
            tokio::spawn(async move {
                let _ = api.send(&message).await;
            });
            return Ok(());
        }

        if let Err(e) = self.api.send(&message).await {
            error!("Unable to send message, {}", e);
            return Err(e);
        }
        Ok(())
    }
}

impl fmt::Debug for TelegramHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramHook")
            .field("app_name", &self.app_name)
            .field("target_id", &self.target_id)
            .field("async_mode", &self.async_mode)
            .field("api", &self.api)
            .finish()
    }
}
