//! # telegram-hook
//!
//! **Forward error-level log records to a Telegram chat.**
//!
//! A [`TelegramHook`] is built once with a bot token, a chat ID and a short
//! application name. Construction calls the Bot API's `getme` method, so a bad
//! token fails at startup instead of at the first error. After that, every
//! error, fatal or panic record the logging host hands to [`Hook::fire`] is
//! rendered as an HTML message and posted with `sendmessage`.
//!
//! ## Architecture
//!
//! - **[`api`]** — Bot API client: credential probe, message send, response envelope
//! - **[`format`]** — HTML rendering of records
//! - **[`hook`]** — the [`Hook`] host contract and [`TelegramHook`]
//! - **[`config`]** — TOML configuration with environment variable substitution
//! - **[`layer`]** — `tracing_subscriber` layer acting as the logging host
//! - **[`panic`]** — panic hook reporting panics as [`Level::Panic`] records
//! - **[`record`]** — levels and records
//! - **[`error`]** — unified error types using `thiserror`
//!
//! ## Delivery modes
//!
//! By default `fire` waits for Telegram and returns any failure to the caller.
//! With [`HookOptions::with_async`], `fire` spawns the request and returns
//! immediately; failures are dropped.
//!
//! ```no_run
//! use std::time::Duration;
//! use telegram_hook::{Hook, HookOptions, Level, Record, TelegramHook};
//!
//! # async fn example() -> telegram_hook::error::Result<()> {
//! let hook = TelegramHook::new(
//!     "billing",
//!     "123456:ABC-DEF",
//!     "-1001234567890",
//!     HookOptions::default().with_timeout(Duration::from_secs(5)),
//! )
//! .await?;
//!
//! let record = Record::new(Level::Error, "payment provider unreachable")
//!     .with_field("invoice", 42);
//! hook.fire(&record).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod hook;
pub mod layer;
pub mod panic;
pub mod record;

pub use config::HookConfig;
pub use error::{ApiError, HookError};
pub use hook::{Hook, HookOptions, TelegramHook};
pub use layer::TelegramLayer;
pub use record::{Level, Record};
