//! The contract between a logging host and a hook.
//!
//! A host asks a hook which [`Level`]s it wants via [`Hook::levels`] and then
//! calls [`Hook::fire`] once per matching record. Hooks do not re-check the
//! level of records they receive.
//!
//! The only implementation here is [`telegram::TelegramHook`], which forwards
//! records to a Telegram chat either inline or as fire-and-forget tasks.

pub mod telegram;

use crate::error::Result;
use crate::record::{Level, Record};

pub use telegram::{HookOptions, TelegramHook};

/// A sink that a logging host dispatches records to.
///
/// Implementations must be `Send + Sync` for use across async tasks.
#[async_trait::async_trait]
pub trait Hook: Send + Sync {
    /// Levels this hook should receive. Must return the same set on every call.
    fn levels(&self) -> &'static [Level];

    /// Handle a single record.
    async fn fire(&self, record: &Record) -> Result<()>;

    /// Whether records at `level` should be dispatched to this hook.
    fn accepts(&self, level: Level) -> bool {
        self.levels().contains(&level)
    }
}
