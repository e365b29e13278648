//! Log records as seen by a [`Hook`](crate::hook::Hook).
//!
//! A [`Record`] carries a severity [`Level`], a free-text message, and a map
//! of structured fields. Hooks only read records; the host owns them.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Log severity, from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Logged right before the process panics.
    Panic,
    /// Logged right before the process exits.
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            _ => Level::Trace,
        }
    }
}

/// One log event handed to a hook.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub message: String,
    /// Structured fields, kept sorted by key.
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a structured field, replacing any previous value for `key`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_from_most_severe() {
        assert!(Level::Panic < Level::Fatal);
        assert!(Level::Fatal < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn tracing_levels_map_one_to_one() {
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(tracing::Level::DEBUG), Level::Debug);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn with_field_collects_values() {
        let record = Record::new(Level::Error, "A walrus appears")
            .with_field("animal", "walrus")
            .with_field("number", 1)
            .with_field("size", 10);
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields["animal"], "walrus");
        assert_eq!(record.fields["number"], 1);
    }

    #[test]
    fn with_field_overwrites_duplicate_key() {
        let record = Record::new(Level::Error, "x")
            .with_field("k", 1)
            .with_field("k", 2);
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.fields["k"], 2);
    }

    #[test]
    fn level_display_is_lowercase() {
        assert_eq!(Level::Fatal.to_string(), "fatal");
    }
}
