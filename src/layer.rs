//! [`tracing`] integration.
//!
//! [`TelegramLayer`] plays the logging-host role for applications that log
//! through `tracing`: every event whose level the wrapped [`Hook`] accepts is
//! turned into a [`Record`] and fired on the current tokio runtime.
//!
//! ```no_run
//! use std::sync::Arc;
//! use telegram_hook::{HookOptions, TelegramHook, TelegramLayer};
//! use tracing_subscriber::prelude::*;
//!
//! # async fn example() -> telegram_hook::error::Result<()> {
//! let hook = TelegramHook::new("billing", "123:abc", "-100", HookOptions::default()).await?;
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(TelegramLayer::new(Arc::new(hook)))
//!     .init();
//!
//! tracing::error!(invoice = 42, "payment provider unreachable");
//! # Ok(())
//! # }
//! ```
//!
//! `Layer::on_event` cannot report errors, so delivery always happens in a
//! detached task. Events emitted by this crate are never forwarded.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::hook::Hook;
use crate::record::{Level, Record};

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Forwards `tracing` events to a [`Hook`].
#[derive(Clone)]
pub struct TelegramLayer {
    hook: Arc<dyn Hook>,
}

impl TelegramLayer {
    pub fn new(hook: Arc<dyn Hook>) -> Self {
        Self { hook }
    }
}

impl<S: Subscriber> Layer<S> for TelegramLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }
        let level = Level::from(*metadata.level());
        if !self.hook.accepts(level) {
            return;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No tokio runtime; dropping {} record for Telegram", level);
                return;
            }
        };

        let record = record_from_event(level, event);
        let hook = self.hook.clone();
        handle.spawn(async move {
            let _ = hook.fire(&record).await;
        });
    }
}

impl fmt::Debug for TelegramLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramLayer")
            .field("levels", &self.hook.levels())
            .finish()
    }
}

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Build a record from an event's `message` and remaining fields.
pub fn record_from_event(level: Level, event: &Event<'_>) -> Record {
    let mut visitor = FieldVisitor {
        record: Record::new(level, String::new()),
    };
    event.record(&mut visitor);
    visitor.record
}

struct FieldVisitor {
    record: Record,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.record.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.record.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing_subscriber::prelude::*;

    /// Captures records built from events without any runtime involvement.
    struct Capture {
        records: Arc<Mutex<Vec<Record>>>,
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let record = record_from_event(Level::from(*event.metadata().level()), event);
            self.records.lock().unwrap().push(record);
        }
    }

    fn capture<F: FnOnce()>(f: F) -> Vec<Record> {
        let records = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Capture {
            records: records.clone(),
        });
        tracing::subscriber::with_default(subscriber, f);
        let out = records.lock().unwrap().clone();
        out
    }

    #[test]
    fn event_fields_become_record_fields() {
        let records = capture(|| {
            tracing::error!(animal = "walrus", number = 1, size = 10u64, "A walrus appears");
        });
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.level, Level::Error);
        assert_eq!(r.message, "A walrus appears");
        assert_eq!(r.fields["animal"], "walrus");
        assert_eq!(r.fields["number"], 1);
        assert_eq!(r.fields["size"], 10);
        assert!(!r.fields.contains_key("message"));
    }

    #[test]
    fn formatted_message_and_debug_fields() {
        let records = capture(|| {
            tracing::warn!(ok = true, ratio = 0.5, path = ?"/tmp", "retry {} of {}", 2, 3);
        });
        let r = &records[0];
        assert_eq!(r.level, Level::Warn);
        assert_eq!(r.message, "retry 2 of 3");
        assert_eq!(r.fields["ok"], true);
        assert_eq!(r.fields["ratio"], 0.5);
        assert_eq!(r.fields["path"], "\"/tmp\"");
    }

    #[test]
    fn own_target_detection() {
        assert!(is_own_target(OWN_TARGET));
        assert!(is_own_target(&format!("{}::api", OWN_TARGET)));
        assert!(!is_own_target(&format!("{}_extra", OWN_TARGET)));
        assert!(!is_own_target("my_app::billing"));
    }
}
