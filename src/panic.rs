//! Report panics through a [`Hook`].
//!
//! [`install`] chains a process panic hook that turns the panic into a
//! [`Level::Panic`] record and fires it on the panicking thread's tokio
//! runtime, if it has one. The previously installed panic hook still runs
//! afterwards, so default panic output is preserved.
//!
//! Delivery is best effort: a panic that unwinds out of `main` may end the
//! process before the request completes.

use std::any::Any;
use std::panic::Location;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::hook::Hook;
use crate::record::{Level, Record};

/// Install a panic hook that forwards panics to `hook`.
pub fn install(hook: Arc<dyn Hook>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if hook.accepts(Level::Panic) {
            if let Ok(handle) = Handle::try_current() {
                let record = panic_record(info.payload(), info.location());
                let hook = hook.clone();
                handle.spawn(async move {
                    let _ = hook.fire(&record).await;
                });
            }
        }
        previous(info);
    }));
}

/// Build the record describing a panic.
pub fn panic_record(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> Record {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    };

    let mut record = Record::new(Level::Panic, message);
    if let Some(location) = location {
        record = record
            .with_field("file", location.file())
            .with_field("line", location.line());
    }
    if let Some(name) = std::thread::current().name() {
        record = record.with_field("thread", name);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_payload_becomes_message() {
        let payload: Box<dyn Any + Send> = Box::new("index out of bounds");
        let record = panic_record(payload.as_ref(), None);
        assert_eq!(record.level, Level::Panic);
        assert_eq!(record.message, "index out of bounds");
        assert!(!record.fields.contains_key("file"));
    }

    #[test]
    fn string_payload_and_location() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("bad state: 3"));
        let here = Location::caller();
        let record = panic_record(payload.as_ref(), Some(here));
        assert_eq!(record.message, "bad state: 3");
        assert_eq!(record.fields["file"], here.file());
        assert_eq!(record.fields["line"], here.line());
    }

    #[test]
    fn opaque_payload_has_placeholder_message() {
        let payload: Box<dyn Any + Send> = Box::new(17u8);
        let record = panic_record(payload.as_ref(), None);
        assert_eq!(record.message, "Box<dyn Any>");
    }
}
