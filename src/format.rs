//! HTML message rendering for Telegram's `parse_mode = "HTML"`.
//!
//! A record becomes:
//!
//! ```text
//! <b>ERROR</b>@app - message
//! <pre>
//! {
//! 	"key": "value"
//! }
//! </pre>
//! ```
//!
//! The field block is tab-indented JSON with keys in sorted order. User text
//! (app name, message, field JSON) is HTML-escaped so Telegram's parser never
//! sees stray tags.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::record::{Level, Record};

/// Bold severity prefix; empty for levels the hook does not subscribe to.
pub fn level_prefix(level: Level) -> &'static str {
    match level {
        Level::Panic => "<b>PANIC</b>",
        Level::Fatal => "<b>FATAL</b>",
        Level::Error => "<b>ERROR</b>",
        _ => "",
    }
}

/// Render a record into the message body sent to Telegram.
pub fn format_message(app_name: &str, record: &Record) -> String {
    let mut msg = format!(
        "{}@{} - {}",
        level_prefix(record.level),
        escape_html(app_name),
        escape_html(&record.message)
    );
    if let Ok(fields) = render_fields(&record.fields) {
        msg.push_str("\n<pre>\n");
        msg.push_str(&escape_html(&fields));
        msg.push_str("\n</pre>");
    }
    msg
}

/// Serialize the field map as JSON indented with tabs.
pub fn render_fields(fields: &BTreeMap<String, Value>) -> serde_json::Result<String> {
    render_indented(fields)
}

pub(crate) fn render_indented<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}

/// Escape the three characters Telegram's HTML parser treats specially.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
