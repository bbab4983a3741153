//! Render `tracing` events into concise logfmt strings.
//!
//! Extracts level, target, and message from `tracing::Event` records and
//! renders the remaining fields in `key=value` form. Individual fields are kept
//! alongside the rendered line so callers can inspect structured values.

use std::fmt::{Debug, Write};

use tracing::{
    Event, Metadata,
    field::{Field, Visit},
};

/// Rendered fields extracted from a tracing Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLog {
    /// Severity level (e.g., INFO, WARN) for the event.
    pub level: String,
    /// Event target (typically the module path).
    pub target: String,
    /// Human‑readable message, followed by any `key=value` pairs.
    pub message: String,
    /// Non-message fields in recording order.
    pub fields: Vec<(String, String)>,
}

impl RenderedLog {
    /// Look up a non-message field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Field collector used by [`render_event`].
struct MsgVisitor {
    /// Captured `message` field, if present.
    msg: Option<String>,
    /// Non‑message fields as (name, value) pairs.
    fields: Vec<(String, String)>,
}

impl Visit for MsgVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.msg = Some(value.to_string());
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.msg = Some(format!("{:?}", value));
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}

/// Extract level, target, and a logfmt line from a tracing Event.
///
/// The message comes first when present; remaining fields follow as
/// `key=value`. Values containing whitespace, `"` or `=` are quoted and
/// escaped in the rendered line but stored raw in [`RenderedLog::fields`].
pub fn render_event(event: &Event<'_>) -> RenderedLog {
    let meta: &Metadata<'_> = event.metadata();
    let mut vis = MsgVisitor {
        msg: None,
        fields: Vec::new(),
    };
    event.record(&mut vis);

    let mut line = vis.msg.unwrap_or_default();
    for (k, v) in &vis.fields {
        if !line.is_empty() {
            line.push(' ');
        }
        if v.contains(|c: char| c.is_whitespace() || c == '"' || c == '=') {
            let _ignored = write!(&mut line, "{}={:?}", k, v);
        } else {
            let _ignored = write!(&mut line, "{}={}", k, v);
        }
    }
    RenderedLog {
        level: meta.level().to_string(),
        target: meta.target().to_string(),
        message: line,
        fields: vis.fields,
    }
}
