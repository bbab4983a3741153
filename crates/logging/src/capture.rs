//! In-memory capture of tracing events.
//!
//! [`CaptureLayer`] renders every event it sees with [`fmt::render_event`] and
//! appends it to a shared buffer. Install it with
//! `tracing::subscriber::with_default` to assert on emitted logs.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::fmt::{self, RenderedLog};

/// Shared handle to captured events.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    /// Events in emission order.
    events: Arc<Mutex<Vec<RenderedLog>>>,
}

impl Captured {
    /// Snapshot of all events captured so far.
    pub fn events(&self) -> Vec<RenderedLog> {
        self.events.lock().clone()
    }

    /// Captured events whose message starts with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<RenderedLog> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.message.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// Tracing layer that records rendered events into a [`Captured`] buffer.
pub struct CaptureLayer {
    /// Destination buffer.
    sink: Captured,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let r = fmt::render_event(event);
        self.sink.events.lock().push(r);
    }
}

/// Create a capture layer and the handle used to read what it records.
pub fn layer() -> (CaptureLayer, Captured) {
    let sink = Captured::default();
    (CaptureLayer { sink: sink.clone() }, sink)
}
