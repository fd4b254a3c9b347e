//! Console transport: one JSON document per event on standard output.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use openlineage_core::{EmitContext, Transport, TransportError};
use tracing::trace;

/// Writes each event as JSON followed by a newline.
pub struct ConsoleTransport {
    pretty_print: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleTransport {
    /// Console transport writing to stdout.
    pub fn new(pretty_print: bool) -> Self {
        Self::with_writer(pretty_print, Box::new(std::io::stdout()))
    }

    /// Console transport writing to an arbitrary sink.
    pub fn with_writer(pretty_print: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            pretty_print,
            out: Mutex::new(out),
        }
    }

    /// Render an event the way it will be printed (without the newline).
    pub fn render(&self, event: &serde_json::Value) -> Result<String, TransportError> {
        let body = if self.pretty_print {
            serde_json::to_string_pretty(event)?
        } else {
            serde_json::to_string(event)?
        };
        Ok(body)
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn emit(
        &self,
        _ctx: &EmitContext,
        event: &serde_json::Value,
    ) -> Result<(), TransportError> {
        let body = self.render(event)?;
        trace!(bytes = body.len(), "Writing event to console");

        let mut out = self
            .out
            .lock()
            .map_err(|_| TransportError::Write("console writer poisoned".into()))?;
        writeln!(out, "{body}").map_err(|e| TransportError::Write(e.to_string()))?;
        out.flush().map_err(|e| TransportError::Write(e.to_string()))
    }
}
