//! Transport implementations for the OpenLineage client.
//!
//! All transports implement the `openlineage_core::Transport` trait.
//! [`build_from_config`] selects the correct one based on configuration.

pub mod console;
pub mod http;

pub use console::ConsoleTransport;
pub use http::HttpTransport;

use std::sync::Arc;

use openlineage_config::{TRANSPORT_CONSOLE, TRANSPORT_HTTP, TransportConfig};
use openlineage_core::{Error, Result, Transport};

/// Build the transport selected by `config.kind`.
///
/// An unknown kind or an unusable endpoint fails here rather than at the
/// first emission.
pub fn build_from_config(config: &TransportConfig) -> Result<Arc<dyn Transport>> {
    match config.kind.as_str() {
        TRANSPORT_CONSOLE => Ok(Arc::new(ConsoleTransport::new(
            config.console.pretty_print,
        ))),
        TRANSPORT_HTTP => {
            let transport = HttpTransport::new(&config.http.uri, config.http.api_key.clone())
                .map_err(|e| Error::config(format!("create transport: {e}")))?;
            Ok(Arc::new(transport))
        }
        other => Err(Error::config(format!(
            "create transport: unknown transport type: {other:?}"
        ))),
    }
}
