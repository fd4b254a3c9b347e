//! Run-context propagation and lifecycle events for OpenLineage.
//!
//! A [`Client`] owns one transport and hands out [`RunContext`]s. Each run
//! context is one execution of a named job; children link back to their
//! parent, forming a tree. The current run travels through the call graph
//! inside a [`LineageContext`] that callers pass explicitly.
//!
//! ```no_run
//! use openlineage_client::{Client, LineageContext};
//! use openlineage_config::ClientConfig;
//! use openlineage_core::EventType;
//!
//! # async fn demo() -> openlineage_core::Result<()> {
//! let client = Client::new(&ClientConfig::default())?;
//! let (ctx, run) = client.new_run_context(&LineageContext::background(), "ingest");
//! run.emit(&ctx, &run.event(EventType::Start)).await?;
//!
//! let (_, child) = ctx.current_run().child(&ctx, "extract");
//! child.record_error(&"did not do work").await;
//! child.finish().await;
//!
//! run.finish().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod context;
pub mod run;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::Client;
pub use context::LineageContext;
pub use run::RunContext;
