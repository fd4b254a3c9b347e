//! The propagated context threaded through instrumented call graphs.

use std::time::Duration;

use openlineage_core::EmitContext;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::run::RunContext;

/// Immutable handle carrying the current run plus delivery limits.
///
/// Deriving a new context never mutates the original, so a context can be
/// cloned freely into spawned tasks.
#[derive(Debug, Clone, Default)]
pub struct LineageContext {
    run: Option<RunContext>,
    emit: EmitContext,
}

impl LineageContext {
    /// A context with no active run, no deadline, and no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context whose current run is `run`.
    pub fn with_run(&self, run: RunContext) -> Self {
        Self {
            run: (!run.is_noop()).then_some(run),
            emit: self.emit.clone(),
        }
    }

    /// The active run, if any.
    pub fn run(&self) -> Option<&RunContext> {
        self.run.as_ref()
    }

    /// The active run, or the no-op run when none is active.
    pub fn current_run(&self) -> RunContext {
        self.run.clone().unwrap_or_default()
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self {
            run: self.run.clone(),
            emit: self.emit.with_deadline(deadline),
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            run: self.run.clone(),
            emit: self.emit.with_timeout(timeout),
        }
    }

    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            run: self.run.clone(),
            emit: self.emit.with_cancellation(token),
        }
    }

    /// Delivery limits handed to the transport.
    pub fn emit_context(&self) -> &EmitContext {
        &self.emit
    }
}
