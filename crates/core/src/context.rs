//! Delivery limits carried alongside an emission.
//!
//! An `EmitContext` is the part of the propagated context a transport cares
//! about: an optional deadline and an optional cancellation token. Transports
//! run their in-flight I/O through [`EmitContext::scope`] so either limit
//! aborts the request.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

#[derive(Debug, Clone, Default)]
pub struct EmitContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl EmitContext {
    /// A context that never expires and cannot be cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            cancellation: self.cancellation.clone(),
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            deadline: self.deadline,
            cancellation: Some(token),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Whether the context has already been cancelled or run past its deadline.
    pub fn is_done(&self) -> bool {
        self.cancellation.as_ref().is_some_and(|t| t.is_cancelled())
            || self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Drive `fut` to completion unless the deadline passes or the context is
    /// cancelled first; in that case `fut` is dropped.
    pub async fn scope<F>(&self, fut: F) -> Result<F::Output, TransportError>
    where
        F: Future,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .map_err(|_| TransportError::DeadlineExceeded),
                None => Ok(fut.await),
            }
        };

        match &self.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(TransportError::Cancelled),
                out = bounded => out,
            },
            None => bounded.await,
        }
    }
}
