//! Run contexts: one execution of a named job, linked to its parent.
//!
//! A `RunContext` is either active or the no-op run. The no-op run answers
//! every call with an empty result and never performs I/O, so instrumented
//! code runs unchanged when no run is in progress.

use std::fmt::Display;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use openlineage_core::{
    Emittable, ErrorMessageFacet, EventType, ParentRunFacet, Result, RunEvent,
};
use tracing::warn;
use uuid::Uuid;

use crate::client::Client;
use crate::context::LineageContext;

/// Tag reported in the `programmingLanguage` field of error facets.
pub const LANGUAGE: &str = "rust";

/// Handle to a run. Clones refer to the same run.
#[derive(Clone, Default)]
pub struct RunContext {
    inner: Inner,
}

#[derive(Clone, Default)]
enum Inner {
    Active(Arc<ActiveRun>),
    #[default]
    Noop,
}

struct ActiveRun {
    run_id: Uuid,
    job_name: String,
    job_namespace: String,
    /// Set once by `record_error`, never cleared.
    has_failed: AtomicBool,
    parent: Option<RunContext>,
    client: Client,
}

impl RunContext {
    pub(crate) fn active(
        client: Client,
        run_id: Uuid,
        job_name: String,
        parent: Option<RunContext>,
    ) -> Self {
        Self {
            inner: Inner::Active(Arc::new(ActiveRun {
                run_id,
                job_name,
                job_namespace: client.namespace().to_owned(),
                has_failed: AtomicBool::new(false),
                parent,
                client,
            })),
        }
    }

    /// The inert run used when nothing is active.
    pub fn noop() -> Self {
        Self { inner: Inner::Noop }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.inner, Inner::Noop)
    }

    pub fn parent(&self) -> Option<&RunContext> {
        match &self.inner {
            Inner::Active(run) => run.parent.as_ref(),
            Inner::Noop => None,
        }
    }

    /// The run id; nil for the no-op run.
    pub fn run_id(&self) -> Uuid {
        match &self.inner {
            Inner::Active(run) => run.run_id,
            Inner::Noop => Uuid::nil(),
        }
    }

    pub fn job_name(&self) -> &str {
        match &self.inner {
            Inner::Active(run) => &run.job_name,
            Inner::Noop => "",
        }
    }

    pub fn job_namespace(&self) -> &str {
        match &self.inner {
            Inner::Active(run) => &run.job_namespace,
            Inner::Noop => "",
        }
    }

    pub fn has_failed(&self) -> bool {
        match &self.inner {
            Inner::Active(run) => run.has_failed.load(Ordering::Acquire),
            Inner::Noop => false,
        }
    }

    /// Start a child run of `job_name` whose parent is `self`, regardless of
    /// which run `ctx` currently carries.
    pub fn child(
        &self,
        ctx: &LineageContext,
        job_name: impl Into<String>,
    ) -> (LineageContext, RunContext) {
        match &self.inner {
            Inner::Active(run) => run
                .client
                .new_run_context(&ctx.with_run(self.clone()), job_name),
            Inner::Noop => (ctx.clone(), Self::noop()),
        }
    }

    /// Build an event for this run.
    ///
    /// The parent facet reflects the parent's identity at the time of the call.
    pub fn event(&self, event_type: EventType) -> RunEvent {
        match &self.inner {
            Inner::Active(run) => run.event(event_type),
            Inner::Noop => RunEvent::default(),
        }
    }

    /// Emit an arbitrary event through the owning client.
    pub async fn emit<E>(&self, ctx: &LineageContext, event: &E) -> Result<()>
    where
        E: Emittable + ?Sized,
    {
        match &self.inner {
            Inner::Active(run) => run.client.emit(ctx, event).await,
            Inner::Noop => Ok(()),
        }
    }

    /// Emit a START event for this run.
    pub async fn start(&self, ctx: &LineageContext) -> Result<()> {
        self.emit(ctx, &self.event(EventType::Start)).await
    }

    /// Mark the run as failed and emit an OTHER event carrying an
    /// `errorMessage` facet.
    ///
    /// The failure flag is set as soon as this is called; the returned future
    /// delivers the event on a background context, so cancellation of the
    /// caller's context does not drop it. Delivery failures are logged and
    /// swallowed. The stack trace is the caller's source location.
    #[track_caller]
    pub fn record_error(&self, err: &dyn Display) -> impl Future<Output = ()> + use<> {
        let location = Location::caller();
        let pending = match &self.inner {
            Inner::Active(run) => {
                run.has_failed.store(true, Ordering::Release);
                let facet = ErrorMessageFacet::new(err.to_string(), LANGUAGE)
                    .with_stack_trace(location.to_string());
                let event = run.event(EventType::Other).with_run_facet(facet);
                Some((Arc::clone(run), event))
            }
            Inner::Noop => None,
        };

        async move {
            if let Some((run, event)) = pending {
                run.deliver(event).await;
            }
        }
    }

    /// Emit COMPLETE, or FAIL if an error was recorded.
    ///
    /// Calling this more than once emits again each time. Delivery failures
    /// are logged and swallowed.
    pub async fn finish(&self) {
        if let Inner::Active(run) = &self.inner {
            let event_type = if run.has_failed.load(Ordering::Acquire) {
                EventType::Fail
            } else {
                EventType::Complete
            };
            run.deliver(run.event(event_type)).await;
        }
    }
}

impl ActiveRun {
    fn event(&self, event_type: EventType) -> RunEvent {
        let event = RunEvent::namespaced(
            event_type,
            self.run_id,
            self.job_name.clone(),
            self.job_namespace.clone(),
        );

        match &self.parent {
            Some(parent) => event.with_run_facet(ParentRunFacet::new(
                parent.job_name(),
                parent.job_namespace(),
                parent.run_id(),
            )),
            None => event,
        }
    }

    /// Best-effort delivery on a fresh background context.
    async fn deliver(&self, event: RunEvent) {
        let ctx = LineageContext::background();
        if let Err(e) = self.client.emit(&ctx, &event).await {
            warn!(
                run_id = %self.run_id,
                job = %self.job_name,
                event_type = %event.event_type,
                error = %e,
                "Dropping lifecycle event after delivery failure"
            );
        }
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Inner::Active(run) => f
                .debug_struct("RunContext")
                .field("run_id", &run.run_id)
                .field("job_name", &run.job_name)
                .field("job_namespace", &run.job_namespace)
                .field("has_failed", &run.has_failed.load(Ordering::Acquire))
                .field("parent", &run.parent.as_ref().map(RunContext::run_id))
                .finish(),
            Inner::Noop => f.write_str("RunContext::Noop"),
        }
    }
}
