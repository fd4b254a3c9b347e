//! The lineage client: owns the transport and creates run contexts.

use std::sync::Arc;

use openlineage_config::ClientConfig;
use openlineage_core::{DEFAULT_NAMESPACE, Emittable, Result, Transport};
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::LineageContext;
use crate::run::RunContext;

/// Entry point for emitting lineage events.
///
/// Cheap to clone; clones share the same transport. Immutable after
/// construction.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    disabled: bool,
    transport: Option<Arc<dyn Transport>>,
    namespace: String,
}

impl Client {
    /// Build a client from configuration.
    ///
    /// A disabled client builds no transport at all, so even an invalid
    /// transport section is accepted.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.disabled {
            info!("Lineage client disabled, events will not be emitted");
            return Ok(Self::from_parts(true, None, &config.namespace));
        }

        let transport = openlineage_transport::build_from_config(&config.transport)?;
        info!(
            transport = transport.name(),
            namespace = %config.namespace,
            "Lineage client ready"
        );
        Ok(Self::from_parts(false, Some(transport), &config.namespace))
    }

    /// A client using an already-built transport.
    pub fn with_transport(transport: Arc<dyn Transport>, namespace: &str) -> Self {
        Self::from_parts(false, Some(transport), namespace)
    }

    /// A client that never emits anything.
    pub fn disabled() -> Self {
        Self::from_parts(true, None, DEFAULT_NAMESPACE)
    }

    pub(crate) fn from_parts(
        disabled: bool,
        transport: Option<Arc<dyn Transport>>,
        namespace: &str,
    ) -> Self {
        let namespace = if namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            namespace
        };

        Self {
            inner: Arc::new(ClientInner {
                disabled,
                transport,
                namespace: namespace.to_owned(),
            }),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled
    }

    /// Namespace stamped on every job created by this client.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Serialize `event` and hand it to the transport.
    ///
    /// Every event leaves the process through here. A disabled client returns
    /// before serializing.
    pub async fn emit<E>(&self, ctx: &LineageContext, event: &E) -> Result<()>
    where
        E: Emittable + ?Sized,
    {
        if self.inner.disabled {
            return Ok(());
        }
        let Some(transport) = self.inner.transport.as_ref() else {
            return Ok(());
        };

        let event = event.to_event()?;
        debug!(
            transport = transport.name(),
            event_type = event.get("eventType").and_then(|v| v.as_str()).unwrap_or(""),
            "Emitting lineage event"
        );
        transport.emit(ctx.emit_context(), &event).await?;
        Ok(())
    }

    /// Start a new run of `job_name` with a fresh run id.
    ///
    /// If `ctx` already carries a run, it becomes the parent of the new one.
    pub fn new_run_context(
        &self,
        ctx: &LineageContext,
        job_name: impl Into<String>,
    ) -> (LineageContext, RunContext) {
        self.attach(ctx, job_name.into(), Uuid::new_v4())
    }

    /// Continue a run whose id was assigned elsewhere (another process, a
    /// message consumer, ...).
    pub fn existing_run_context(
        &self,
        ctx: &LineageContext,
        job_name: impl Into<String>,
        run_id: Uuid,
    ) -> (LineageContext, RunContext) {
        self.attach(ctx, job_name.into(), run_id)
    }

    fn attach(
        &self,
        ctx: &LineageContext,
        job_name: String,
        run_id: Uuid,
    ) -> (LineageContext, RunContext) {
        let parent = ctx.run().cloned();
        let run = RunContext::active(self.clone(), run_id, job_name, parent);
        (ctx.with_run(run.clone()), run)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("disabled", &self.inner.disabled)
            .field(
                "transport",
                &self.inner.transport.as_ref().map(|t| t.name().to_owned()),
            )
            .field("namespace", &self.inner.namespace)
            .finish()
    }
}
