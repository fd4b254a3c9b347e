//! Shared test doubles.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openlineage_core::{EmitContext, Transport, TransportError};

use crate::client::Client;

struct Delivery {
    event: serde_json::Value,
    ctx_done: bool,
    has_deadline: bool,
}

/// A transport that records every event it is asked to deliver.
#[derive(Default)]
pub struct RecordingTransport {
    deliveries: Mutex<Vec<Delivery>>,
    fail: bool,
}

impl RecordingTransport {
    /// Records events but reports every delivery as failed.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<serde_json::Value> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.event.clone())
            .collect()
    }

    /// For each delivery, whether its context was already done.
    pub fn contexts(&self) -> Vec<bool> {
        self.deliveries.lock().unwrap().iter().map(|d| d.ctx_done).collect()
    }

    /// For each delivery, whether its context carried a deadline.
    pub fn deadlines(&self) -> Vec<bool> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.has_deadline)
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn emit(
        &self,
        ctx: &EmitContext,
        event: &serde_json::Value,
    ) -> Result<(), TransportError> {
        self.deliveries.lock().unwrap().push(Delivery {
            event: event.clone(),
            ctx_done: ctx.is_done(),
            has_deadline: ctx.deadline().is_some(),
        });

        if self.fail {
            return Err(TransportError::Status {
                status_code: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }
}

/// A client in namespace "ns" backed by a fresh recording transport.
pub fn recording_client() -> (Client, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(transport.clone(), "ns");
    (client, transport)
}
