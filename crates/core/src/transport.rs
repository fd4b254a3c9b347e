//! Transport trait: the abstraction over event sinks.
//!
//! A Transport turns one serialized event into a side effect on an external
//! channel (stdout, an HTTP endpoint, ...). The client owns exactly one and
//! shares it read-only across every run it creates.

use async_trait::async_trait;
use serde::Serialize;

use crate::context::EmitContext;
use crate::error::TransportError;

/// The core Transport trait.
///
/// Implementations must be safe to call concurrently; the client never
/// serializes access.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name of the transport kind (e.g., "console", "http").
    fn name(&self) -> &str;

    /// Deliver one event, honoring the deadline and cancellation in `ctx`.
    async fn emit(
        &self,
        ctx: &EmitContext,
        event: &serde_json::Value,
    ) -> std::result::Result<(), TransportError>;
}

/// Anything convertible to a serializable event representation.
pub trait Emittable {
    fn to_event(&self) -> std::result::Result<serde_json::Value, serde_json::Error>;
}

impl<T: Serialize + ?Sized> Emittable for T {
    fn to_event(&self) -> std::result::Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventType, RunEvent};
    use std::collections::BTreeMap;

    #[test]
    fn run_event_is_emittable() {
        let event = RunEvent::new(EventType::Start, uuid::Uuid::new_v4(), "ingest");
        let value = event.to_event().unwrap();
        assert_eq!(value["eventType"], "START");
    }

    #[test]
    fn arbitrary_values_are_emittable() {
        let value = serde_json::json!({"a": 1}).to_event().unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn non_string_map_keys_fail_to_serialize() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "x");
        assert!(map.to_event().is_err());
    }
}
