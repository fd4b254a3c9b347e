//! Run events: one point-in-time occurrence in the life of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facet::{RunFacet, RunFacets};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// URI identifying this client as the producer of events and facets.
pub const PRODUCER: &str = concat!(
    "https://github.com/OpenLineage/OpenLineage/tree/",
    env!("CARGO_PKG_VERSION"),
    "/client/rust"
);

const RUN_EVENT_SCHEMA_URL: &str = "https://openlineage.io/spec/2-0-2/OpenLineage.json#/$defs/RunEvent";

/// The lifecycle transition an event reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Start,
    Running,
    Complete,
    Fail,
    Abort,
    #[default]
    Other,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "START"),
            Self::Running => write!(f, "RUNNING"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Fail => write!(f, "FAIL"),
            Self::Abort => write!(f, "ABORT"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "START" => Ok(Self::Start),
            "RUNNING" => Ok(Self::Running),
            "COMPLETE" => Ok(Self::Complete),
            "FAIL" => Ok(Self::Fail),
            "ABORT" => Ok(Self::Abort),
            "OTHER" => Ok(Self::Other),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

/// The `run` section of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub run_id: Uuid,

    #[serde(default, skip_serializing_if = "RunFacets::is_empty")]
    pub facets: RunFacets,
}

/// The `job` section of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub namespace: String,
    pub name: String,
}

/// A lineage event describing one transition of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEvent {
    pub event_type: EventType,
    pub event_time: DateTime<Utc>,
    pub run: Run,
    pub job: Job,
    pub producer: String,
    #[serde(rename = "schemaURL")]
    pub schema_url: String,
}

impl RunEvent {
    /// Build an event in the default namespace.
    pub fn new(event_type: EventType, run_id: Uuid, job_name: impl Into<String>) -> Self {
        Self::namespaced(event_type, run_id, job_name, DEFAULT_NAMESPACE)
    }

    /// Build an event stamped with the given run identity.
    pub fn namespaced(
        event_type: EventType,
        run_id: Uuid,
        job_name: impl Into<String>,
        job_namespace: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            event_time: Utc::now(),
            run: Run {
                run_id,
                facets: RunFacets::default(),
            },
            job: Job {
                namespace: job_namespace.into(),
                name: job_name.into(),
            },
            producer: PRODUCER.into(),
            schema_url: RUN_EVENT_SCHEMA_URL.into(),
        }
    }

    /// Attach a single run facet.
    pub fn with_run_facet(mut self, facet: impl Into<RunFacet>) -> Self {
        self.run.facets.insert(facet.into());
        self
    }

    /// Attach several run facets, in order.
    pub fn with_run_facets<I>(mut self, facets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RunFacet>,
    {
        for facet in facets {
            self.run.facets.insert(facet.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{ErrorMessageFacet, ParentRunFacet};

    #[test]
    fn new_uses_default_namespace() {
        let event = RunEvent::new(EventType::Start, Uuid::new_v4(), "ingest");
        assert_eq!(event.job.namespace, DEFAULT_NAMESPACE);
        assert_eq!(event.job.name, "ingest");
        assert!(event.run.facets.is_empty());
    }

    #[test]
    fn wire_shape_matches_run_event_schema() {
        let run_id = Uuid::new_v4();
        let event = RunEvent::namespaced(EventType::Complete, run_id, "ingest", "warehouse");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "COMPLETE");
        assert_eq!(json["run"]["runId"], run_id.to_string());
        assert_eq!(json["job"]["name"], "ingest");
        assert_eq!(json["job"]["namespace"], "warehouse");
        assert!(json["eventTime"].is_string());
        assert!(json["schemaURL"].as_str().unwrap().contains("RunEvent"));
        // Empty facet maps are left off the wire
        assert!(json["run"].get("facets").is_none());
    }

    #[test]
    fn facets_attach_under_run() {
        let parent_id = Uuid::new_v4();
        let event = RunEvent::new(EventType::Other, Uuid::new_v4(), "extract").with_run_facets([
            RunFacet::from(ParentRunFacet::new("ingest", "default", parent_id)),
            RunFacet::from(ErrorMessageFacet::new("boom", "rust")),
        ]);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["run"]["facets"]["parent"]["job"]["name"], "ingest");
        assert_eq!(json["run"]["facets"]["parent"]["run"]["runId"], parent_id.to_string());
        assert_eq!(json["run"]["facets"]["errorMessage"]["message"], "boom");
    }

    #[test]
    fn event_type_parsing() {
        assert_eq!("start".parse::<EventType>().unwrap(), EventType::Start);
        assert_eq!("FAIL".parse::<EventType>().unwrap(), EventType::Fail);
        assert!("finished".parse::<EventType>().is_err());
        assert_eq!(EventType::Running.to_string(), "RUNNING");
    }

    #[test]
    fn empty_event_has_nil_identity() {
        let event = RunEvent::default();
        assert!(event.run.run_id.is_nil());
        assert!(event.job.name.is_empty());
        assert!(event.job.namespace.is_empty());
    }
}
