//! Run facets: named, schema-extensible payloads attached to a run.
//!
//! Only the two facets the client synthesizes itself are modelled as types:
//! `parent` (linking a run to the run that spawned it) and `errorMessage`.
//! Everything else travels as a custom JSON payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::PRODUCER;

const PARENT_SCHEMA_URL: &str =
    "https://openlineage.io/spec/facets/1-0-1/ParentRunFacet.json#/$defs/ParentRunFacet";
const ERROR_MESSAGE_SCHEMA_URL: &str =
    "https://openlineage.io/spec/facets/1-0-1/ErrorMessageRunFacet.json#/$defs/ErrorMessageRunFacet";

/// Facet key for [`ParentRunFacet`].
pub const PARENT: &str = "parent";
/// Facet key for [`ErrorMessageFacet`].
pub const ERROR_MESSAGE: &str = "errorMessage";

/// Identity of the parent job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentJob {
    pub namespace: String,
    pub name: String,
}

/// Identity of the parent run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRun {
    pub run_id: Uuid,
}

/// Links a run to the run that spawned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRunFacet {
    #[serde(rename = "_producer")]
    pub producer: String,
    #[serde(rename = "_schemaURL")]
    pub schema_url: String,
    pub job: ParentJob,
    pub run: ParentRun,
}

impl ParentRunFacet {
    pub fn new(job_name: impl Into<String>, job_namespace: impl Into<String>, run_id: Uuid) -> Self {
        Self {
            producer: PRODUCER.into(),
            schema_url: PARENT_SCHEMA_URL.into(),
            job: ParentJob {
                namespace: job_namespace.into(),
                name: job_name.into(),
            },
            run: ParentRun { run_id },
        }
    }
}

/// Describes an error raised while the run was executing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessageFacet {
    #[serde(rename = "_producer")]
    pub producer: String,
    #[serde(rename = "_schemaURL")]
    pub schema_url: String,
    pub message: String,
    pub programming_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl ErrorMessageFacet {
    pub fn new(message: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            producer: PRODUCER.into(),
            schema_url: ERROR_MESSAGE_SCHEMA_URL.into(),
            message: message.into(),
            programming_language: language.into(),
            stack_trace: None,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}

/// A single facet ready to be attached to a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunFacet {
    Parent(ParentRunFacet),
    ErrorMessage(ErrorMessageFacet),
    /// Any other facet, carried as raw JSON under `name`.
    Custom {
        name: String,
        payload: serde_json::Value,
    },
}

impl RunFacet {
    pub fn custom(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Custom {
            name: name.into(),
            payload,
        }
    }

    /// The key this facet is stored under in `run.facets`.
    pub fn name(&self) -> &str {
        match self {
            Self::Parent(_) => PARENT,
            Self::ErrorMessage(_) => ERROR_MESSAGE,
            Self::Custom { name, .. } => name,
        }
    }
}

impl From<ParentRunFacet> for RunFacet {
    fn from(facet: ParentRunFacet) -> Self {
        Self::Parent(facet)
    }
}

impl From<ErrorMessageFacet> for RunFacet {
    fn from(facet: ErrorMessageFacet) -> Self {
        Self::ErrorMessage(facet)
    }
}

/// The `run.facets` mapping of a run event.
///
/// Each facet name appears at most once; inserting a facet replaces any
/// earlier facet stored under the same name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFacets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRunFacet>,

    #[serde(
        default,
        rename = "errorMessage",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<ErrorMessageFacet>,

    #[serde(flatten)]
    pub custom: serde_json::Map<String, serde_json::Value>,
}

impl RunFacets {
    pub fn insert(&mut self, facet: RunFacet) {
        match facet {
            RunFacet::Parent(parent) => {
                self.custom.remove(PARENT);
                self.parent = Some(parent);
            }
            RunFacet::ErrorMessage(error) => {
                self.custom.remove(ERROR_MESSAGE);
                self.error_message = Some(error);
            }
            RunFacet::Custom { name, payload } => {
                match name.as_str() {
                    PARENT => self.parent = None,
                    ERROR_MESSAGE => self.error_message = None,
                    _ => {}
                }
                self.custom.insert(name, payload);
            }
        }
    }

    /// Whether a facet is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        match name {
            PARENT if self.parent.is_some() => true,
            ERROR_MESSAGE if self.error_message.is_some() => true,
            _ => self.custom.contains_key(name),
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.parent.is_some())
            + usize::from(self.error_message.is_some())
            + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
