//! # OpenLineage Core
//!
//! Domain types, traits, and error definitions for the OpenLineage Rust client.
//! This crate has **no I/O of its own**: it defines the event model and the
//! delivery abstraction that the transport and client crates implement against.
//!
//! Transports implement [`Transport`] in `openlineage-transport`; anything
//! serializable can be emitted through [`Emittable`].

pub mod context;
pub mod error;
pub mod event;
pub mod facet;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use context::EmitContext;
pub use error::{Error, Result, TransportError};
pub use event::{EventType, Job, Run, RunEvent, DEFAULT_NAMESPACE, PRODUCER};
pub use facet::{ErrorMessageFacet, ParentRunFacet, RunFacet, RunFacets};
pub use transport::{Emittable, Transport};
