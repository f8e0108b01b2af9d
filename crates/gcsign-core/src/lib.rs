//! Collaborator-facing building blocks for gcsign.
//!
//! This crate defines the boundary between the URL signing engine and the
//! gateway that embeds it: the error taxonomy reported back to callers, the
//! per-invocation variable store, configured property lookup, `{name}`
//! template resolution, and engine configuration.

pub mod config;
pub mod context;
pub mod error;
pub mod properties;
pub mod template;

pub use config::SignerConfig;
pub use context::{InMemoryContext, MessageContext};
pub use error::{SignError, SignErrorKind, SignResult};
pub use properties::{BoundProperties, Properties, PropertySource};
