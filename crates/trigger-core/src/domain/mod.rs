//! Domain model for build triggering.
//!
//! - `BuildRequest`: validated description of what to build
//! - `StreamRegistry`: release streams and their tracker metadata
//! - `IssueBatch`: tracking issues generated for one request
//! - `BuildTriggerEvent`: what the build system receives

pub mod build_request;
pub mod error;
pub mod event;
pub mod issue;
pub mod stream;

pub use build_request::{BuildRequest, BuildRequestFields};
pub use error::{
    PublishError, RegistryError, Result, TrackerError, TriggerError, UnknownStreamError,
    ValidationError,
};
pub use event::BuildTriggerEvent;
pub use issue::{IssueBatch, IssueDefaults, IssuePayload};
pub use stream::{StreamDefinition, StreamRegistry};
