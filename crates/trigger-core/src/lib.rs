//! Build Trigger Core Library
//!
//! Turns a build request into one tracking issue per release stream and a
//! build-trigger event for the downstream build system.
//!
//! ## Pipeline
//!
//! 1. `BuildRequest::validate` checks the raw fields.
//! 2. `UserResolver` maps the requester email to a tracker account (best effort).
//! 3. `IssueBatchBuilder` renders one issue per stream, all or nothing.
//! 4. `BuildTriggerDispatcher` submits the batch (production only) and
//!    publishes the build-trigger event.

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod fakes;
pub mod obs;
pub mod ports;
pub mod telemetry;
pub mod user_resolver;

pub use batch::IssueBatchBuilder;
pub use config::{ConfigError, ExecutionMode, TriggerConfig};
pub use dispatch::{BuildTriggerDispatcher, DispatchOutcome, IssueSubmission};
pub use domain::{
    BuildRequest, BuildRequestFields, BuildTriggerEvent, IssueBatch, IssueDefaults, IssuePayload,
    PublishError, RegistryError, Result, StreamDefinition, StreamRegistry, TrackerError,
    TriggerError, UnknownStreamError, ValidationError,
};
pub use ports::{BuildPublisher, IssueTracker, LogBuildPublisher, TrackerUser};
pub use telemetry::init_tracing;
pub use user_resolver::{UserResolver, UNKNOWN_IDENTITY};

/// Build Trigger version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
