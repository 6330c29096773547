//! Outbound collaborators of the trigger pipeline.
//!
//! - `IssueTracker`: user lookup and bulk issue creation
//! - `BuildPublisher`: hands a build-trigger event to the build system
//!
//! Both traits are async and transport-agnostic. In-memory fakes live in
//! the `fakes` module; HTTP adapters live in the `trigger-http` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BuildTriggerEvent, IssueBatch, PublishError, TrackerError};

/// A user account known to the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerUser {
    /// Account name used for assignment and `[~name]` mentions.
    pub name: String,
}

/// Issue tracker operations used by the pipeline.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Look up a user by account key.
    ///
    /// Returns `Ok(None)` when no such user exists.
    async fn lookup_user(&self, key: &str) -> Result<Option<TrackerUser>, TrackerError>;

    /// Create every issue in the batch in a single request.
    async fn create_issues(&self, batch: &IssueBatch) -> Result<(), TrackerError>;
}

/// Delivery of build-trigger events to the build system.
#[async_trait]
pub trait BuildPublisher: Send + Sync {
    async fn publish(&self, event: &BuildTriggerEvent) -> Result<(), PublishError>;
}

/// Publisher that only logs the event.
///
/// Used when no build system endpoint is configured, e.g. in local runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBuildPublisher;

#[async_trait]
impl BuildPublisher for LogBuildPublisher {
    async fn publish(&self, event: &BuildTriggerEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event).map_err(|e| PublishError::Encode(e.to_string()))?;
        tracing::info!(
            event_id = %event.event_id,
            payload = %payload,
            "No build system endpoint configured, logging build trigger"
        );
        Ok(())
    }
}
