//! The event handed to the downstream build system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::build_request::BuildRequest;

/// Request to start a build, published once per successful trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTriggerEvent {
    /// Unique identifier of this trigger.
    pub event_id: Uuid,

    /// When the event was created.
    pub created_at: DateTime<Utc>,

    /// The validated request the build is for.
    pub build_info: BuildRequest,

    /// Email of the person who requested the build.
    pub email: String,
}

impl BuildTriggerEvent {
    pub fn new(build_info: BuildRequest, email: &str) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            created_at: Utc::now(),
            build_info,
            email: email.to_string(),
        }
    }
}
