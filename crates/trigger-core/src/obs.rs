//! Structured observability hooks for the trigger lifecycle.
//!
//! Every function emits one `tracing` event tagged with an `event` field so
//! log pipelines can filter on it:
//! - `trigger.received`
//! - `issues.suppressed` / `issues.submitted` / `issues.submission_failed`
//! - `build.published`

use tracing::{error, info};

/// Span covering one trigger call, tagged with the repository and version.
///
/// Attach it to the pipeline future with `tracing::Instrument` so every
/// event emitted during the call carries these fields.
pub fn trigger_span(repository: &str, version: &str) -> tracing::Span {
    tracing::info_span!("build_trigger", repository = %repository, version = %version)
}

/// Emit event: a validated trigger was received.
pub fn emit_trigger_received(repository: &str, version: &str, streams: &[String], requester: &str) {
    info!(
        event = "trigger.received",
        repository = %repository,
        version = %version,
        streams = ?streams,
        requester = %requester,
        "Triggering build"
    );
}

/// Emit event: issue creation skipped outside production; carries the full payload.
pub fn emit_issues_suppressed(mode: &str, issue_count: usize, payload: &str) {
    info!(
        event = "issues.suppressed",
        mode = %mode,
        issue_count = issue_count,
        "Non-production mode, issues not created. Payload:\n{}",
        payload
    );
}

/// Emit event: the tracker accepted the batch.
pub fn emit_issues_submitted(issue_count: usize) {
    info!(event = "issues.submitted", issue_count = issue_count, "Issues sent to tracker");
}

/// Emit event: the tracker rejected the batch or could not be reached.
pub fn emit_issues_submission_failed(
    issue_count: usize,
    error: &dyn std::fmt::Display,
    payload: &str,
) {
    error!(
        event = "issues.submission_failed",
        issue_count = issue_count,
        error = %error,
        payload = %payload,
        "Failed to send issues to tracker"
    );
}

/// Emit event: the build-trigger event was handed to the build system.
pub fn emit_build_published(event_id: &str, requester: &str) {
    info!(event = "build.published", event_id = %event_id, requester = %requester, "Build triggered");
}
