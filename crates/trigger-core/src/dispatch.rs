//! End-to-end build-trigger orchestration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::batch::IssueBatchBuilder;
use crate::config::{ExecutionMode, TriggerConfig};
use crate::domain::{
    BuildRequest, BuildRequestFields, BuildTriggerEvent, IssueBatch, Result, StreamRegistry,
};
use crate::obs::{
    emit_build_published, emit_issues_submission_failed, emit_issues_submitted,
    emit_issues_suppressed, emit_trigger_received, trigger_span,
};
use crate::ports::{BuildPublisher, IssueTracker};
use crate::user_resolver::{UserResolver, UNKNOWN_IDENTITY};

/// What happened to the issue batch during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum IssueSubmission {
    /// The tracker accepted the batch.
    Submitted,
    /// Not production; the batch was logged instead.
    Suppressed,
    /// The tracker call failed; the build was still triggered.
    Failed(String),
}

/// Result of a completed dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Repository URL of the build.
    pub repository: String,

    /// Project version of the build.
    pub version: String,

    /// Machine labels of the requested streams, in request order.
    pub streams: Vec<String>,

    /// Number of issues in the batch (one per stream).
    pub issue_count: usize,

    /// Fate of the issue batch.
    pub issues: IssueSubmission,

    /// Id of the published build-trigger event.
    pub event_id: Uuid,
}

impl DispatchOutcome {
    /// Acknowledgement returned to the caller.
    pub fn message(&self) -> String {
        format!(
            "Build triggered successfully for repository {}, version: {}",
            self.repository, self.version
        )
    }
}

/// Orchestrates validate → resolve assignee → build batch → submit → publish.
///
/// Issue creation is an auxiliary record: its failures are logged and
/// reported in the outcome, and the build-trigger event is published
/// regardless. Outside [`ExecutionMode::Production`] the tracker's
/// `create_issues` is never called.
pub struct BuildTriggerDispatcher {
    registry: Arc<StreamRegistry>,
    resolver: UserResolver,
    batch_builder: IssueBatchBuilder,
    tracker: Arc<dyn IssueTracker>,
    publisher: Arc<dyn BuildPublisher>,
    mode: ExecutionMode,
}

impl BuildTriggerDispatcher {
    pub fn new(
        registry: Arc<StreamRegistry>,
        batch_builder: IssueBatchBuilder,
        tracker: Arc<dyn IssueTracker>,
        publisher: Arc<dyn BuildPublisher>,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            registry,
            resolver: UserResolver::new(tracker.clone()),
            batch_builder,
            tracker,
            publisher,
            mode,
        }
    }

    /// Wire a dispatcher from configuration.
    pub fn from_config(
        config: &TriggerConfig,
        registry: Arc<StreamRegistry>,
        tracker: Arc<dyn IssueTracker>,
        publisher: Arc<dyn BuildPublisher>,
    ) -> Self {
        let batch_builder = IssueBatchBuilder::new(registry.clone(), config.issue_defaults());
        Self::new(registry, batch_builder, tracker, publisher, config.mode)
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Validate raw fields, then dispatch.
    ///
    /// Validation failures return before any outbound call is made.
    pub async fn trigger(
        &self,
        fields: BuildRequestFields,
        requester_email: Option<&str>,
    ) -> Result<DispatchOutcome> {
        let request = BuildRequest::validate(fields, &self.registry)?;
        self.dispatch(request, requester_email).await
    }

    /// Run the pipeline for an already validated request.
    ///
    /// # Errors
    ///
    /// - `TriggerError::UnknownStream`: a stream label is not registered;
    ///   nothing is submitted or published.
    /// - `TriggerError::Publish`: the build-trigger event could not be
    ///   delivered.
    pub async fn dispatch(
        &self,
        request: BuildRequest,
        requester_email: Option<&str>,
    ) -> Result<DispatchOutcome> {
        let span = trigger_span(request.git_repo(), request.project_version());
        self.run(request, requester_email).instrument(span).await
    }

    async fn run(
        &self,
        request: BuildRequest,
        requester_email: Option<&str>,
    ) -> Result<DispatchOutcome> {
        let requester = requester_email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(UNKNOWN_IDENTITY);
        emit_trigger_received(
            request.git_repo(),
            request.project_version(),
            request.streams(),
            requester,
        );

        let assignee = self.resolver.resolve(Some(requester)).await;
        let batch = self.batch_builder.build(&request, assignee.as_deref())?;
        let streams = request
            .streams()
            .iter()
            .map(|label| self.registry.canonical_label(label).map(str::to_string))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let issues = self.submit(&batch).await;

        let repository = request.git_repo().to_string();
        let version = request.project_version().to_string();

        let event = BuildTriggerEvent::new(request, requester);
        self.publisher.publish(&event).await?;
        emit_build_published(&event.event_id.to_string(), requester);

        Ok(DispatchOutcome {
            repository,
            version,
            streams,
            issue_count: batch.len(),
            issues,
            event_id: event.event_id,
        })
    }

    async fn submit(&self, batch: &IssueBatch) -> IssueSubmission {
        let body = batch.to_bulk_json();

        if !self.mode.is_production() {
            let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
            emit_issues_suppressed(self.mode.as_str(), batch.len(), &pretty);
            return IssueSubmission::Suppressed;
        }

        info!(issue_count = batch.len(), "Sending issue batch to tracker");
        match self.tracker.create_issues(batch).await {
            Ok(()) => {
                emit_issues_submitted(batch.len());
                IssueSubmission::Submitted
            }
            Err(e) => {
                emit_issues_submission_failed(batch.len(), &e, &body.to_string());
                IssueSubmission::Failed(e.to_string())
            }
        }
    }
}
