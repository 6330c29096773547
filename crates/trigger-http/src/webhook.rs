//! Build-system webhook publisher
//!
//! POSTs each `BuildTriggerEvent` as JSON to a configured endpoint.

use async_trait::async_trait;
use tracing::info;
use trigger_core::{BuildPublisher, BuildTriggerEvent, PublishError};

use crate::error::HttpError;
use crate::jira::ensure_success;

/// Publishes build-trigger events over HTTP.
pub struct WebhookBuildPublisher {
    endpoint: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl WebhookBuildPublisher {
    /// Create a publisher for `endpoint`.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidUrl` when `endpoint` is not an absolute URL.
    pub fn new(endpoint: &str) -> Result<Self, HttpError> {
        reqwest::Url::parse(endpoint).map_err(|e| HttpError::InvalidUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("build-trigger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            token: None,
            http_client,
        })
    }

    /// Send `Authorization: Bearer <token>` with every event.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, event: &BuildTriggerEvent) -> Result<(), HttpError> {
        let mut request = self.http_client.post(&self.endpoint).json(event);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        ensure_success(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl BuildPublisher for WebhookBuildPublisher {
    async fn publish(&self, event: &BuildTriggerEvent) -> Result<(), PublishError> {
        info!(event_id = %event.event_id, endpoint = %self.endpoint, "Publishing build trigger");
        Ok(self.post(event).await?)
    }
}
