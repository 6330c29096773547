//! Jira REST client
//!
//! Implements the `IssueTracker` port against Jira's REST API v2:
//! - `GET  /rest/api/2/user?key=..` for assignee lookup
//! - `POST /rest/api/2/issue/bulk` for batch issue creation
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! configured.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trigger_core::config::DEFAULT_JIRA_URL;
use trigger_core::{IssueBatch, IssueTracker, TrackerError, TrackerUser};

use crate::error::HttpError;

const API_PREFIX: &str = "rest/api/2";

/// Jira connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Jira server URL
    pub base_url: String,
    /// Personal access token
    pub token: Option<String>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        JiraConfig {
            base_url: DEFAULT_JIRA_URL.to_string(),
            token: None,
        }
    }
}

impl JiraConfig {
    /// Create config for a specific server
    pub fn new(base_url: &str) -> Self {
        JiraConfig {
            base_url: base_url.to_string(),
            token: None,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Jira client implementing [`IssueTracker`].
pub struct JiraRestClient {
    config: JiraConfig,
    base_url: String,
    http_client: reqwest::Client,
}

impl JiraRestClient {
    /// Create a new Jira client.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidUrl` when `base_url` does not parse, and
    /// `HttpError::Client` when the HTTP client cannot be built.
    pub fn new(config: JiraConfig) -> Result<Self, HttpError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| HttpError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("build-trigger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(JiraRestClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
            http_client,
        })
    }

    /// Absolute URL of an API resource, e.g. `issue/bulk`.
    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, resource)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch a user by key; `None` on 404.
    async fn fetch_user(&self, key: &str) -> Result<Option<TrackerUser>, HttpError> {
        let request = self
            .http_client
            .get(self.endpoint("user"))
            .query(&[("key", key)]);
        let response = self.authorize(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(key = %key, "Jira user not found");
            return Ok(None);
        }

        let body: serde_json::Value = ensure_success(response).await?.json().await?;
        parse_user(&body)
    }

    async fn post_bulk(&self, batch: &IssueBatch) -> Result<(), HttpError> {
        let request = self
            .http_client
            .post(self.endpoint("issue/bulk"))
            .json(&batch.to_bulk_json());
        let response = self.authorize(request).send().await?;
        let created = ensure_success(response).await?.text().await.unwrap_or_default();
        debug!(response = %created, "Jira bulk create response");
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for JiraRestClient {
    async fn lookup_user(&self, key: &str) -> Result<Option<TrackerUser>, TrackerError> {
        Ok(self.fetch_user(key).await?)
    }

    async fn create_issues(&self, batch: &IssueBatch) -> Result<(), TrackerError> {
        info!(issue_count = batch.len(), "Creating issues in Jira");
        Ok(self.post_bulk(batch).await?)
    }
}

/// Turn a non-2xx response into `HttpError::Status` carrying the body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, HttpError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(HttpError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Extract the account name from a user resource.
///
/// A `null` body means no user; a body without a string `name` is malformed.
fn parse_user(body: &serde_json::Value) -> Result<Option<TrackerUser>, HttpError> {
    if body.is_null() {
        return Ok(None);
    }
    body.get("name")
        .and_then(|n| n.as_str())
        .map(|name| {
            Some(TrackerUser {
                name: name.to_string(),
            })
        })
        .ok_or_else(|| HttpError::Decode("user resource has no 'name' field".to_string()))
}
