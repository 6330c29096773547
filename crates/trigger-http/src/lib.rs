//! Trigger-HTTP: network adapters for the build trigger pipeline
//!
//! - `JiraRestClient`: `IssueTracker` over Jira's REST API
//! - `WebhookBuildPublisher`: `BuildPublisher` posting events to the build system
//! - `parse_tag_url`: repository/tag extraction for the assembler path

pub mod error;
pub mod jira;
pub mod tag_url;
pub mod webhook;

pub use error::HttpError;
pub use jira::{JiraConfig, JiraRestClient};
pub use tag_url::{parse_tag_url, TagLocation, TagUrlError};
pub use webhook::WebhookBuildPublisher;
