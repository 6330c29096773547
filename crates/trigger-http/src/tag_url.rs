//! Tag URL parsing for assembling build requests from a repository tag.
//!
//! Recognised forms:
//! - `https://host/{owner}/{repo}/releases/tag/{tag}`
//! - `https://host/{owner}/{repo}/tree/{tag}`
//! - `https://host/{group}/.../{project}/-/tags/{tag}`

use serde::{Deserialize, Serialize};
use trigger_core::BuildRequestFields;

/// Errors from tag URL parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagUrlError {
    #[error("Invalid URL format provided: {url} ({reason})")]
    Malformed { url: String, reason: String },
}

/// Repository and tag named by a tag URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagLocation {
    /// Original tag URL.
    pub tag_url: String,
    /// Repository URL without the tag suffix.
    pub repository_url: String,
    /// Tag name.
    pub tag: String,
}

impl TagLocation {
    /// Request fields known from the URL alone; version, commit and streams
    /// are left for the caller to fill in.
    pub fn partial_fields(&self) -> BuildRequestFields {
        BuildRequestFields {
            tag: self.tag_url.clone(),
            git_repo: self.repository_url.clone(),
            ..BuildRequestFields::default()
        }
    }
}

/// Parse a tag URL into its repository and tag.
pub fn parse_tag_url(raw: &str) -> Result<TagLocation, TagUrlError> {
    let raw = raw.trim();
    let malformed = |reason: &str| TagUrlError::Malformed {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = reqwest::Url::parse(raw).map_err(|e| malformed(&e.to_string()))?;
    if url.scheme() != "https" {
        return Err(malformed("scheme must be https"));
    }
    let host = url.host_str().ok_or_else(|| malformed("missing host"))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let (repo, tag) = split_repo_and_tag(&segments)
        .ok_or_else(|| malformed("path does not name a repository tag"))?;

    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    Ok(TagLocation {
        tag_url: raw.to_string(),
        repository_url: format!("https://{}{}/{}", host, port, repo.join("/")),
        tag: tag.join("/"),
    })
}

fn split_repo_and_tag<'a>(segments: &'a [&'a str]) -> Option<(&'a [&'a str], &'a [&'a str])> {
    // GitLab: .../-/tags/{tag}
    if let Some(pos) = segments.windows(2).position(|w| w == ["-", "tags"]) {
        return non_empty(&segments[..pos], &segments[pos + 2..]);
    }
    match segments {
        [_, _, "releases", "tag", ..] => non_empty(&segments[..2], &segments[4..]),
        [_, _, "tree", ..] => non_empty(&segments[..2], &segments[3..]),
        _ => None,
    }
}

fn non_empty<'a>(
    repo: &'a [&'a str],
    tag: &'a [&'a str],
) -> Option<(&'a [&'a str], &'a [&'a str])> {
    (!repo.is_empty() && !tag.is_empty()).then_some((repo, tag))
}
