//! Build requests and their validation.
//!
//! [`BuildRequestFields`] is the raw, untrusted shape received from a caller.
//! [`BuildRequest`] can only be obtained through [`BuildRequest::validate`]
//! or by deserializing. Deserializing checks every field format but only the
//! lower stream bound, since the upper bound belongs to whichever registry
//! the request was accepted under.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::stream::StreamRegistry;

/// Scheme every tag and repository URL must start with.
pub const SECURE_SCHEME: &str = "https://";

/// Allowed commit id lengths (abbreviated through full SHA-1).
pub const COMMIT_ID_MIN_LEN: usize = 7;
pub const COMMIT_ID_MAX_LEN: usize = 40;

/// Raw build request fields as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequestFields {
    #[serde(default)]
    pub tag: String,

    #[serde(default, alias = "repositoryUrl")]
    pub git_repo: String,

    #[serde(default)]
    pub project_version: String,

    #[serde(default, alias = "commitId")]
    pub commit_sha: String,

    #[serde(default)]
    pub streams: Vec<String>,
}

/// A validated build request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BuildRequestFields")]
pub struct BuildRequest {
    tag: String,
    git_repo: String,
    project_version: String,
    commit_sha: String,
    streams: Vec<String>,
}

impl BuildRequest {
    /// Validate raw fields against the given registry.
    ///
    /// Surrounding whitespace is trimmed from every string (including each
    /// stream label) before checking.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, checked in this order:
    /// 1. `ValidationError::InvalidTag`: tag is not `https://` + something.
    /// 2. `ValidationError::InvalidRepositoryUrl`: same rule for the repo.
    /// 3. `ValidationError::InvalidCommitId`: not 7 to 40 hex characters.
    /// 4. `ValidationError::BlankProjectVersion`: version is blank.
    /// 5. `ValidationError::StreamCount`: fewer than one stream or more
    ///    streams than the registry holds.
    pub fn validate(
        fields: BuildRequestFields,
        registry: &StreamRegistry,
    ) -> Result<Self, ValidationError> {
        Self::check(fields, Some(registry.len()))
    }

    fn check(
        fields: BuildRequestFields,
        max_streams: Option<usize>,
    ) -> Result<Self, ValidationError> {
        let tag = fields.tag.trim().to_string();
        let git_repo = fields.git_repo.trim().to_string();
        let project_version = fields.project_version.trim().to_string();
        let commit_sha = fields.commit_sha.trim().to_string();
        let streams: Vec<String> = fields
            .streams
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if !is_secure_url(&tag) {
            return Err(ValidationError::InvalidTag);
        }
        if !is_secure_url(&git_repo) {
            return Err(ValidationError::InvalidRepositoryUrl);
        }
        if !is_commit_id(&commit_sha) {
            return Err(ValidationError::InvalidCommitId);
        }
        if project_version.is_empty() {
            return Err(ValidationError::BlankProjectVersion);
        }

        match max_streams {
            Some(max) if streams.is_empty() || streams.len() > max => {
                return Err(ValidationError::StreamCount {
                    min: 1,
                    max,
                    actual: streams.len(),
                });
            }
            None if streams.is_empty() => return Err(ValidationError::MissingStreams),
            _ => {}
        }

        Ok(Self {
            tag,
            git_repo,
            project_version,
            commit_sha,
            streams,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn git_repo(&self) -> &str {
        &self.git_repo
    }

    pub fn project_version(&self) -> &str {
        &self.project_version
    }

    pub fn commit_sha(&self) -> &str {
        &self.commit_sha
    }

    pub fn streams(&self) -> &[String] {
        &self.streams
    }

    /// Last path segment of the repository URL, ignoring one trailing slash.
    ///
    /// `https://example.com/org/my-repo/` yields `my-repo`.
    pub fn repository_name(&self) -> &str {
        let repo = self.git_repo.strip_suffix('/').unwrap_or(&self.git_repo);
        match repo.rfind('/') {
            Some(idx) => &repo[idx + 1..],
            None => repo,
        }
    }
}

impl TryFrom<BuildRequestFields> for BuildRequest {
    type Error = ValidationError;

    fn try_from(fields: BuildRequestFields) -> Result<Self, Self::Error> {
        BuildRequest::check(fields, None)
    }
}

fn is_secure_url(value: &str) -> bool {
    value
        .strip_prefix(SECURE_SCHEME)
        .is_some_and(|rest| !rest.is_empty())
}

fn is_commit_id(value: &str) -> bool {
    (COMMIT_ID_MIN_LEN..=COMMIT_ID_MAX_LEN).contains(&value.len())
        && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> BuildRequestFields {
        BuildRequestFields {
            tag: "https://github.com/org/repo/releases/tag/1.2.3".to_string(),
            git_repo: "https://github.com/org/repo".to_string(),
            project_version: "1.2.3".to_string(),
            commit_sha: "abc1234".to_string(),
            streams: vec!["EAP 7.4.x".to_string()],
        }
    }

    fn validate(fields: BuildRequestFields) -> Result<BuildRequest, ValidationError> {
        BuildRequest::validate(fields, StreamRegistry::builtin())
    }

    #[test]
    fn test_valid_request_accepted() {
        let request = validate(valid_fields()).expect("valid");
        assert_eq!(request.tag(), "https://github.com/org/repo/releases/tag/1.2.3");
        assert_eq!(request.streams(), ["EAP 7.4.x"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let fields = BuildRequestFields {
            tag: "  https://example.com/t \n".to_string(),
            git_repo: "\thttps://example.com/org/repo ".to_string(),
            project_version: " 1.0.0 ".to_string(),
            commit_sha: " ABCDEF0 ".to_string(),
            streams: vec![" eap:8.0.x ".to_string()],
        };
        let request = validate(fields).expect("valid after trimming");
        assert_eq!(request.tag(), "https://example.com/t");
        assert_eq!(request.git_repo(), "https://example.com/org/repo");
        assert_eq!(request.project_version(), "1.0.0");
        assert_eq!(request.commit_sha(), "ABCDEF0");
        assert_eq!(request.streams(), ["eap:8.0.x"]);
    }

    #[test]
    fn test_non_secure_tag_rejected() {
        for tag in ["http://example.com/t", "https://", "", "ftp://x", "example.com"] {
            let fields = BuildRequestFields {
                tag: tag.to_string(),
                ..valid_fields()
            };
            assert_eq!(validate(fields), Err(ValidationError::InvalidTag), "{tag:?}");
        }
    }

    #[test]
    fn test_non_secure_repository_rejected() {
        let fields = BuildRequestFields {
            git_repo: "git@github.com:org/repo.git".to_string(),
            ..valid_fields()
        };
        assert_eq!(validate(fields), Err(ValidationError::InvalidRepositoryUrl));
    }

    #[test]
    fn test_commit_id_format() {
        let too_long = "a".repeat(41);
        for bad in ["abc123", "xyz1234", "abc 1234", "", too_long.as_str()] {
            let fields = BuildRequestFields {
                commit_sha: bad.to_string(),
                ..valid_fields()
            };
            assert_eq!(validate(fields), Err(ValidationError::InvalidCommitId), "{bad:?}");
        }

        let full = "0123456789abcdefABCDEF0123456789abcdef01";
        let fields = BuildRequestFields {
            commit_sha: full.to_string(),
            ..valid_fields()
        };
        assert!(validate(fields).is_ok());
    }

    #[test]
    fn test_blank_version_rejected() {
        let fields = BuildRequestFields {
            project_version: "   ".to_string(),
            ..valid_fields()
        };
        assert_eq!(validate(fields), Err(ValidationError::BlankProjectVersion));
    }

    #[test]
    fn test_stream_count_bounds() {
        let empty = BuildRequestFields {
            streams: vec![],
            ..valid_fields()
        };
        assert_eq!(
            validate(empty),
            Err(ValidationError::StreamCount {
                min: 1,
                max: 5,
                actual: 0
            })
        );

        let six = BuildRequestFields {
            streams: vec!["EAP 7.4.x".to_string(); 6],
            ..valid_fields()
        };
        assert_eq!(
            validate(six),
            Err(ValidationError::StreamCount {
                min: 1,
                max: 5,
                actual: 6
            })
        );

        let five = BuildRequestFields {
            streams: StreamRegistry::builtin()
                .iter()
                .map(|d| d.machine_label.clone())
                .collect(),
            ..valid_fields()
        };
        assert!(validate(five).is_ok());
    }

    #[test]
    fn test_stream_bound_follows_registry_size() {
        let registry = StreamRegistry::new(vec![
            crate::domain::StreamDefinition::new("A", "a", "(a)", "1"),
            crate::domain::StreamDefinition::new("B", "b", "(b)", "2"),
        ])
        .expect("registry");
        let fields = BuildRequestFields {
            streams: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            ..valid_fields()
        };
        assert_eq!(
            BuildRequest::validate(fields, &registry),
            Err(ValidationError::StreamCount {
                min: 1,
                max: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let fields = BuildRequestFields {
            tag: "http://bad".to_string(),
            git_repo: "http://bad".to_string(),
            project_version: "".to_string(),
            commit_sha: "zz".to_string(),
            streams: vec![],
        };
        assert_eq!(validate(fields), Err(ValidationError::InvalidTag));

        let fields = BuildRequestFields {
            commit_sha: "zz".to_string(),
            project_version: "".to_string(),
            streams: vec![],
            ..valid_fields()
        };
        assert_eq!(validate(fields), Err(ValidationError::InvalidCommitId));
    }

    #[test]
    fn test_repository_name() {
        let cases = [
            ("https://example.com/org/my-repo/", "my-repo"),
            ("https://example.com/org/my-repo", "my-repo"),
            ("https://github.com/wildfly/wildfly-core", "wildfly-core"),
        ];
        for (repo, expected) in cases {
            let request = validate(BuildRequestFields {
                git_repo: repo.to_string(),
                ..valid_fields()
            })
            .expect("valid");
            assert_eq!(request.repository_name(), expected);
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{
            "tag": "https://example.com/t",
            "gitRepo": "https://example.com/org/repo",
            "projectVersion": "2.0.0",
            "commitSha": "deadbeef",
            "streams": ["XP 5.0.x"]
        }"#;
        let request: BuildRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(request.commit_sha(), "deadbeef");

        let invalid = json.replace("deadbeef", "nothex!");
        assert!(serde_json::from_str::<BuildRequest>(&invalid).is_err());
    }

    #[test]
    fn test_deserialize_requires_a_stream() {
        let json = r#"{
            "tag": "https://example.com/t",
            "gitRepo": "https://example.com/org/repo",
            "projectVersion": "2.0.0",
            "commitSha": "deadbeef",
            "streams": []
        }"#;
        let err = serde_json::from_str::<BuildRequest>(json).unwrap_err();
        assert!(err.to_string().contains("At least one stream is required"));
    }

    #[test]
    fn test_request_from_larger_registry_reads_back() {
        let definitions: Vec<_> = (1..=6)
            .map(|n| {
                crate::domain::StreamDefinition::new(
                    &format!("Stream {n}"),
                    &format!("stream:{n}"),
                    &format!("({n}.z)"),
                    &n.to_string(),
                )
            })
            .collect();
        let registry = StreamRegistry::new(definitions).expect("registry");
        let fields = BuildRequestFields {
            streams: registry.iter().map(|d| d.machine_label.clone()).collect(),
            ..valid_fields()
        };
        let request = BuildRequest::validate(fields, &registry).expect("valid under six streams");

        let json = serde_json::to_string(&request).expect("serialize");
        let back: BuildRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, request);
        assert_eq!(back.streams().len(), 6);
    }

    #[test]
    fn test_fields_accept_aliases() {
        let json = r#"{
            "tag": "https://example.com/t",
            "repositoryUrl": "https://example.com/org/repo",
            "projectVersion": "2.0.0",
            "commitId": "deadbeef",
            "streams": ["XP 5.0.x"]
        }"#;
        let fields: BuildRequestFields = serde_json::from_str(json).expect("deserialize");
        assert_eq!(fields.git_repo, "https://example.com/org/repo");
        assert_eq!(fields.commit_sha, "deadbeef");
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let request = validate(valid_fields()).expect("valid");
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["gitRepo"], "https://github.com/org/repo");
        assert_eq!(value["commitSha"], "abc1234");
        assert_eq!(value["projectVersion"], "1.2.3");
    }
}
