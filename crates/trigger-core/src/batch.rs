//! Construction of the tracking-issue batch for a build request.

use std::sync::Arc;

use crate::domain::{
    BuildRequest, IssueBatch, IssueDefaults, IssuePayload, StreamDefinition, StreamRegistry,
    UnknownStreamError,
};

/// Builds one component-upgrade issue per requested stream.
#[derive(Debug, Clone)]
pub struct IssueBatchBuilder {
    registry: Arc<StreamRegistry>,
    defaults: IssueDefaults,
}

impl IssueBatchBuilder {
    pub fn new(registry: Arc<StreamRegistry>, defaults: IssueDefaults) -> Self {
        Self { registry, defaults }
    }

    /// Build the batch for `request`, in stream order.
    ///
    /// Every stream is resolved before the batch is returned; if any label
    /// is unknown the whole call fails and no payload escapes.
    pub fn build(
        &self,
        request: &BuildRequest,
        assignee: Option<&str>,
    ) -> Result<IssueBatch, UnknownStreamError> {
        let assignee = assignee.map(str::trim).filter(|name| !name.is_empty());

        let issues = request
            .streams()
            .iter()
            .map(|label| {
                let stream = self.registry.resolve(label)?;
                Ok(self.payload(request, stream, assignee))
            })
            .collect::<Result<Vec<_>, UnknownStreamError>>()?;

        Ok(IssueBatch::new(
            issues,
            self.defaults.target_release_field.clone(),
        ))
    }

    fn payload(
        &self,
        request: &BuildRequest,
        stream: &StreamDefinition,
        assignee: Option<&str>,
    ) -> IssuePayload {
        IssuePayload {
            target_release: stream.target_release.clone(),
            issue_type_id: self.defaults.issue_type_id.clone(),
            priority_id: self.defaults.priority_id.clone(),
            project_id: self.defaults.project_id.clone(),
            summary: summary(stream, request),
            description: self.description(request, assignee),
            assignee: assignee.map(str::to_string),
        }
    }

    fn description(&self, request: &BuildRequest, assignee: Option<&str>) -> String {
        let mut details = format!(
            "Tag: {}\nCommit: {}\nVersion: {}\n\n",
            request.tag(),
            request.commit_sha(),
            request.project_version()
        );
        if !self.defaults.cc.is_empty() {
            let mentions: Vec<String> = self.defaults.cc.iter().map(|u| mention(u)).collect();
            details.push_str(&format!("cc {}\n\n", mentions.join("/")));
        }

        let key = &self.defaults.project_key;
        match assignee {
            Some(user) => format!(
                "This is an automated issue created by Build Trigger on behalf of {user}\n\n\
                 {details}Please make sure to attach all {key} issues resolved by this component upgrade {user}!",
                user = mention(user),
            ),
            None => format!(
                "This is an automated issue created by Build Trigger\n\n\
                 {details}Please make sure to attach all {key} issues resolved by this component upgrade!"
            ),
        }
    }
}

/// `"{prefix} Upgrade {repo} to version {version}"`.
fn summary(stream: &StreamDefinition, request: &BuildRequest) -> String {
    format!(
        "{} Upgrade {} to version {}",
        stream.title_prefix,
        request.repository_name(),
        request.project_version()
    )
}

fn mention(user: &str) -> String {
    format!("[~{}]", user)
}
