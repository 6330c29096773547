//! Tracking-issue payloads and the bulk batch they are submitted in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tracker constants stamped onto every generated issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDefaults {
    /// Issue type id ("Component Upgrade").
    pub issue_type_id: String,

    /// Priority id ("Major").
    pub priority_id: String,

    /// Project id.
    pub project_id: String,

    /// Project key, used when asking the assignee to link resolved issues.
    pub project_key: String,

    /// Custom field holding the target release.
    pub target_release_field: String,

    /// Tracker usernames copied on every issue.
    pub cc: Vec<String>,
}

impl Default for IssueDefaults {
    fn default() -> Self {
        Self {
            issue_type_id: "12".to_string(),
            priority_id: "3".to_string(),
            project_id: "12313422".to_string(),
            project_key: "JBEAP".to_string(),
            target_release_field: "customfield_12311240".to_string(),
            cc: Vec::new(),
        }
    }
}

impl IssueDefaults {
    /// Replace the carbon-copy list.
    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }
}

/// One tracking issue, ready to be sent to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub target_release: String,
    pub issue_type_id: String,
    pub priority_id: String,
    pub project_id: String,
    pub summary: String,
    pub description: String,
    pub assignee: Option<String>,
}

impl IssuePayload {
    /// Render the tracker's `fields` object for this issue.
    pub fn to_fields_json(&self, target_release_field: &str) -> Value {
        let mut fields = json!({
            target_release_field: { "id": &self.target_release },
            "issuetype": { "id": &self.issue_type_id },
            "priority": { "id": &self.priority_id },
            "project": { "id": &self.project_id },
            "summary": &self.summary,
            "description": &self.description,
        });
        if let (Some(name), Some(obj)) = (&self.assignee, fields.as_object_mut()) {
            obj.insert("assignee".to_string(), json!({ "name": name }));
        }
        fields
    }
}

/// Ordered issues for one build request, one per stream.
///
/// A batch is only ever constructed complete; see
/// [`IssueBatchBuilder`](crate::batch::IssueBatchBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueBatch {
    issues: Vec<IssuePayload>,
    target_release_field: String,
}

impl IssueBatch {
    pub(crate) fn new(issues: Vec<IssuePayload>, target_release_field: String) -> Self {
        Self {
            issues,
            target_release_field,
        }
    }

    pub fn issues(&self) -> &[IssuePayload] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Render the bulk-create request body.
    pub fn to_bulk_json(&self) -> Value {
        let updates: Vec<Value> = self
            .issues
            .iter()
            .map(|issue| json!({ "fields": issue.to_fields_json(&self.target_release_field) }))
            .collect();
        json!({ "issueUpdates": updates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(assignee: Option<&str>) -> IssuePayload {
        let defaults = IssueDefaults::default();
        IssuePayload {
            target_release: "12354234".to_string(),
            issue_type_id: defaults.issue_type_id,
            priority_id: defaults.priority_id,
            project_id: defaults.project_id,
            summary: "(7.4.z) Upgrade repo to version 1.0".to_string(),
            description: "body".to_string(),
            assignee: assignee.map(str::to_string),
        }
    }

    #[test]
    fn test_fields_json_shape() {
        let fields = payload(None).to_fields_json("customfield_12311240");
        assert_eq!(fields["customfield_12311240"]["id"], "12354234");
        assert_eq!(fields["issuetype"]["id"], "12");
        assert_eq!(fields["priority"]["id"], "3");
        assert_eq!(fields["project"]["id"], "12313422");
        assert_eq!(fields["summary"], "(7.4.z) Upgrade repo to version 1.0");
        assert!(fields.get("assignee").is_none());
    }

    #[test]
    fn test_fields_json_includes_assignee() {
        let fields = payload(Some("jdoe")).to_fields_json("customfield_12311240");
        assert_eq!(fields["assignee"]["name"], "jdoe");
    }

    #[test]
    fn test_bulk_json_preserves_order() {
        let mut second = payload(None);
        second.summary = "second".to_string();
        let batch = IssueBatch::new(
            vec![payload(None), second],
            "customfield_12311240".to_string(),
        );

        let body = batch.to_bulk_json();
        let updates = body["issueUpdates"].as_array().expect("array");
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1]["fields"]["summary"], "second");
    }
}
