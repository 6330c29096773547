//! In-memory fakes for the outbound ports (testing only)
//!
//! Provides `MemoryIssueTracker` and `MemoryBuildPublisher`, which record
//! every call and can be switched into failure modes, without any network.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{BuildTriggerEvent, IssueBatch, PublishError, TrackerError};
use crate::ports::{BuildPublisher, IssueTracker, TrackerUser};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// MemoryIssueTracker
// ---------------------------------------------------------------------------

/// In-memory issue tracker backed by a `HashMap<key, user>`.
#[derive(Debug, Default)]
pub struct MemoryIssueTracker {
    users: HashMap<String, TrackerUser>,
    fail_lookups: bool,
    fail_submissions: bool,
    lookups: Mutex<Vec<String>>,
    submitted: Mutex<Vec<IssueBatch>>,
    submission_attempts: Mutex<usize>,
}

impl MemoryIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user under a lookup key.
    pub fn with_user(mut self, key: &str, name: &str) -> Self {
        self.users.insert(
            key.to_string(),
            TrackerUser {
                name: name.to_string(),
            },
        );
        self
    }

    /// Make every `lookup_user` call fail with a transport error.
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Make every `create_issues` call fail with a remote rejection.
    pub fn failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    /// Keys passed to `lookup_user`, in call order.
    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }

    /// Batches accepted by `create_issues`.
    pub fn submitted(&self) -> Vec<IssueBatch> {
        lock(&self.submitted).clone()
    }

    /// Number of `create_issues` calls, successful or not.
    pub fn submission_attempts(&self) -> usize {
        *lock(&self.submission_attempts)
    }
}

#[async_trait]
impl IssueTracker for MemoryIssueTracker {
    async fn lookup_user(&self, key: &str) -> Result<Option<TrackerUser>, TrackerError> {
        lock(&self.lookups).push(key.to_string());
        if self.fail_lookups {
            return Err(TrackerError::Transport("connection refused".to_string()));
        }
        Ok(self.users.get(key).cloned())
    }

    async fn create_issues(&self, batch: &IssueBatch) -> Result<(), TrackerError> {
        *lock(&self.submission_attempts) += 1;
        if self.fail_submissions {
            return Err(TrackerError::Status {
                status: 400,
                body: r#"{"errorMessages":["simulated rejection"]}"#.to_string(),
            });
        }
        lock(&self.submitted).push(batch.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryBuildPublisher
// ---------------------------------------------------------------------------

/// In-memory publisher that keeps every published event.
#[derive(Debug, Default)]
pub struct MemoryBuildPublisher {
    fail: bool,
    events: Mutex<Vec<BuildTriggerEvent>>,
}

impl MemoryBuildPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `publish` call fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Events published so far, in order.
    pub fn events(&self) -> Vec<BuildTriggerEvent> {
        lock(&self.events).clone()
    }
}

#[async_trait]
impl BuildPublisher for MemoryBuildPublisher {
    async fn publish(&self, event: &BuildTriggerEvent) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Transport("broker unavailable".to_string()));
        }
        lock(&self.events).push(event.clone());
        Ok(())
    }
}
