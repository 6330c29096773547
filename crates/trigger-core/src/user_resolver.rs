//! Best-effort mapping from a requester email to a tracker account.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::ports::IssueTracker;

/// Placeholder email used when the identity token carries no email claim.
pub const UNKNOWN_IDENTITY: &str = "Email not provided in the token";

/// Resolves requester emails to issue-tracker usernames.
///
/// Resolution never fails: anything that prevents finding a user (missing
/// identity, lookup error, no match) yields `None`, so an unresolved
/// assignee can never block issue creation.
#[derive(Clone)]
pub struct UserResolver {
    tracker: Arc<dyn IssueTracker>,
}

impl UserResolver {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Resolve `email` to a tracker username.
    pub async fn resolve(&self, email: Option<&str>) -> Option<String> {
        let key = lookup_key(email?)?;

        match self.tracker.lookup_user(key).await {
            Ok(Some(user)) if !user.name.trim().is_empty() => {
                debug!(key = %key, user = %user.name, "Resolved assignee");
                Some(user.name)
            }
            Ok(_) => {
                warn!(key = %key, "No tracker user matches requester, issues will be unassigned");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Assignee lookup failed, issues will be unassigned");
                None
            }
        }
    }
}

/// Tracker lookup key for an email: the part before the last `@`.
///
/// Returns `None` for blank input, the [`UNKNOWN_IDENTITY`] sentinel, and
/// strings without an `@` or with an empty local part.
pub fn lookup_key(email: &str) -> Option<&str> {
    let email = email.trim();
    if email.is_empty() || email == UNKNOWN_IDENTITY {
        return None;
    }
    let (local, _domain) = email.rsplit_once('@')?;
    if local.is_empty() {
        return None;
    }
    Some(local)
}
