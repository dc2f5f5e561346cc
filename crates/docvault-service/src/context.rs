//! Request context carrying the caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current request.
///
/// The identity is supplied by an external collaborator and is never used
/// for access decisions here; it only ends up in the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Caller identity, if the boundary supplied one.
    pub user_id: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for the given caller.
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.trim().is_empty()),
            request_time: Utc::now(),
        }
    }

    /// A context with no caller identity, used by the CLI and tests.
    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
