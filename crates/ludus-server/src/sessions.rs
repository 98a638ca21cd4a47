//! In-memory tracking of logged-in students.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

/// Thread-safe set of currently logged-in students, keyed by email.
///
/// Login state lives only in process memory: a session exists from a
/// successful login or signup until an explicit logout, with no expiry.
/// The compound check-and-insert / check-and-remove operations hold the
/// write lock for their whole duration, so concurrent logins for the same
/// email admit exactly one winner.
#[derive(Clone)]
pub struct SessionTracker {
    active: Arc<RwLock<HashSet<String>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            active: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Mark a student as logged in.
    ///
    /// Returns `false` if a session for this email already exists.
    pub async fn begin(&self, email: &str) -> bool {
        let inserted = self.active.write().await.insert(email.to_string());
        if inserted {
            info!(email = %email, "Session started");
        }
        inserted
    }

    /// End a student's session.
    ///
    /// Returns `false` if no session exists for this email.
    pub async fn end(&self, email: &str) -> bool {
        let removed = self.active.write().await.remove(email);
        if removed {
            info!(email = %email, "Session ended");
        } else {
            warn!(email = %email, "Tried to end session for email with no session");
        }
        removed
    }

    /// Whether a session exists for this email.
    pub async fn is_active(&self, email: &str) -> bool {
        self.active.read().await.contains(email)
    }

    /// Number of active sessions.
    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }

    /// Emails with an active session.
    pub async fn active_emails(&self) -> Vec<String> {
        self.active.read().await.iter().cloned().collect()
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
