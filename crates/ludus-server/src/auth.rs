//! Shared-secret gate for mutating student endpoints.
//!
//! Every login/logout/signup request carries an `auth_token` field that must
//! match the secret the server was started with. The check runs before any
//! other logic and has no side effects on failure. This secret is distinct
//! from the per-student stoken issued at signup.

/// The configured API secret.
#[derive(Clone)]
pub struct ApiSecret(String);

impl ApiSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Check a presented token against the configured secret.
    pub fn verify(&self, presented: &str) -> bool {
        self.0 == presented
    }
}

impl std::fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the secret out of debug/log output.
        f.write_str("ApiSecret(..)")
    }
}
