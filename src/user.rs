//! The single local account.

use serde::{Deserialize, Serialize};

use crate::hash::{password_token, verify_password};

/// Stored account record. `password` holds the token produced by
/// [`password_token`], never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Build a user record, hashing the plaintext password.
    pub fn register(
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password_token(password),
        }
    }

    /// True when both the username and the password token match.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && verify_password(password, &self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_never_stores_plaintext() {
        let user = User::register("alice", "alice@example.com", "hunter22");
        assert_ne!(user.password, "hunter22");
        assert!(user.password.starts_with("tf$"));
    }

    #[test]
    fn matches_requires_username_and_password() {
        let user = User::register("alice", "alice@example.com", "hunter22");
        assert!(user.matches("alice", "hunter22"));
        assert!(!user.matches("alice", "hunter23"));
        assert!(!user.matches("bob", "hunter22"));
    }
}
