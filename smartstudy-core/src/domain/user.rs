//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::now;

/// A registered user of the directory
///
/// The password is kept in plaintext to stay compatible with existing
/// stores; login compares it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and the current timestamp
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            created_at: now(),
        }
    }

    /// Exact, case-sensitive credential match
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    /// Whether `other` refers to the same directory entry
    pub fn same_identity(&self, other: &User) -> bool {
        self.id == other.id && self.email == other.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Ada", "ada@example.com", "secret");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.id.is_empty());
    }

    #[test]
    fn test_credentials_are_case_sensitive() {
        let user = User::new("Ada", "ada@example.com", "secret");
        assert!(user.credentials_match("ada@example.com", "secret"));
        assert!(!user.credentials_match("Ada@example.com", "secret"));
        assert!(!user.credentials_match("ada@example.com", "Secret"));
    }

    #[test]
    fn test_serialized_shape() {
        let user = User::new("Ada", "ada@example.com", "secret");
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("createdAt").unwrap().is_i64());
        assert_eq!(value["email"], "ada@example.com");

        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back, user);
    }
}
