//! User domain entity

use chrono::{DateTime, Utc};

/// Back-office account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Soft-delete flag
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a user that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring match on email
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(email) = &self.email {
            if !user.email.contains(email.as_str()) {
                return false;
            }
        }
        if let Some(active) = self.is_active {
            if user.is_active != active {
                return false;
            }
        }
        true
    }
}
