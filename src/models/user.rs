//! User model.
//!
//! Users are owned by an external identity service; the engine only reads
//! them, mostly to decide who may review an entry.

use serde::{Deserialize, Serialize};

/// The role a user holds in the organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular staff member who records their own attendance.
    Employee,
    /// Line manager who reviews their team's entries.
    Manager,
    /// Administrator with full access.
    Admin,
}

impl Role {
    /// Returns true if this role may approve, reject, or re-submit entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Role;
    ///
    /// assert!(Role::Manager.can_review());
    /// assert!(!Role::Employee.can_review());
    /// ```
    pub fn can_review(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

/// A person known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// The user's role.
    pub role: Role,
}
