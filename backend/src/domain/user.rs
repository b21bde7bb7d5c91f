//! User identity records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::UserId;

/// A registered user.
///
/// The password digest never leaves the process: it is skipped during
/// serialization and only consulted by the login service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    display_name: String,
    #[serde(skip_serializing)]
    hashed_password: String,
    created: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Assemble a user from stored fields.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        display_name: impl Into<String>,
        hashed_password: impl Into<String>,
        created: DateTime<Utc>,
        last_login: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            hashed_password: hashed_password.into(),
            created,
            last_login,
        }
    }

    /// Stable user key.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Unique login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Name shown to other users; defaults to the username at registration.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Salted password digest.
    #[must_use]
    pub fn hashed_password(&self) -> &str {
        self.hashed_password.as_str()
    }

    /// When the account was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// The most recent successful login, if any.
    #[must_use]
    pub const fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// A copy of the record with the login timestamp advanced.
    #[must_use]
    pub fn with_last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login = Some(at);
        self
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Name shown to other users.
    pub display_name: String,
    /// Salted password digest.
    pub hashed_password: String,
    /// Registration timestamp.
    pub created: DateTime<Utc>,
}
