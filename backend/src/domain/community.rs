//! Community records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::CommunityId;

/// A community users can join and host events in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    id: CommunityId,
    name: String,
    description: String,
    genre: String,
    created: DateTime<Utc>,
    is_private: bool,
}

impl Community {
    /// Assemble a community from stored fields.
    #[must_use]
    pub fn new(
        id: CommunityId,
        name: impl Into<String>,
        description: impl Into<String>,
        genre: impl Into<String>,
        created: DateTime<Utc>,
        is_private: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            genre: genre.into(),
            created,
            is_private,
        }
    }

    /// Stable community key.
    #[must_use]
    pub const fn id(&self) -> CommunityId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-form description shown on the community page.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Musical genre tag.
    #[must_use]
    pub fn genre(&self) -> &str {
        self.genre.as_str()
    }

    /// When the community was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Whether the community is hidden from public browsing.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.is_private
    }
}

/// Fields required to insert a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunity {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Musical genre tag.
    pub genre: String,
    /// Whether the community is hidden from public browsing.
    pub is_private: bool,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}
