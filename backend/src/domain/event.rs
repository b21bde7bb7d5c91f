//! Event records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{CommunityId, EventId};

/// A scheduled event hosted by a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: EventId,
    community_id: CommunityId,
    name: String,
    description: String,
    venue: String,
    capacity: i64,
    scheduled: DateTime<Utc>,
    created: DateTime<Utc>,
}

impl Event {
    /// Assemble an event from stored fields.
    #[expect(clippy::too_many_arguments, reason = "row constructor mirrors the stored columns")]
    #[must_use]
    pub fn new(
        id: EventId,
        community_id: CommunityId,
        name: impl Into<String>,
        description: impl Into<String>,
        venue: impl Into<String>,
        capacity: i64,
        scheduled: DateTime<Utc>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            community_id,
            name: name.into(),
            description: description.into(),
            venue: venue.into(),
            capacity,
            scheduled,
            created,
        }
    }

    /// Stable event key.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// The hosting community.
    #[must_use]
    pub const fn community_id(&self) -> CommunityId {
        self.community_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Where the event takes place.
    #[must_use]
    pub fn venue(&self) -> &str {
        self.venue.as_str()
    }

    /// Maximum number of attendees.
    #[must_use]
    pub const fn capacity(&self) -> i64 {
        self.capacity
    }

    /// When the event takes place.
    #[must_use]
    pub const fn scheduled(&self) -> DateTime<Utc> {
        self.scheduled
    }

    /// When the event record was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Fields required to insert an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// The hosting community.
    pub community_id: CommunityId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Where the event takes place.
    pub venue: String,
    /// Maximum number of attendees.
    pub capacity: i64,
    /// When the event takes place.
    pub scheduled: DateTime<Utc>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}
