//! Event booking records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use soundlink_scopes::ScopeSet;

use super::ids::{BookingId, EventId, UserId};

/// One user's booking of one event.
///
/// A booking carries its own scope grant (what the attendee may do with
/// the event they booked); the creator decides the grant, the type does
/// not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    id: BookingId,
    event_id: EventId,
    user_id: UserId,
    created: DateTime<Utc>,
    permission: ScopeSet,
}

impl Booking {
    /// Assemble a booking from stored fields.
    #[must_use]
    pub const fn new(
        id: BookingId,
        event_id: EventId,
        user_id: UserId,
        created: DateTime<Utc>,
        permission: ScopeSet,
    ) -> Self {
        Self {
            id,
            event_id,
            user_id,
            created,
            permission,
        }
    }

    /// Stable booking key.
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// The booked event.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// The attending user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// When the booking was made.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// The attendee's scope grant for this event.
    #[must_use]
    pub const fn permission(&self) -> ScopeSet {
        self.permission
    }
}

/// Fields required to insert a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBooking {
    /// The booked event.
    pub event_id: EventId,
    /// The attending user.
    pub user_id: UserId,
    /// The attendee's scope grant for this event.
    pub permission: ScopeSet,
    /// Booking timestamp.
    pub created: DateTime<Utc>,
}
