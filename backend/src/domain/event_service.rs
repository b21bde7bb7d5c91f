//! Event use-cases: creation, booking, and booking cancellation.
//!
//! Event creation is the fully gated path: the request model runs through
//! validation first, then the acting user's context must grant
//! `event_write` in the hosting community, and only when both pass does
//! anything reach storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use soundlink_scopes::{Scope, ScopeSet};
use tracing::{info, warn};

use super::authorization::authorize;
use super::booking::{Booking, NewBooking};
use super::context::UserContext;
use super::event::{Event, NewEvent};
use super::ids::{CommunityId, EventId, UserId};
use super::ports::{
    BookingRepository, CommunityRepository, EventRepository, StorageError,
};
use super::result::{CoreError, CoreResult};
use super::validation::{
    ValidationError, ValidationFailure, ValidationResult, community_exists,
    ensure, is_future, is_positive, not_empty,
};

/// Raw event creation input. Fields are optional because the input
/// arrives unvalidated; the validator reports absences.
#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    /// The hosting community.
    pub community_id: CommunityId,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// When the event takes place; must lie in the future.
    pub scheduled: Option<DateTime<Utc>>,
    /// Where the event takes place.
    pub venue: Option<String>,
    /// Maximum number of attendees; must be positive.
    pub capacity: i64,
}

/// Validate an event creation model.
///
/// Checks run in declaration order and all of them run even when earlier
/// ones fail: name, description, scheduled date in the future, venue,
/// positive capacity, and finally the cross-entity community-existence
/// lookup through the injected store.
pub async fn validate_create_event<C>(
    clock: &dyn Clock,
    communities: &C,
    model: Option<&CreateEventRequest>,
) -> ValidationResult
where
    C: CommunityRepository + ?Sized,
{
    let Some(model) = model else {
        return ValidationResult::single(ValidationError::new("Model is null"));
    };
    ensure([
        not_empty("Name", model.name.as_deref()),
        not_empty("Description", model.description.as_deref()),
        is_future(clock, "Scheduled date", model.scheduled),
        not_empty("Venue", model.venue.as_deref()),
        is_positive("Capacity", model.capacity),
        community_exists(communities, model.community_id).await,
    ])
}

/// Failures raised by event creation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The request model failed validation; all violations are listed.
    #[error("{0}")]
    Validation(ValidationFailure),
    /// The actor lacks `event_write` in the hosting community.
    #[error("You are not permitted to perform this action")]
    NotPermitted,
    /// The backing store failed mid-operation.
    #[error("Internal error: please contact SoundLink Support. Error: {message}")]
    Storage {
        /// Underlying storage failure detail, kept for operators.
        message: String,
    },
}

impl EventError {
    /// Wrap a storage failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl CoreError for EventError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotPermitted => "forbidden",
            Self::Storage { .. } => "storage_failure",
        }
    }
}

impl From<StorageError> for EventError {
    fn from(error: StorageError) -> Self {
        Self::storage(error.to_string())
    }
}

/// Failures raised by booking operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// The user already holds a booking for the event.
    #[error("User {user_id} has already booked event {event_id}")]
    AlreadyBooked {
        /// The attending user.
        user_id: UserId,
        /// The booked event.
        event_id: EventId,
    },
    /// The backing store failed mid-operation.
    #[error("Internal error: please contact SoundLink Support. Error: {message}")]
    Storage {
        /// Underlying storage failure detail, kept for operators.
        message: String,
    },
}

impl BookingError {
    /// Wrap a storage failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl CoreError for BookingError {
    fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyBooked { .. } => "already_booked",
            Self::Storage { .. } => "storage_failure",
        }
    }
}

impl From<StorageError> for BookingError {
    fn from(error: StorageError) -> Self {
        Self::storage(error.to_string())
    }
}

/// Result envelope for event booking.
pub type EventBookingResult = CoreResult<Booking, BookingError>;

/// Event service over the community, event, and booking stores.
#[derive(Clone)]
pub struct EventService<C, E, B> {
    communities: Arc<C>,
    events: Arc<E>,
    bookings: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<C, E, B> EventService<C, E, B> {
    /// Create a new service with the given stores and clock.
    pub fn new(
        communities: Arc<C>,
        events: Arc<E>,
        bookings: Arc<B>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            communities,
            events,
            bookings,
            clock,
        }
    }
}

impl<C, E, B> EventService<C, E, B>
where
    C: CommunityRepository,
    E: EventRepository,
    B: BookingRepository,
{
    /// Create an event in the hosting community.
    ///
    /// Validation failures return the accumulated result untouched;
    /// authorization failures come back as a distinct forbidden outcome.
    /// Storage is only reached when both gates pass.
    pub async fn create_event(
        &self,
        context: &UserContext,
        request: CreateEventRequest,
    ) -> CoreResult<Event, EventError> {
        let validation = validate_create_event(
            self.clock.as_ref(),
            self.communities.as_ref(),
            Some(&request),
        )
        .await;
        if let Some(failure) = validation.into_failure() {
            return CoreResult::Failure(EventError::Validation(failure));
        }

        if authorize(Some(context), request.community_id, &[Scope::EventWrite])
            .is_err()
        {
            warn!(
                user_id = context.user().id().get(),
                community_id = request.community_id.get(),
                "event creation denied"
            );
            return CoreResult::Failure(EventError::NotPermitted);
        }

        let (Some(name), Some(description), Some(scheduled), Some(venue)) = (
            request.name,
            request.description,
            request.scheduled,
            request.venue,
        ) else {
            return CoreResult::Failure(EventError::storage(
                "event model lost required fields after validation",
            ));
        };

        match self
            .events
            .create(NewEvent {
                community_id: request.community_id,
                name,
                description,
                venue,
                capacity: request.capacity,
                scheduled,
                created: self.clock.utc(),
            })
            .await
        {
            Ok(event) => {
                info!(
                    event_id = event.id().get(),
                    community_id = event.community_id().get(),
                    "event created"
                );
                CoreResult::Success(event)
            }
            Err(error) => CoreResult::Failure(error.into()),
        }
    }

    /// Book an event for a user.
    ///
    /// A user books an event at most once; the booking carries the
    /// `event_read` grant for its holder.
    pub async fn book_event(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> EventBookingResult {
        match self.bookings.find(event_id, user_id).await {
            Ok(Some(_)) => {
                return CoreResult::Failure(BookingError::AlreadyBooked {
                    user_id,
                    event_id,
                });
            }
            Ok(None) => {}
            Err(error) => return CoreResult::Failure(error.into()),
        }

        match self
            .bookings
            .create(NewBooking {
                event_id,
                user_id,
                permission: ScopeSet::from(Scope::EventRead),
                created: self.clock.utc(),
            })
            .await
        {
            Ok(booking) => {
                info!(
                    event_id = event_id.get(),
                    user_id = user_id.get(),
                    "event booked"
                );
                CoreResult::Success(booking)
            }
            Err(error) => CoreResult::Failure(error.into()),
        }
    }

    /// Cancel a user's booking. Returns whether a booking existed;
    /// cancelling a booking you never made is not an error.
    pub async fn cancel_booking(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> CoreResult<bool, BookingError> {
        match self.bookings.delete(event_id, user_id).await {
            Ok(deleted) => CoreResult::Success(deleted),
            Err(error) => CoreResult::Failure(error.into()),
        }
    }

    /// Whether the user holds a booking for the event.
    ///
    /// # Errors
    /// Propagates the storage failure when the lookup cannot run.
    pub async fn is_booked(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<bool, StorageError> {
        Ok(self.bookings.find(event_id, user_id).await?.is_some())
    }

    /// Fetch an event by id.
    ///
    /// # Errors
    /// Propagates the storage failure when the lookup cannot run.
    pub async fn get_event(
        &self,
        id: EventId,
    ) -> Result<Option<Event>, StorageError> {
        self.events.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests;
