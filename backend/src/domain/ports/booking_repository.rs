//! Port for event booking persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::StorageError;
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::ids::{BookingId, EventId, UserId};

/// Persistence port for booking rows, keyed by (event, user).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// The user's booking for one event, if any.
    async fn find(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<Booking>, StorageError>;

    /// Insert a booking, assigning its key.
    async fn create(&self, new: NewBooking) -> Result<Booking, StorageError>;

    /// Remove the user's booking for one event. Returns whether a row was
    /// deleted.
    async fn delete(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<bool, StorageError>;
}

#[derive(Debug, Default)]
struct BookingRows {
    next_id: i64,
    rows: HashMap<(EventId, UserId), Booking>,
}

/// In-memory booking store.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    state: Mutex<BookingRows>,
}

impl InMemoryBookingRepository {
    fn lock(&self) -> Result<MutexGuard<'_, BookingRows>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::connection("booking state lock poisoned"))
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<Booking>, StorageError> {
        Ok(self.lock()?.rows.get(&(event_id, user_id)).cloned())
    }

    async fn create(&self, new: NewBooking) -> Result<Booking, StorageError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let booking = Booking::new(
            BookingId::new(state.next_id),
            new.event_id,
            new.user_id,
            new.created,
            new.permission,
        );
        state
            .rows
            .insert((new.event_id, new.user_id), booking.clone());
        Ok(booking)
    }

    async fn delete(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<bool, StorageError> {
        Ok(self.lock()?.rows.remove(&(event_id, user_id)).is_some())
    }
}
