//! Port for event persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::StorageError;
use crate::domain::event::{Event, NewEvent};
use crate::domain::ids::EventId;

/// Persistence port for event records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert an event, assigning its key.
    async fn create(&self, new: NewEvent) -> Result<Event, StorageError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, StorageError>;
}

#[derive(Debug, Default)]
struct EventRows {
    next_id: i64,
    rows: HashMap<EventId, Event>,
}

/// In-memory event store.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    state: Mutex<EventRows>,
}

impl InMemoryEventRepository {
    fn lock(&self) -> Result<MutexGuard<'_, EventRows>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::connection("event state lock poisoned"))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, new: NewEvent) -> Result<Event, StorageError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let event = Event::new(
            EventId::new(state.next_id),
            new.community_id,
            new.name,
            new.description,
            new.venue,
            new.capacity,
            new.scheduled,
            new.created,
        );
        state.rows.insert(event.id(), event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, StorageError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }
}
