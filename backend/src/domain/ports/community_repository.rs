//! Port for community persistence, including the existence lookup the
//! validation framework leans on for cross-entity checks.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::StorageError;
use crate::domain::community::{Community, NewCommunity};
use crate::domain::ids::CommunityId;

/// Persistence port for community aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Whether a community with this id exists.
    async fn exists(&self, id: CommunityId) -> Result<bool, StorageError>;

    /// Fetch a community by identifier.
    async fn find_by_id(&self, id: CommunityId)
    -> Result<Option<Community>, StorageError>;

    /// Insert a community, assigning its key.
    async fn create(&self, new: NewCommunity) -> Result<Community, StorageError>;
}

#[derive(Debug, Default)]
struct CommunityRows {
    next_id: i64,
    rows: HashMap<CommunityId, Community>,
}

/// In-memory community store.
#[derive(Debug, Default)]
pub struct InMemoryCommunityRepository {
    state: Mutex<CommunityRows>,
}

impl InMemoryCommunityRepository {
    fn lock(&self) -> Result<MutexGuard<'_, CommunityRows>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::connection("community state lock poisoned"))
    }
}

#[async_trait]
impl CommunityRepository for InMemoryCommunityRepository {
    async fn exists(&self, id: CommunityId) -> Result<bool, StorageError> {
        Ok(self.lock()?.rows.contains_key(&id))
    }

    async fn find_by_id(
        &self,
        id: CommunityId,
    ) -> Result<Option<Community>, StorageError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewCommunity) -> Result<Community, StorageError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let community = Community::new(
            CommunityId::new(state.next_id),
            new.name,
            new.description,
            new.genre,
            new.created,
            new.is_private,
        );
        state.rows.insert(community.id(), community.clone());
        Ok(community)
    }
}
