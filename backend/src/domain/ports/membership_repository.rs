//! Port for community membership persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use soundlink_scopes::ScopeSet;

use super::StorageError;
use crate::domain::ids::{CommunityId, MembershipId, UserId};
use crate::domain::membership::{Membership, NewMembership};

/// Persistence port for membership rows.
///
/// The one-row-per-(user, community) invariant is guarded by the services
/// that call [`MembershipRepository::create`]; adapters MAY additionally
/// enforce it at the storage layer. The in-memory adapter keys rows by the
/// pair, so a racing double-create collapses to an upsert rather than a
/// duplicate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Every membership the user holds, across all communities.
    async fn memberships_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Membership>, StorageError>;

    /// The user's membership in one community, if any.
    async fn find(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> Result<Option<Membership>, StorageError>;

    /// Insert a membership, assigning its key.
    async fn create(&self, new: NewMembership) -> Result<Membership, StorageError>;

    /// Replace the scope grant on an existing membership. Returns the
    /// updated row, or `None` when the user holds no membership there.
    async fn update_permission(
        &self,
        user_id: UserId,
        community_id: CommunityId,
        permission: ScopeSet,
    ) -> Result<Option<Membership>, StorageError>;

    /// Remove the user's membership in one community. Returns whether a
    /// row was deleted.
    async fn delete(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> Result<bool, StorageError>;
}

#[derive(Debug, Default)]
struct MembershipRows {
    next_id: i64,
    rows: HashMap<(UserId, CommunityId), Membership>,
}

/// In-memory membership store.
#[derive(Debug, Default)]
pub struct InMemoryMembershipRepository {
    state: Mutex<MembershipRows>,
}

impl InMemoryMembershipRepository {
    fn lock(&self) -> Result<MutexGuard<'_, MembershipRows>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::connection("membership state lock poisoned"))
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn memberships_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Membership>, StorageError> {
        let state = self.lock()?;
        let mut memberships: Vec<Membership> = state
            .rows
            .values()
            .filter(|membership| membership.user_id() == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(Membership::id);
        Ok(memberships)
    }

    async fn find(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> Result<Option<Membership>, StorageError> {
        Ok(self.lock()?.rows.get(&(user_id, community_id)).cloned())
    }

    async fn create(&self, new: NewMembership) -> Result<Membership, StorageError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let membership = Membership::new(
            MembershipId::new(state.next_id),
            new.community_id,
            new.user_id,
            new.created,
            new.permission,
        );
        state
            .rows
            .insert((new.user_id, new.community_id), membership.clone());
        Ok(membership)
    }

    async fn update_permission(
        &self,
        user_id: UserId,
        community_id: CommunityId,
        permission: ScopeSet,
    ) -> Result<Option<Membership>, StorageError> {
        let mut state = self.lock()?;
        let Some(existing) = state.rows.remove(&(user_id, community_id)) else {
            return Ok(None);
        };
        let updated = Membership::new(
            existing.id(),
            existing.community_id(),
            existing.user_id(),
            existing.created(),
            permission,
        );
        state.rows.insert((user_id, community_id), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> Result<bool, StorageError> {
        Ok(self.lock()?.rows.remove(&(user_id, community_id)).is_some())
    }
}
