//! Port for user persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::StorageError;
use crate::domain::ids::UserId;
use crate::domain::user::{NewUser, User};

/// Persistence port for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by their unique login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, StorageError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Insert a user, assigning their key.
    async fn create(&self, new: NewUser) -> Result<User, StorageError>;

    /// Stamp the user's most recent successful login.
    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct UserRows {
    next_id: i64,
    rows: HashMap<UserId, User>,
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<UserRows>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, UserRows>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::connection("user state lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, StorageError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, StorageError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let user = User::new(
            UserId::new(state.next_id),
            new.username,
            new.display_name,
            new.hashed_password,
            new.created,
            None,
        );
        state.rows.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        match state.rows.remove(&id) {
            Some(user) => {
                state.rows.insert(id, user.with_last_login(at));
                Ok(())
            }
            None => Err(StorageError::query(format!("no user with id {id}"))),
        }
    }
}
