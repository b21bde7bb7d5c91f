//! Community use-cases: creation, sign-up, and membership queries.

use std::sync::Arc;

use mockable::Clock;
use soundlink_scopes::{Scope, ScopeSet};
use tracing::{info, warn};

use super::authorization::authorize;
use super::community::{Community, NewCommunity};
use super::context::UserContext;
use super::ids::{CommunityId, UserId};
use super::membership::{DEFAULT_MEMBER_SCOPES, Membership, NewMembership};
use super::ports::{CommunityRepository, MembershipRepository, StorageError};
use super::result::{CoreError, CoreResult};
use super::validation::{
    ValidationError, ValidationFailure, ValidationResult, ensure, not_empty,
};

/// Raw community creation input. Fields are optional because the input
/// arrives unvalidated; the validator reports absences.
#[derive(Debug, Clone, Default)]
pub struct CreateCommunityRequest {
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Musical genre tag.
    pub genre: Option<String>,
    /// Whether the community is hidden from public browsing.
    pub is_private: bool,
}

/// Validate a community creation model.
#[must_use]
pub fn validate_create_community(
    model: Option<&CreateCommunityRequest>,
) -> ValidationResult {
    let Some(model) = model else {
        return ValidationResult::single(ValidationError::new("Model is null"));
    };
    ensure([
        not_empty("Name", model.name.as_deref()),
        not_empty("Description", model.description.as_deref()),
        not_empty("Genre", model.genre.as_deref()),
    ])
}

/// Failures raised by community operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommunityError {
    /// The request model failed validation; all violations are listed.
    #[error("{0}")]
    Validation(ValidationFailure),
    /// The user already holds a membership in the community.
    #[error("User {user_id} is already a member of community {community_id}")]
    AlreadyMember {
        /// The joining user.
        user_id: UserId,
        /// The community being joined.
        community_id: CommunityId,
    },
    /// A grant targeted a user without a membership in the community.
    #[error("User {user_id} is not a member of community {community_id}")]
    NotMember {
        /// The targeted user.
        user_id: UserId,
        /// The community the grant applied to.
        community_id: CommunityId,
    },
    /// The actor lacks `community_write` in the target community.
    #[error("You are not permitted to perform this action")]
    NotPermitted,
    /// The backing store failed mid-operation.
    #[error("Internal error: please contact SoundLink Support. Error: {message}")]
    Storage {
        /// Underlying storage failure detail, kept for operators.
        message: String,
    },
}

impl CommunityError {
    /// Wrap a storage failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl CoreError for CommunityError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::AlreadyMember { .. } => "already_member",
            Self::NotMember { .. } => "not_member",
            Self::NotPermitted => "forbidden",
            Self::Storage { .. } => "storage_failure",
        }
    }
}

impl From<StorageError> for CommunityError {
    fn from(error: StorageError) -> Self {
        Self::storage(error.to_string())
    }
}

/// Community service over the community and membership stores.
#[derive(Clone)]
pub struct CommunityService<C, M> {
    communities: Arc<C>,
    memberships: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<C, M> CommunityService<C, M> {
    /// Create a new service with the given stores and clock.
    pub fn new(
        communities: Arc<C>,
        memberships: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            communities,
            memberships,
            clock,
        }
    }
}

impl<C, M> CommunityService<C, M>
where
    C: CommunityRepository,
    M: MembershipRepository,
{
    /// Create a community and sign its creator up as the first member.
    ///
    /// Creation is open to any authenticated user; no scope gate applies.
    /// Validation failures return the accumulated errors untouched and
    /// nothing is written.
    pub async fn create_community(
        &self,
        context: &UserContext,
        request: CreateCommunityRequest,
    ) -> CoreResult<Community, CommunityError> {
        if let Some(failure) =
            validate_create_community(Some(&request)).into_failure()
        {
            return CoreResult::Failure(CommunityError::Validation(failure));
        }
        let (Some(name), Some(description), Some(genre)) =
            (request.name, request.description, request.genre)
        else {
            return CoreResult::Failure(CommunityError::storage(
                "community model lost required fields after validation",
            ));
        };

        let community = match self
            .communities
            .create(NewCommunity {
                name,
                description,
                genre,
                is_private: request.is_private,
                created: self.clock.utc(),
            })
            .await
        {
            Ok(community) => community,
            Err(error) => return CoreResult::Failure(error.into()),
        };

        let creator = context.user().id();
        match self.join_community(creator, community.id()).await {
            CoreResult::Success(_) => {}
            // A fresh community cannot have members yet; tolerate anyway.
            CoreResult::Failure(CommunityError::AlreadyMember { .. }) => {}
            CoreResult::Failure(error) => return CoreResult::Failure(error),
        }

        info!(
            community_id = community.id().get(),
            user_id = creator.get(),
            "community created"
        );
        CoreResult::Success(community)
    }

    /// Sign a user up for a community with the default member grant.
    ///
    /// One membership per (user, community): joining twice fails with
    /// [`CommunityError::AlreadyMember`] and leaves the original row
    /// untouched.
    pub async fn join_community(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> CoreResult<Membership, CommunityError> {
        match self.memberships.find(user_id, community_id).await {
            Ok(Some(_)) => {
                return CoreResult::Failure(CommunityError::AlreadyMember {
                    user_id,
                    community_id,
                });
            }
            Ok(None) => {}
            Err(error) => return CoreResult::Failure(error.into()),
        }

        match self
            .memberships
            .create(NewMembership {
                community_id,
                user_id,
                permission: DEFAULT_MEMBER_SCOPES,
                created: self.clock.utc(),
            })
            .await
        {
            Ok(membership) => {
                info!(
                    user_id = user_id.get(),
                    community_id = community_id.get(),
                    "user joined community"
                );
                CoreResult::Success(membership)
            }
            Err(error) => CoreResult::Failure(error.into()),
        }
    }

    /// Cancel a user's membership. Returns whether a membership existed;
    /// leaving a community you never joined is not an error.
    pub async fn leave_community(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> CoreResult<bool, CommunityError> {
        match self.memberships.delete(user_id, community_id).await {
            Ok(true) => CoreResult::Success(true),
            Ok(false) => {
                warn!(
                    user_id = user_id.get(),
                    community_id = community_id.get(),
                    "user is not a member of this community"
                );
                CoreResult::Success(false)
            }
            Err(error) => CoreResult::Failure(error.into()),
        }
    }

    /// Replace a member's scope grant.
    ///
    /// Permission management is community administration: the acting user
    /// must hold `community_write` in the target community (or the
    /// superadmin override). Reads never mutate a grant — this is the only
    /// operation that does.
    pub async fn grant_scopes(
        &self,
        context: &UserContext,
        user_id: UserId,
        community_id: CommunityId,
        scopes: ScopeSet,
    ) -> CoreResult<Membership, CommunityError> {
        if authorize(Some(context), community_id, &[Scope::CommunityWrite])
            .is_err()
        {
            warn!(
                user_id = context.user().id().get(),
                community_id = community_id.get(),
                "scope grant denied"
            );
            return CoreResult::Failure(CommunityError::NotPermitted);
        }

        match self
            .memberships
            .update_permission(user_id, community_id, scopes)
            .await
        {
            Ok(Some(membership)) => {
                info!(
                    user_id = user_id.get(),
                    community_id = community_id.get(),
                    scopes = %scopes,
                    "member scopes granted"
                );
                CoreResult::Success(membership)
            }
            Ok(None) => CoreResult::Failure(CommunityError::NotMember {
                user_id,
                community_id,
            }),
            Err(error) => CoreResult::Failure(error.into()),
        }
    }

    /// The user's persisted scopes within a community; empty for
    /// non-members.
    ///
    /// # Errors
    /// Propagates the storage failure when the lookup cannot run.
    pub async fn member_scopes(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> Result<ScopeSet, StorageError> {
        Ok(self
            .memberships
            .find(user_id, community_id)
            .await?
            .map_or(ScopeSet::EMPTY, |membership| membership.permission()))
    }

    /// Fetch a community by id.
    ///
    /// # Errors
    /// Propagates the storage failure when the lookup cannot run.
    pub async fn get_community(
        &self,
        id: CommunityId,
    ) -> Result<Option<Community>, StorageError> {
        self.communities.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests;
