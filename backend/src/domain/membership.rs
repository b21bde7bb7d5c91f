//! Community membership records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use soundlink_scopes::{Scope, ScopeSet};

use super::ids::{CommunityId, MembershipId, UserId};

/// The scope grant a freshly joined member receives:
/// `event_read | event_write` (mask value 6).
pub const DEFAULT_MEMBER_SCOPES: ScopeSet =
    ScopeSet::EMPTY.with(Scope::EventRead).with(Scope::EventWrite);

/// One user's scope grant within one community.
///
/// At most one membership exists per (user, community) pair; the services
/// that create memberships enforce this, not the type itself. The grant
/// changes only through explicit permission operations, never through
/// reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    id: MembershipId,
    community_id: CommunityId,
    user_id: UserId,
    created: DateTime<Utc>,
    permission: ScopeSet,
}

impl Membership {
    /// Assemble a membership from stored fields.
    #[must_use]
    pub const fn new(
        id: MembershipId,
        community_id: CommunityId,
        user_id: UserId,
        created: DateTime<Utc>,
        permission: ScopeSet,
    ) -> Self {
        Self {
            id,
            community_id,
            user_id,
            created,
            permission,
        }
    }

    /// Stable membership key.
    #[must_use]
    pub const fn id(&self) -> MembershipId {
        self.id
    }

    /// The community the grant applies to.
    #[must_use]
    pub const fn community_id(&self) -> CommunityId {
        self.community_id
    }

    /// The holder of the grant.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// When the user joined the community.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// The member's scopes within the community.
    #[must_use]
    pub const fn permission(&self) -> ScopeSet {
        self.permission
    }
}

/// Fields required to insert a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMembership {
    /// The community being joined.
    pub community_id: CommunityId,
    /// The joining user.
    pub user_id: UserId,
    /// The member's initial scope grant.
    pub permission: ScopeSet,
    /// Join timestamp.
    pub created: DateTime<Utc>,
}
