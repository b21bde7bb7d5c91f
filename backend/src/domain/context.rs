//! The authenticated actor's identity and permission state.

use serde::Serialize;
use soundlink_scopes::ScopeSet;

use super::ids::CommunityId;
use super::membership::Membership;
use super::user::User;

/// The resolved identity of the currently authenticated actor: the user
/// plus every community membership they hold.
///
/// A context is built once at successful login and destroyed by dropping
/// it at logout. It is immutable and carries no interior state, so it is
/// safe to share across concurrent authorization checks. It is never
/// stored globally — callers pass it explicitly into every
/// permission-gated operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    user: User,
    memberships: Vec<Membership>,
}

impl UserContext {
    /// Build a context from the authenticated user and their memberships.
    #[must_use]
    pub const fn new(user: User, memberships: Vec<Membership>) -> Self {
        Self { user, memberships }
    }

    /// The authenticated user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Every community membership the user holds.
    #[must_use]
    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    /// The user's scopes within the given community.
    ///
    /// A user with no membership there holds the empty set — a valid
    /// "no access" state, not an error.
    ///
    /// # Examples
    /// ```
    /// use soundlink::domain::{CommunityId, UserContext, UserId, User};
    /// use chrono::Utc;
    ///
    /// let user = User::new(UserId::new(1), "ada", "Ada", "", Utc::now(), None);
    /// let context = UserContext::new(user, Vec::new());
    /// assert!(context.scopes_for(CommunityId::new(5)).is_empty());
    /// ```
    #[must_use]
    pub fn scopes_for(&self, community_id: CommunityId) -> ScopeSet {
        self.memberships
            .iter()
            .find(|membership| membership.community_id() == community_id)
            .map_or(ScopeSet::EMPTY, Membership::permission)
    }
}
