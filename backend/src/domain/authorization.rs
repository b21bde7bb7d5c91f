//! Per-community authorization decisions.
//!
//! The checker is pure: it inspects an explicitly passed [`UserContext`]
//! and never consults global state, so it is safe to call repeatedly and
//! concurrently against the same context. Failures are returned, never
//! raised, and the forbidden message stays generic — it does not reveal
//! which scopes were missing.

use soundlink_scopes::Scope;

use super::context::UserContext;
use super::ids::CommunityId;
use super::result::{CoreError, CoreResult};

/// Authentication/authorization failures.
///
/// Messages are user-facing: credential failures stay indistinguishable
/// between unknown-username and wrong-password, and authorization
/// failures do not enumerate scopes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Username or password missing from the request.
    #[error("Username and password must have values")]
    MalformedCredentials,
    /// The username/password pair did not authenticate.
    #[error("Incorrect username or password")]
    InvalidCredentials,
    /// Registration collided with an existing username.
    #[error("User already exists")]
    AlreadyRegistered,
    /// The actor lacks the required scopes, or there is no session.
    #[error("You are not permitted to perform this action")]
    NotPermitted,
    /// The backing store failed mid-operation.
    #[error("Internal server error. Please contact SoundLink support. Error: {message}")]
    Storage {
        /// Underlying storage failure detail, kept for operators.
        message: String,
    },
}

impl AuthError {
    /// Wrap a storage failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl CoreError for AuthError {
    fn kind(&self) -> &'static str {
        match self {
            Self::MalformedCredentials => "malformed_credentials",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AlreadyRegistered => "already_registered",
            Self::NotPermitted => "forbidden",
            Self::Storage { .. } => "storage_failure",
        }
    }
}

/// Result envelope for authentication and authorization operations.
pub type AuthResult<T = ()> = CoreResult<T, AuthError>;

/// Whether the acting user holds every required scope in the community.
///
/// - `None` (no authenticated session) is denied unconditionally.
/// - A context holding [`Scope::Superadmin`] in that community passes
///   regardless of what was required — the override is policy, not an
///   accident.
/// - Otherwise every listed scope must be present (AND semantics; an OR
///   check would be a different operation, not this one).
///
/// # Examples
/// ```
/// use soundlink::domain::{is_authorized, CommunityId};
/// use soundlink_scopes::Scope;
///
/// assert!(!is_authorized(None, CommunityId::new(5), &[Scope::EventRead]));
/// ```
#[must_use]
pub fn is_authorized(
    context: Option<&UserContext>,
    community_id: CommunityId,
    required: &[Scope],
) -> bool {
    let Some(context) = context else {
        return false;
    };
    let scopes = context.scopes_for(community_id);
    if scopes.has(Scope::Superadmin) {
        return true;
    }
    scopes.contains_all(required)
}

/// The same decision as [`is_authorized`], surfaced as a result so
/// services can fail an operation with a forbidden outcome.
///
/// # Errors
/// Returns [`AuthError::NotPermitted`] when the check denies.
pub fn authorize(
    context: Option<&UserContext>,
    community_id: CommunityId,
    required: &[Scope],
) -> Result<(), AuthError> {
    if is_authorized(context, community_id, required) {
        Ok(())
    } else {
        Err(AuthError::NotPermitted)
    }
}
