//! Atomic field checks composed by domain validators.
//!
//! Each check returns `Some(ValidationError)` on failure and `None` on
//! success, so a validator can evaluate its whole list up front and hand
//! it to [`ensure`](super::ensure) without short-circuiting. The `name`
//! argument labels the field in the produced message.

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::error;

use super::ValidationError;
use crate::domain::ids::CommunityId;
use crate::domain::ports::CommunityRepository;

/// Fails when the value is absent or has zero length.
pub fn not_empty(name: &str, value: Option<&str>) -> Option<ValidationError> {
    match value {
        Some(value) if !value.is_empty() => None,
        _ => Some(ValidationError::new(format!("{name} is null or empty"))),
    }
}

/// Fails when the value is absent.
pub fn not_null<T>(name: &str, value: Option<&T>) -> Option<ValidationError> {
    if value.is_some() {
        None
    } else {
        Some(ValidationError::new(format!("{name} is null")))
    }
}

/// Fails unless the timestamp is strictly before "now" on the injected
/// clock. An absent timestamp fails too.
pub fn is_past(
    clock: &dyn Clock,
    name: &str,
    value: Option<DateTime<Utc>>,
) -> Option<ValidationError> {
    match value {
        Some(value) if value < clock.utc() => None,
        _ => Some(ValidationError::new(format!("{name} is not in the past"))),
    }
}

/// Fails unless the timestamp is strictly after "now" on the injected
/// clock. An absent timestamp fails too.
pub fn is_future(
    clock: &dyn Clock,
    name: &str,
    value: Option<DateTime<Utc>>,
) -> Option<ValidationError> {
    match value {
        Some(value) if value > clock.utc() => None,
        _ => Some(ValidationError::new(format!("{name} is not in the future"))),
    }
}

/// Fails unless the number is strictly greater than zero.
pub fn is_positive(name: &str, value: i64) -> Option<ValidationError> {
    if value > 0 {
        None
    } else {
        Some(ValidationError::new(format!(
            "{name} is not greater than 0"
        )))
    }
}

/// Delegates to `check` when the value is present; an absent value passes
/// trivially. Optionality itself is not an error — require presence with
/// [`not_null`] or [`not_empty`] separately.
pub fn if_present<T, F>(
    name: &str,
    value: Option<&T>,
    check: F,
) -> Option<ValidationError>
where
    F: FnOnce(&str, &T) -> Option<ValidationError>,
{
    value.and_then(|inner| check(name, inner))
}

/// Fails when the referenced community does not exist, or when the lookup
/// collaborator itself fails — in which case the message embeds the
/// underlying cause instead of masking it.
pub async fn community_exists<C>(
    communities: &C,
    id: CommunityId,
) -> Option<ValidationError>
where
    C: CommunityRepository + ?Sized,
{
    match communities.exists(id).await {
        Ok(true) => None,
        Ok(false) => Some(ValidationError::new(format!(
            "Community not found with id: {id}"
        ))),
        Err(cause) => {
            error!(%cause, community_id = id.get(), "community existence lookup failed");
            Some(ValidationError::new(format!("Internal error: {cause}")))
        }
    }
}
