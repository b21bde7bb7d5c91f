//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to talk to driven adapters —
//! the persistent store, whatever it is. Each trait returns the shared
//! [`StorageError`] so adapters map their failures into predictable
//! variants, and each comes with an in-memory implementation that doubles
//! as the demo deployment and as a convenient test double.

mod booking_repository;
mod community_repository;
mod event_repository;
mod membership_repository;
mod user_repository;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, InMemoryBookingRepository};
#[cfg(test)]
pub use community_repository::MockCommunityRepository;
pub use community_repository::{CommunityRepository, InMemoryCommunityRepository};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, InMemoryEventRepository};
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{MembershipRepository, InMemoryMembershipRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{InMemoryUserRepository, UserRepository};

/// Failures raised by storage adapters.
///
/// Infrastructure failures carry enough detail for operators to diagnose
/// the root cause; validators wrap them into validation errors at the
/// check boundary rather than letting them escape as raised errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The store could not be reached.
    #[error("storage connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure detail.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("storage query failed: {message}")]
    Query {
        /// Adapter-supplied failure detail.
        message: String,
    },
}

impl StorageError {
    /// Helper for connection-oriented failures.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}
