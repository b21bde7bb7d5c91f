//! Integer identifier newtypes for the core entities.
//!
//! Persisted rows carry plain integer keys; wrapping them keeps a user id
//! from being passed where a community id belongs. The wrappers serialize
//! as bare integers so stored data is unaffected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw storage key.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// The raw storage key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Key of a registered user.
    UserId
);
define_id!(
    /// Key of a community.
    CommunityId
);
define_id!(
    /// Key of an event.
    EventId
);
define_id!(
    /// Key of a membership row.
    MembershipId
);
define_id!(
    /// Key of a booking row.
    BookingId
);
