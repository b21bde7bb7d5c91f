//! Capability scopes and the permission bitmask codec.
//!
//! A [`Scope`] names a single capability a user may hold within one
//! community. Grants are persisted as a single integer bitmask, so each
//! scope owns a stable power-of-two bit; [`ScopeSet`] wraps that integer
//! and provides the combine/test/remove/decode operations. The bit table
//! must never be renumbered: previously stored permission integers are
//! decoded against it.

use serde::{Deserialize, Serialize};

/// A single named capability.
///
/// Variants carry stable bit values for storage:
/// `Superadmin = 1`, `EventRead = 2`, `EventWrite = 4`,
/// `CommunityRead = 8`, `CommunityWrite = 16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Overrides every per-community check; holders pass any authorization
    /// gate regardless of which scopes were requested.
    Superadmin,
    /// Read event data.
    EventRead,
    /// Create or modify event data.
    EventWrite,
    /// Read community data.
    CommunityRead,
    /// Create or modify community data.
    CommunityWrite,
}

impl Scope {
    /// Every known scope, in bit order.
    pub const ALL: [Self; 5] = [
        Self::Superadmin,
        Self::EventRead,
        Self::EventWrite,
        Self::CommunityRead,
        Self::CommunityWrite,
    ];

    /// The scope's bit value inside a persisted mask.
    #[must_use]
    pub const fn bit(self) -> i64 {
        match self {
            Self::Superadmin => 1,
            Self::EventRead => 1 << 1,
            Self::EventWrite => 1 << 2,
            Self::CommunityRead => 1 << 3,
            Self::CommunityWrite => 1 << 4,
        }
    }

    /// Stable lowercase name used in logs and serialized grants.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::EventRead => "event_read",
            Self::EventWrite => "event_write",
            Self::CommunityRead => "community_read",
            Self::CommunityWrite => "community_write",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised when interpreting raw mask integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScopeMaskError {
    /// Masks are non-negative by contract; a negative value is corrupt.
    #[error("scope mask must be non-negative, got {value}")]
    Negative {
        /// The offending raw value.
        value: i64,
    },
    /// The value is not the bit of any known scope.
    #[error("no scope has bit value {value}")]
    UnknownBit {
        /// The offending raw value.
        value: i64,
    },
}

impl TryFrom<i64> for Scope {
    type Error = ScopeMaskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.bit() == value)
            .ok_or(ScopeMaskError::UnknownBit { value })
    }
}

/// A set of [`Scope`]s encoded as a single integer bitmask.
///
/// ## Invariants
/// - Combining is bitwise OR: associative, commutative, duplicate-safe.
/// - Removing a scope clears exactly its bit and leaves every other bit
///   untouched.
/// - Bits that do not correspond to a known scope are preserved in the
///   integer but ignored by [`ScopeSet::decode`], so masks written by a
///   newer scope table round-trip through an older one.
///
/// # Examples
/// ```
/// use soundlink_scopes::{Scope, ScopeSet};
///
/// let mask = ScopeSet::combine([Scope::EventRead, Scope::EventWrite]);
/// assert_eq!(mask.bits(), 6);
/// assert!(mask.has(Scope::EventWrite));
/// assert!(!mask.has(Scope::Superadmin));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScopeSet(i64);

impl ScopeSet {
    /// The empty grant: no scopes at all.
    pub const EMPTY: Self = Self(0);

    /// Combine scopes into a single mask. An empty input yields
    /// [`ScopeSet::EMPTY`].
    #[must_use]
    pub fn combine(scopes: impl IntoIterator<Item = Scope>) -> Self {
        scopes.into_iter().fold(Self::EMPTY, Self::with)
    }

    /// Reinterpret a persisted mask.
    ///
    /// # Errors
    /// Returns [`ScopeMaskError::Negative`] for negative values; every
    /// non-negative integer is a valid mask.
    pub const fn from_bits(bits: i64) -> Result<Self, ScopeMaskError> {
        if bits < 0 {
            return Err(ScopeMaskError::Negative { value: bits });
        }
        Ok(Self(bits))
    }

    /// The raw integer form, suitable for storage.
    #[must_use]
    pub const fn bits(self) -> i64 {
        self.0
    }

    /// Whether the scope's bit is set.
    #[must_use]
    pub const fn has(self, scope: Scope) -> bool {
        self.0 & scope.bit() != 0
    }

    /// A copy of the mask with the scope's bit set.
    #[must_use]
    pub const fn with(self, scope: Scope) -> Self {
        Self(self.0 | scope.bit())
    }

    /// A copy of the mask with the scope's bit cleared. All other bits are
    /// untouched.
    #[must_use]
    pub const fn remove(self, scope: Scope) -> Self {
        Self(self.0 & !scope.bit())
    }

    /// Whether every listed scope is present. An empty slice is trivially
    /// satisfied.
    #[must_use]
    pub fn contains_all(self, required: &[Scope]) -> bool {
        required.iter().all(|&scope| self.has(scope))
    }

    /// The known scopes present in the mask, in bit order. Unknown bits are
    /// silently ignored.
    #[must_use]
    pub fn decode(self) -> Vec<Scope> {
        Scope::ALL
            .into_iter()
            .filter(|&scope| self.has(scope))
            .collect()
    }

    /// Whether no known or unknown bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self::combine(iter)
    }
}

impl From<Scope> for ScopeSet {
    fn from(scope: Scope) -> Self {
        Self::EMPTY.with(scope)
    }
}

impl std::fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for scope in self.decode() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(scope.name())?;
            first = false;
        }
        if first {
            f.write_str("(none)")?;
        }
        Ok(())
    }
}
