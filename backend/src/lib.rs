//! SoundLink backend library modules.

pub mod domain;
pub mod seed;

/// Capability scopes and the permission bitmask codec.
pub use soundlink_scopes as scopes;
