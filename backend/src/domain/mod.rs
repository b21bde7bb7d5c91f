//! Domain core: identity, scoped authorization, validation, and the
//! services built on them.
//!
//! Purpose: every mutating operation flows through the same pipeline —
//! validate the request model, check the acting user's scopes for the
//! target community, and only then touch storage through a port. Failures
//! are data ([`CoreResult`], [`ValidationResult`]); nothing here raises
//! across the service boundary.
//!
//! Public surface, leaf-first:
//! - [`ids`] — integer key newtypes.
//! - [`result`] — the [`CoreResult`] envelope and [`CoreError`] taxonomy
//!   trait.
//! - [`validation`] — atomic checks and the [`ensure`](validation::ensure)
//!   aggregator.
//! - [`membership`] / [`context`] / [`authorization`] — per-community
//!   scope resolution and the authorization checker.
//! - [`login_service`] / [`community_service`] / [`event_service`] — the
//!   domain services.
//! - [`ports`] — storage traits the services are injected with.

pub mod authorization;
pub mod booking;
pub mod community;
pub mod community_service;
pub mod context;
pub mod event;
pub mod event_service;
pub mod ids;
pub mod login_service;
pub mod membership;
pub mod ports;
pub mod result;
pub mod user;
pub mod validation;

pub use self::authorization::{AuthError, AuthResult, authorize, is_authorized};
pub use self::booking::{Booking, NewBooking};
pub use self::community::{Community, NewCommunity};
pub use self::community_service::{
    CommunityError, CommunityService, CreateCommunityRequest,
    validate_create_community,
};
pub use self::context::UserContext;
pub use self::event::{Event, NewEvent};
pub use self::event_service::{
    BookingError, CreateEventRequest, EventBookingResult, EventError,
    EventService, validate_create_event,
};
pub use self::ids::{BookingId, CommunityId, EventId, MembershipId, UserId};
pub use self::login_service::{
    LoginRequest, LoginService, RegisterRequest, validate_login,
    validate_register,
};
pub use self::membership::{DEFAULT_MEMBER_SCOPES, Membership, NewMembership};
pub use self::result::{CoreError, CoreResult};
pub use self::user::{NewUser, User};
pub use self::validation::{ValidationError, ValidationFailure, ValidationResult};
