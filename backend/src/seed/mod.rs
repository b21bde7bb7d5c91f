//! Demo deployment wiring and startup seeding.
//!
//! The demo deployment runs the real services against the in-memory
//! adapters; seeding provisions its data through the public service API,
//! so every seeded row has passed the same validation and authorization
//! gates as production traffic. The one exception is the superadmin
//! bootstrap grant, which necessarily happens below the service layer —
//! there is nobody holding `community_write` yet who could issue it.

mod config;

pub use config::SeedSettings;

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use soundlink_scopes::{Scope, ScopeSet};

use crate::domain::ports::{
    InMemoryBookingRepository, InMemoryCommunityRepository,
    InMemoryEventRepository, InMemoryMembershipRepository,
    InMemoryUserRepository, MembershipRepository, StorageError,
};
use crate::domain::{
    AuthResult, Community, CommunityService, CoreError, CoreResult,
    CreateCommunityRequest, CreateEventRequest, EventService, LoginRequest,
    LoginService, RegisterRequest, User, UserContext,
};

/// Every demo account authenticates with this password.
pub const DEMO_PASSWORD: &str = "password";

const DEMO_COMMUNITIES: [(&str, &str, &str); 4] = [
    ("Troubleshooters", "Late night jam sessions for busy hands", "Jazz"),
    ("Garage Door", "Punk rehearsals in an actual garage", "Punk"),
    ("String Theory", "Chamber players who argue about tuning", "Classical"),
    ("Low End", "Bass-heavy production nights", "Electronic"),
];

const DEMO_USERS: [&str; 3] = ["ada", "grace", "edsger"];

/// The full service stack wired against the in-memory adapters.
pub struct DemoDeployment {
    /// Authentication service.
    pub login: LoginService<InMemoryUserRepository, InMemoryMembershipRepository>,
    /// Community service.
    pub communities:
        CommunityService<InMemoryCommunityRepository, InMemoryMembershipRepository>,
    /// Event service.
    pub events: EventService<
        InMemoryCommunityRepository,
        InMemoryEventRepository,
        InMemoryBookingRepository,
    >,
    /// Backing membership store, exposed for the bootstrap grant.
    pub membership_store: Arc<InMemoryMembershipRepository>,
    clock: Arc<dyn Clock>,
}

impl DemoDeployment {
    /// Wire the services against fresh in-memory stores.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let user_store = Arc::new(InMemoryUserRepository::default());
        let community_store = Arc::new(InMemoryCommunityRepository::default());
        let membership_store = Arc::new(InMemoryMembershipRepository::default());
        let event_store = Arc::new(InMemoryEventRepository::default());
        let booking_store = Arc::new(InMemoryBookingRepository::default());

        Self {
            login: LoginService::new(
                user_store,
                Arc::clone(&membership_store),
                Arc::clone(&clock),
            ),
            communities: CommunityService::new(
                Arc::clone(&community_store),
                Arc::clone(&membership_store),
                Arc::clone(&clock),
            ),
            events: EventService::new(
                community_store,
                event_store,
                booking_store,
                Arc::clone(&clock),
            ),
            membership_store,
            clock,
        }
    }

    /// Log a demo account in with the shared demo password.
    pub async fn login_as(&self, username: &str) -> AuthResult<UserContext> {
        self.login
            .login(LoginRequest {
                username: Some(username.to_owned()),
                password: Some(Zeroizing::new(DEMO_PASSWORD.to_owned())),
            })
            .await
    }
}

/// What seeding provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Accounts created, the admin included.
    pub users: usize,
    /// Communities created.
    pub communities: usize,
    /// Events created.
    pub events: usize,
}

/// Errors returned while executing startup seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// A service operation came back with a failure envelope.
    #[error("seeding failed during {stage}: {message}")]
    Operation {
        /// The seeding step that failed.
        stage: &'static str,
        /// The failed operation's error message.
        message: String,
    },
    /// The backing store failed directly.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn unwrap_envelope<T, E>(
    stage: &'static str,
    result: CoreResult<T, E>,
) -> Result<T, SeedError>
where
    E: CoreError,
{
    result.into_result().map_err(|error| SeedError::Operation {
        stage,
        message: error.to_string(),
    })
}

/// Apply demo data on startup when enabled.
///
/// Provisions the superadmin account, demo users, communities (creator
/// signed up automatically), memberships, and one upcoming event per
/// community. Returns `None` when seeding is disabled.
pub async fn seed_demo_data(
    deployment: &DemoDeployment,
    settings: &SeedSettings,
) -> Result<Option<SeedSummary>, SeedError> {
    if !settings.enabled {
        info!(reason = "disabled", "demo seeding skipped");
        return Ok(None);
    }

    let admin = register_account(
        deployment,
        settings.admin_username(),
        Some("SoundLink Admin"),
    )
    .await?;
    let admin_context = unwrap_envelope(
        "admin login",
        deployment.login_as(settings.admin_username()).await,
    )?;

    let count = settings.community_count().min(DEMO_COMMUNITIES.len());
    let mut communities: Vec<Community> = Vec::with_capacity(count);
    for (name, description, genre) in DEMO_COMMUNITIES.iter().take(count) {
        let community = unwrap_envelope(
            "create community",
            deployment
                .communities
                .create_community(
                    &admin_context,
                    CreateCommunityRequest {
                        name: Some((*name).to_owned()),
                        description: Some((*description).to_owned()),
                        genre: Some((*genre).to_owned()),
                        is_private: false,
                    },
                )
                .await,
        )?;

        // Bootstrap: promote the creator membership to the override grant.
        let promoted = deployment
            .membership_store
            .update_permission(
                admin.id(),
                community.id(),
                ScopeSet::from(Scope::Superadmin),
            )
            .await?;
        if promoted.is_none() {
            return Err(SeedError::Operation {
                stage: "bootstrap superadmin",
                message: format!(
                    "admin has no membership in community {}",
                    community.id()
                ),
            });
        }

        communities.push(community);
    }

    let mut users: Vec<User> = Vec::with_capacity(DEMO_USERS.len());
    for username in DEMO_USERS {
        let user = register_account(deployment, username, None).await?;
        for community in &communities {
            unwrap_envelope(
                "join community",
                deployment
                    .communities
                    .join_community(user.id(), community.id())
                    .await,
            )?;
        }
        users.push(user);
    }

    // A fresh context carries the bootstrap grants the first login missed.
    let admin_context = unwrap_envelope(
        "admin login",
        deployment.login_as(settings.admin_username()).await,
    )?;
    let mut events = 0_usize;
    for community in &communities {
        unwrap_envelope(
            "create event",
            deployment
                .events
                .create_event(
                    &admin_context,
                    CreateEventRequest {
                        community_id: community.id(),
                        name: Some(format!("{} live night", community.name())),
                        description: Some("Seeded showcase event".to_owned()),
                        scheduled: Some(deployment.clock.utc() + Duration::days(7)),
                        venue: Some("Main stage".to_owned()),
                        capacity: 80,
                    },
                )
                .await,
        )?;
        events += 1;
    }

    let summary = SeedSummary {
        users: users.len() + 1,
        communities: communities.len(),
        events,
    };
    info!(
        users = summary.users,
        communities = summary.communities,
        events = summary.events,
        "demo data seeded"
    );
    Ok(Some(summary))
}

async fn register_account(
    deployment: &DemoDeployment,
    username: &str,
    display_name: Option<&str>,
) -> Result<User, SeedError> {
    unwrap_envelope(
        "register account",
        deployment
            .login
            .register(RegisterRequest {
                username: Some(username.to_owned()),
                password: Some(Zeroizing::new(DEMO_PASSWORD.to_owned())),
                display_name: display_name.map(str::to_owned),
            })
            .await,
    )
}
