//! Demo harness: wires the service stack against the in-memory adapters,
//! seeds demo data, and walks the documented flows, logging each result
//! envelope as it would serialize across an RPC boundary.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use soundlink::domain::{CoreError, CreateEventRequest};
use soundlink::scopes::{Scope, ScopeSet};
use soundlink::seed::{DemoDeployment, SeedSettings, seed_demo_data};

/// `soundlink-demo` command arguments. Environment configuration
/// (`SOUNDLINK_SEED_*`) supplies defaults; flags override it.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "soundlink-demo",
    about = "Seed an in-memory SoundLink deployment and walk the core flows",
    version
)]
struct CliArgs {
    /// Username of the provisioned superadmin account.
    #[arg(long = "admin-username", value_name = "name")]
    admin_username: Option<String>,
    /// Number of demo communities to create.
    #[arg(long = "communities", value_name = "count")]
    communities: Option<usize>,
}

fn io_error(message: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(message.to_string())
}

fn load_settings(args: &CliArgs) -> std::io::Result<SeedSettings> {
    let mut settings = SeedSettings::load_from_iter([OsString::from("soundlink-demo")])
        .map_err(|e| io_error(format!("failed to load seed settings: {e}")))?;
    // The harness exists to show seeded flows; seeding is always on here.
    settings.enabled = true;
    if args.admin_username.is_some() {
        settings.admin_username = args.admin_username.clone();
    }
    if args.communities.is_some() {
        settings.count = args.communities;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io_error)?;
    let settings = load_settings(&args)?;

    let clock = Arc::new(DefaultClock);
    let deployment = DemoDeployment::new(clock.clone());
    seed_demo_data(&deployment, &settings)
        .await
        .map_err(io_error)?;

    let fan = deployment
        .login_as("ada")
        .await
        .into_result()
        .map_err(io_error)?;
    let community_id = fan
        .memberships()
        .first()
        .map(|membership| membership.community_id())
        .ok_or_else(|| io_error("seeded fan has no memberships"))?;

    // Default members hold event_write, so creation passes both gates.
    let created = deployment
        .events
        .create_event(
            &fan,
            CreateEventRequest {
                community_id,
                name: Some("Open mic".to_owned()),
                description: Some("Bring your own amp".to_owned()),
                scheduled: Some(clock.utc() + chrono::Duration::days(3)),
                venue: Some("Back room".to_owned()),
                capacity: 25,
            },
        )
        .await;
    info!(
        envelope = %serde_json::to_string(&created).map_err(io_error)?,
        "create event"
    );

    if let Some(event) = created.value() {
        let booked = deployment
            .events
            .book_event(event.id(), fan.user().id())
            .await;
        info!(
            envelope = %serde_json::to_string(&booked).map_err(io_error)?,
            "first booking"
        );

        let duplicate = deployment
            .events
            .book_event(event.id(), fan.user().id())
            .await;
        info!(
            envelope = %serde_json::to_string(&duplicate).map_err(io_error)?,
            "duplicate booking"
        );
    }

    // Permission management needs community_write; a default member is
    // turned away with the generic forbidden outcome.
    let denied = deployment
        .communities
        .grant_scopes(
            &fan,
            fan.user().id(),
            community_id,
            ScopeSet::from(Scope::CommunityWrite),
        )
        .await;
    info!(
        kind = denied.error().map(CoreError::kind),
        "grant without community_write"
    );

    Ok(())
}
