//! Regression coverage for event creation gating and booking.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use std::sync::Arc;

use super::*;
use crate::domain::ids::{BookingId, MembershipId};
use crate::domain::membership::Membership;
use crate::domain::ports::{
    MockBookingRepository, MockCommunityRepository, MockEventRepository,
};
use crate::domain::user::User;

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).single().expect("valid")
}

fn tomorrow() -> DateTime<Utc> {
    fixture_now() + Duration::days(1)
}

fn yesterday() -> DateTime<Utc> {
    fixture_now() - Duration::days(1)
}

fn service(
    communities: MockCommunityRepository,
    events: MockEventRepository,
    bookings: MockBookingRepository,
) -> EventService<MockCommunityRepository, MockEventRepository, MockBookingRepository>
{
    EventService::new(
        Arc::new(communities),
        Arc::new(events),
        Arc::new(bookings),
        Arc::new(FixtureClock(fixture_now())),
    )
}

fn context_with_scopes(
    community_id: CommunityId,
    scopes: ScopeSet,
) -> UserContext {
    let user = User::new(UserId::new(1), "ada", "Ada", "", fixture_now(), None);
    let membership = Membership::new(
        MembershipId::new(1),
        community_id,
        user.id(),
        fixture_now(),
        scopes,
    );
    UserContext::new(user, vec![membership])
}

fn valid_request(community_id: CommunityId) -> CreateEventRequest {
    CreateEventRequest {
        community_id,
        name: Some("Jam Night".into()),
        description: Some("fun".into()),
        scheduled: Some(tomorrow()),
        venue: Some("The Basement".into()),
        capacity: 40,
    }
}

fn existing_communities(id: CommunityId) -> MockCommunityRepository {
    let mut communities = MockCommunityRepository::new();
    communities
        .expect_exists()
        .returning(move |candidate| Ok(candidate == id));
    communities
}

#[rstest]
#[tokio::test]
async fn validator_collects_every_violation_in_declaration_order() {
    let communities = existing_communities(CommunityId::new(1));
    let request = CreateEventRequest {
        community_id: CommunityId::new(999),
        name: Some(String::new()),
        description: None,
        scheduled: Some(yesterday()),
        venue: Some("The Basement".into()),
        capacity: 40,
    };

    let clock = FixtureClock(fixture_now());
    let result = validate_create_event(&clock, &communities, Some(&request)).await;
    assert!(!result.is_success());
    let messages: Vec<_> = result
        .errors()
        .iter()
        .map(ValidationError::message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Name is null or empty",
            "Description is null or empty",
            "Scheduled date is not in the future",
            "Community not found with id: 999",
        ]
    );
}

#[rstest]
#[tokio::test]
async fn valid_model_produces_an_empty_result() {
    let communities = existing_communities(CommunityId::new(1));
    let clock = FixtureClock(fixture_now());
    let result = validate_create_event(
        &clock,
        &communities,
        Some(&valid_request(CommunityId::new(1))),
    )
    .await;
    assert!(result.is_success());
    assert!(result.errors().is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_model_short_circuits_to_a_single_error() {
    let mut communities = MockCommunityRepository::new();
    communities.expect_exists().times(0);
    let clock = FixtureClock(fixture_now());
    let result = validate_create_event(&clock, &communities, None).await;
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message(), "Model is null");
}

#[rstest]
#[tokio::test]
async fn storage_failure_in_the_lookup_surfaces_the_cause() {
    let mut communities = MockCommunityRepository::new();
    communities
        .expect_exists()
        .return_once(|_| Err(StorageError::query("database unreachable")));
    let clock = FixtureClock(fixture_now());
    let result = validate_create_event(
        &clock,
        &communities,
        Some(&valid_request(CommunityId::new(1))),
    )
    .await;
    assert_eq!(result.errors().len(), 1);
    let message = result.errors()[0].message();
    assert!(message.starts_with("Internal error:"), "got: {message}");
    assert!(message.contains("database unreachable"), "got: {message}");
}

#[rstest]
#[tokio::test]
async fn invalid_model_never_reaches_storage() {
    let communities = existing_communities(CommunityId::new(1));
    let mut events = MockEventRepository::new();
    events.expect_create().times(0);
    let service = service(communities, events, MockBookingRepository::new());

    let context = context_with_scopes(
        CommunityId::new(1),
        ScopeSet::combine([Scope::EventRead, Scope::EventWrite]),
    );
    let request = CreateEventRequest {
        name: None,
        ..valid_request(CommunityId::new(1))
    };
    let result = service.create_event(&context, request).await;
    assert_eq!(result.error().map(CoreError::kind), Some("validation"));
}

#[rstest]
#[tokio::test]
async fn missing_event_write_scope_is_forbidden_and_writes_nothing() {
    let communities = existing_communities(CommunityId::new(1));
    let mut events = MockEventRepository::new();
    events.expect_create().times(0);
    let service = service(communities, events, MockBookingRepository::new());

    let context =
        context_with_scopes(CommunityId::new(1), ScopeSet::from(Scope::EventRead));
    let result = service
        .create_event(&context, valid_request(CommunityId::new(1)))
        .await;
    assert_eq!(result.error(), Some(&EventError::NotPermitted));
}

#[rstest]
#[tokio::test]
async fn superadmin_may_create_events_without_event_write() {
    let communities = existing_communities(CommunityId::new(1));
    let mut events = MockEventRepository::new();
    events.expect_create().times(1).return_once(|new: NewEvent| {
        Ok(Event::new(
            EventId::new(3),
            new.community_id,
            new.name,
            new.description,
            new.venue,
            new.capacity,
            new.scheduled,
            new.created,
        ))
    });
    let service = service(communities, events, MockBookingRepository::new());

    let context =
        context_with_scopes(CommunityId::new(1), ScopeSet::from(Scope::Superadmin));
    let result = service
        .create_event(&context, valid_request(CommunityId::new(1)))
        .await;
    assert!(result.is_success());
}

#[rstest]
#[tokio::test]
async fn created_event_carries_the_request_fields() {
    let communities = existing_communities(CommunityId::new(1));
    let mut events = MockEventRepository::new();
    events
        .expect_create()
        .withf(|new: &NewEvent| {
            new.name == "Jam Night"
                && new.venue == "The Basement"
                && new.capacity == 40
                && new.scheduled == tomorrow()
        })
        .times(1)
        .return_once(|new| {
            Ok(Event::new(
                EventId::new(3),
                new.community_id,
                new.name,
                new.description,
                new.venue,
                new.capacity,
                new.scheduled,
                new.created,
            ))
        });
    let service = service(communities, events, MockBookingRepository::new());

    let context = context_with_scopes(
        CommunityId::new(1),
        ScopeSet::combine([Scope::EventRead, Scope::EventWrite]),
    );
    let result = service
        .create_event(&context, valid_request(CommunityId::new(1)))
        .await;
    let event = result.value().expect("creation succeeds");
    assert_eq!(event.community_id(), CommunityId::new(1));
}

#[rstest]
#[tokio::test]
async fn double_booking_is_rejected() {
    let mut bookings = MockBookingRepository::new();
    let existing = Booking::new(
        BookingId::new(1),
        EventId::new(3),
        UserId::new(7),
        fixture_now(),
        ScopeSet::from(Scope::EventRead),
    );
    bookings
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    bookings.expect_create().times(0);
    let service = service(
        MockCommunityRepository::new(),
        MockEventRepository::new(),
        bookings,
    );

    let result = service.book_event(EventId::new(3), UserId::new(7)).await;
    assert_eq!(
        result.error(),
        Some(&BookingError::AlreadyBooked {
            user_id: UserId::new(7),
            event_id: EventId::new(3),
        })
    );
}

#[rstest]
#[tokio::test]
async fn a_fresh_booking_grants_event_read() {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_find().times(1).return_once(|_, _| Ok(None));
    bookings
        .expect_create()
        .withf(|new: &NewBooking| new.permission == ScopeSet::from(Scope::EventRead))
        .times(1)
        .return_once(|new| {
            Ok(Booking::new(
                BookingId::new(1),
                new.event_id,
                new.user_id,
                new.created,
                new.permission,
            ))
        });
    let service = service(
        MockCommunityRepository::new(),
        MockEventRepository::new(),
        bookings,
    );

    let result = service.book_event(EventId::new(3), UserId::new(7)).await;
    let booking = result.value().expect("booking succeeds");
    assert!(booking.permission().has(Scope::EventRead));
}

#[rstest]
#[tokio::test]
async fn cancelling_an_absent_booking_reports_false() {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_delete().times(1).return_once(|_, _| Ok(false));
    let service = service(
        MockCommunityRepository::new(),
        MockEventRepository::new(),
        bookings,
    );

    let result = service.cancel_booking(EventId::new(3), UserId::new(7)).await;
    assert_eq!(result.value(), Some(&false));
}
