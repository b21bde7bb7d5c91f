//! Regression coverage for community creation and sign-up.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use soundlink_scopes::{Scope, ScopeSet};
use std::sync::Arc;

use super::*;
use crate::domain::ids::MembershipId;
use crate::domain::ports::{
    MockCommunityRepository, MockMembershipRepository,
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

fn service(
    communities: MockCommunityRepository,
    memberships: MockMembershipRepository,
) -> CommunityService<MockCommunityRepository, MockMembershipRepository> {
    CommunityService::new(
        Arc::new(communities),
        Arc::new(memberships),
        Arc::new(FixtureClock(fixture_now())),
    )
}

fn creator_context() -> UserContext {
    let user = User::new(UserId::new(42), "ada", "Ada", "", fixture_now(), None);
    UserContext::new(user, Vec::new())
}

fn valid_request() -> CreateCommunityRequest {
    CreateCommunityRequest {
        name: Some("Troubleshooters".into()),
        description: Some("Late night jam sessions".into()),
        genre: Some("Jazz".into()),
        is_private: false,
    }
}

fn membership_row(new: NewMembership) -> Membership {
    Membership::new(
        MembershipId::new(1),
        new.community_id,
        new.user_id,
        new.created,
        new.permission,
    )
}

#[rstest]
fn validator_reports_every_missing_field_in_order() {
    let request = CreateCommunityRequest::default();
    let result = validate_create_community(Some(&request));
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
            "Genre is null or empty",
        ]
    );
}

#[rstest]
fn validator_short_circuits_on_a_missing_model() {
    let result = validate_create_community(None);
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message(), "Model is null");
}

#[rstest]
#[tokio::test]
async fn invalid_model_writes_nothing() {
    let mut communities = MockCommunityRepository::new();
    communities.expect_create().times(0);
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_create().times(0);
    let service = service(communities, memberships);

    let result = service
        .create_community(&creator_context(), CreateCommunityRequest::default())
        .await;
    let error = result.error().expect("validation fails");
    assert_eq!(error.kind(), "validation");
}

#[rstest]
#[tokio::test]
async fn creation_signs_the_creator_up_with_the_default_grant() {
    let mut communities = MockCommunityRepository::new();
    communities
        .expect_create()
        .times(1)
        .return_once(|new: NewCommunity| {
            Ok(Community::new(
                CommunityId::new(9),
                new.name,
                new.description,
                new.genre,
                new.created,
                new.is_private,
            ))
        });
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_find().times(1).return_once(|_, _| Ok(None));
    memberships
        .expect_create()
        .withf(|new: &NewMembership| {
            new.user_id == UserId::new(42)
                && new.community_id == CommunityId::new(9)
                && new.permission == DEFAULT_MEMBER_SCOPES
        })
        .times(1)
        .return_once(|new| Ok(membership_row(new)));
    let service = service(communities, memberships);

    let result = service
        .create_community(&creator_context(), valid_request())
        .await;
    let community = result.value().expect("creation succeeds");
    assert_eq!(community.name(), "Troubleshooters");
}

#[rstest]
#[tokio::test]
async fn joining_twice_is_rejected_and_nothing_is_inserted() {
    let mut memberships = MockMembershipRepository::new();
    let existing = membership_row(NewMembership {
        community_id: CommunityId::new(5),
        user_id: UserId::new(7),
        permission: DEFAULT_MEMBER_SCOPES,
        created: fixture_now(),
    });
    memberships
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    memberships.expect_create().times(0);
    let service = service(MockCommunityRepository::new(), memberships);

    let result = service
        .join_community(UserId::new(7), CommunityId::new(5))
        .await;
    assert_eq!(
        result.error(),
        Some(&CommunityError::AlreadyMember {
            user_id: UserId::new(7),
            community_id: CommunityId::new(5),
        })
    );
}

#[rstest]
#[tokio::test]
async fn new_members_receive_event_read_and_event_write() {
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_find().times(1).return_once(|_, _| Ok(None));
    memberships
        .expect_create()
        .times(1)
        .return_once(|new| Ok(membership_row(new)));
    let service = service(MockCommunityRepository::new(), memberships);

    let result = service
        .join_community(UserId::new(7), CommunityId::new(5))
        .await;
    let membership = result.value().expect("join succeeds");
    assert_eq!(membership.permission().bits(), 6);
    assert!(membership.permission().has(Scope::EventRead));
    assert!(membership.permission().has(Scope::EventWrite));
    assert!(!membership.permission().has(Scope::CommunityWrite));
}

#[rstest]
#[tokio::test]
async fn leaving_without_a_membership_reports_false() {
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_delete().times(1).return_once(|_, _| Ok(false));
    let service = service(MockCommunityRepository::new(), memberships);

    let result = service
        .leave_community(UserId::new(7), CommunityId::new(5))
        .await;
    assert_eq!(result.value(), Some(&false));
}

fn admin_context(community_id: CommunityId) -> UserContext {
    let user = User::new(UserId::new(1), "root", "Root", "", fixture_now(), None);
    let membership = Membership::new(
        MembershipId::new(1),
        community_id,
        user.id(),
        fixture_now(),
        ScopeSet::from(Scope::CommunityWrite),
    );
    UserContext::new(user, vec![membership])
}

#[rstest]
#[tokio::test]
async fn granting_scopes_requires_community_write() {
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_update_permission().times(0);
    let service = service(MockCommunityRepository::new(), memberships);

    let result = service
        .grant_scopes(
            &creator_context(),
            UserId::new(7),
            CommunityId::new(5),
            ScopeSet::from(Scope::CommunityRead),
        )
        .await;
    assert_eq!(result.error(), Some(&CommunityError::NotPermitted));
}

#[rstest]
#[tokio::test]
async fn granting_scopes_replaces_the_member_grant() {
    let granted = ScopeSet::combine([Scope::CommunityRead, Scope::CommunityWrite]);
    let mut memberships = MockMembershipRepository::new();
    memberships
        .expect_update_permission()
        .withf(move |user_id, community_id, scopes| {
            *user_id == UserId::new(7)
                && *community_id == CommunityId::new(5)
                && *scopes == granted
        })
        .times(1)
        .return_once(move |user_id, community_id, scopes| {
            Ok(Some(Membership::new(
                MembershipId::new(2),
                community_id,
                user_id,
                fixture_now(),
                scopes,
            )))
        });
    let service = service(MockCommunityRepository::new(), memberships);

    let result = service
        .grant_scopes(
            &admin_context(CommunityId::new(5)),
            UserId::new(7),
            CommunityId::new(5),
            granted,
        )
        .await;
    let membership = result.value().expect("grant succeeds");
    assert_eq!(membership.permission(), granted);
}

#[rstest]
#[tokio::test]
async fn granting_to_a_non_member_fails() {
    let mut memberships = MockMembershipRepository::new();
    memberships
        .expect_update_permission()
        .times(1)
        .return_once(|_, _, _| Ok(None));
    let service = service(MockCommunityRepository::new(), memberships);

    let result = service
        .grant_scopes(
            &admin_context(CommunityId::new(5)),
            UserId::new(7),
            CommunityId::new(5),
            ScopeSet::from(Scope::CommunityRead),
        )
        .await;
    assert_eq!(
        result.error(),
        Some(&CommunityError::NotMember {
            user_id: UserId::new(7),
            community_id: CommunityId::new(5),
        })
    );
}

#[rstest]
#[tokio::test]
async fn member_scopes_default_to_empty_for_non_members() {
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_find().times(1).return_once(|_, _| Ok(None));
    let service = service(MockCommunityRepository::new(), memberships);

    let scopes = service
        .member_scopes(UserId::new(7), CommunityId::new(5))
        .await
        .expect("lookup succeeds");
    assert_eq!(scopes, ScopeSet::EMPTY);
}
