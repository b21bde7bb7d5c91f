//! Authentication use-cases: login and registration.
//!
//! Login resolves the user's memberships and returns a fresh
//! [`UserContext`]; there is no session holder to install it into — the
//! caller owns the context and drops it to log out. Credential failures
//! are deliberately indistinguishable between unknown-username and
//! wrong-password.

use std::sync::Arc;

use mockable::Clock;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::authorization::{AuthError, AuthResult};
use super::context::UserContext;
use super::ports::{MembershipRepository, UserRepository};
use super::result::CoreResult;
use super::user::{NewUser, User};
use super::validation::{
    ValidationError, ValidationResult, ensure, if_present, not_empty,
};

/// Raw login form input. Fields are optional because the input arrives
/// unvalidated; the validator reports absences.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Login name.
    pub username: Option<String>,
    /// Plain-text password, wiped from memory on drop.
    pub password: Option<Zeroizing<String>>,
}

/// Raw registration form input.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Requested login name.
    pub username: Option<String>,
    /// Plain-text password, wiped from memory on drop.
    pub password: Option<Zeroizing<String>>,
    /// Optional display name; the username stands in when absent.
    pub display_name: Option<String>,
}

/// Validate a login model: both credential fields must have values.
#[must_use]
pub fn validate_login(model: Option<&LoginRequest>) -> ValidationResult {
    let Some(model) = model else {
        return ValidationResult::single(ValidationError::new("Login model is null"));
    };
    ensure([
        not_empty("Username", model.username.as_deref()),
        not_empty("Password", model.password.as_ref().map(|p| p.as_str())),
    ])
}

/// Validate a registration model. The display name is optional, but when
/// supplied it must not be empty.
#[must_use]
pub fn validate_register(model: Option<&RegisterRequest>) -> ValidationResult {
    let Some(model) = model else {
        return ValidationResult::single(ValidationError::new("Register model is null"));
    };
    ensure([
        not_empty("Username", model.username.as_deref()),
        not_empty("Password", model.password.as_ref().map(|p| p.as_str())),
        if_present("Display name", model.display_name.as_ref(), |name, value| {
            not_empty(name, Some(value.as_str()))
        }),
    ])
}

/// Authentication service over the user and membership stores.
#[derive(Clone)]
pub struct LoginService<U, M> {
    users: Arc<U>,
    memberships: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<U, M> LoginService<U, M> {
    /// Create a new service with the given stores and clock.
    pub fn new(users: Arc<U>, memberships: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            memberships,
            clock,
        }
    }
}

impl<U, M> LoginService<U, M>
where
    U: UserRepository,
    M: MembershipRepository,
{
    /// Authenticate credentials and resolve the caller's context.
    ///
    /// On success the returned [`UserContext`] carries the user (with the
    /// login timestamp just stamped) and every membership they hold.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<UserContext> {
        if !validate_login(Some(&request)).is_success() {
            return CoreResult::Failure(AuthError::MalformedCredentials);
        }
        let (Some(username), Some(password)) =
            (request.username.as_deref(), request.password.as_ref())
        else {
            return CoreResult::Failure(AuthError::MalformedCredentials);
        };

        let user = match self.users.find_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(username, "login attempt for unknown user");
                return CoreResult::Failure(AuthError::InvalidCredentials);
            }
            Err(error) => {
                return CoreResult::Failure(AuthError::storage(error.to_string()));
            }
        };
        if !verify_password(password, user.hashed_password()) {
            warn!(user_id = user.id().get(), "login attempt with bad password");
            return CoreResult::Failure(AuthError::InvalidCredentials);
        }

        let now = self.clock.utc();
        if let Err(error) = self.users.record_login(user.id(), now).await {
            return CoreResult::Failure(AuthError::storage(error.to_string()));
        }
        let memberships = match self.memberships.memberships_for_user(user.id()).await
        {
            Ok(memberships) => memberships,
            Err(error) => {
                return CoreResult::Failure(AuthError::storage(error.to_string()));
            }
        };

        info!(user_id = user.id().get(), "user logged in");
        CoreResult::Success(UserContext::new(user.with_last_login(now), memberships))
    }

    /// Register a new user.
    ///
    /// The username must be unused; the display name defaults to the
    /// username when not supplied.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        if !validate_register(Some(&request)).is_success() {
            return CoreResult::Failure(AuthError::MalformedCredentials);
        }
        let (Some(username), Some(password)) =
            (request.username.clone(), request.password.as_ref())
        else {
            return CoreResult::Failure(AuthError::MalformedCredentials);
        };

        match self.users.find_by_username(&username).await {
            Ok(Some(_)) => return CoreResult::Failure(AuthError::AlreadyRegistered),
            Ok(None) => {}
            Err(error) => {
                return CoreResult::Failure(AuthError::storage(error.to_string()));
            }
        }

        let display_name = request
            .display_name
            .clone()
            .unwrap_or_else(|| username.clone());
        let new_user = NewUser {
            username,
            display_name,
            hashed_password: hash_password(password),
            created: self.clock.utc(),
        };
        match self.users.create(new_user).await {
            Ok(user) => {
                info!(user_id = user.id().get(), "user registered");
                CoreResult::Success(user)
            }
            Err(error) => CoreResult::Failure(AuthError::storage(error.to_string())),
        }
    }
}

/// Digest a password with a fresh random salt. Stored form:
/// `hex(salt)$hex(sha256(salt || password))`.
fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Check a plain-text password against the stored salted digest. Any
/// malformed stored value simply fails verification.
fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    salted_digest(&salt, password).as_slice() == expected.as_slice()
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    //! Credential handling and context resolution.
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;
    use soundlink_scopes::{Scope, ScopeSet};

    use super::*;
    use crate::domain::ids::{CommunityId, MembershipId, UserId};
    use crate::domain::membership::Membership;
    use crate::domain::ports::{
        MockMembershipRepository, MockUserRepository, StorageError,
    };

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
        users: MockUserRepository,
        memberships: MockMembershipRepository,
    ) -> LoginService<MockUserRepository, MockMembershipRepository> {
        LoginService::new(
            Arc::new(users),
            Arc::new(memberships),
            Arc::new(FixtureClock(fixture_now())),
        )
    }

    fn stored_user(id: i64, username: &str, password: &str) -> User {
        User::new(
            UserId::new(id),
            username,
            username,
            hash_password(password),
            fixture_now(),
            None,
        )
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_owned()),
            password: Some(Zeroizing::new(password.to_owned())),
        }
    }

    #[rstest]
    fn password_digest_round_trips() {
        let stored = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[rstest]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw"), hash_password("pw"));
    }

    #[rstest]
    #[case(None, Some("pw"))]
    #[case(Some(""), Some("pw"))]
    #[case(Some("ada"), None)]
    #[case(Some("ada"), Some(""))]
    #[tokio::test]
    async fn malformed_credentials_are_rejected_without_lookup(
        #[case] username: Option<&str>,
        #[case] password: Option<&str>,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(0);
        let service = service(users, MockMembershipRepository::new());

        let request = LoginRequest {
            username: username.map(str::to_owned),
            password: password.map(|p| Zeroizing::new(p.to_owned())),
        };
        let result = service.login(request).await;
        assert_eq!(result.error(), Some(&AuthError::MalformedCredentials));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_identical() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|username| match username {
                "ada" => Ok(Some(stored_user(1, "ada", "secret"))),
                _ => Ok(None),
            });
        let service = service(users, MockMembershipRepository::new());

        let unknown = service.login(login_request("grace", "secret")).await;
        let wrong = service.login(login_request("ada", "nope")).await;
        assert_eq!(unknown.error(), Some(&AuthError::InvalidCredentials));
        assert_eq!(wrong.error(), Some(&AuthError::InvalidCredentials));
    }

    #[rstest]
    #[tokio::test]
    async fn successful_login_builds_a_context_with_memberships() {
        let user = stored_user(7, "ada", "secret");
        let membership = Membership::new(
            MembershipId::new(1),
            CommunityId::new(5),
            UserId::new(7),
            fixture_now(),
            ScopeSet::from(Scope::CommunityRead),
        );

        let mut users = MockUserRepository::new();
        let found = user.clone();
        users
            .expect_find_by_username()
            .times(1)
            .return_once(move |_| Ok(Some(found)));
        users
            .expect_record_login()
            .withf(|id, at| *id == UserId::new(7) && *at == fixture_now())
            .times(1)
            .return_once(|_, _| Ok(()));

        let mut memberships = MockMembershipRepository::new();
        let rows = vec![membership.clone()];
        memberships
            .expect_memberships_for_user()
            .times(1)
            .return_once(move |_| Ok(rows));

        let service = service(users, memberships);
        let result = service.login(login_request("ada", "secret")).await;
        let context = result.value().expect("login succeeds");
        assert_eq!(context.user().last_login(), Some(fixture_now()));
        assert_eq!(
            context.scopes_for(CommunityId::new(5)),
            ScopeSet::from(Scope::CommunityRead)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn membership_lookup_failure_surfaces_the_cause() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(|_| Ok(Some(stored_user(1, "ada", "secret"))));
        users.expect_record_login().return_once(|_, _| Ok(()));
        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_memberships_for_user()
            .return_once(|_| Err(StorageError::connection("db unreachable")));

        let service = service(users, memberships);
        let result = service.login(login_request("ada", "secret")).await;
        let error = result.error().expect("storage failure").to_string();
        assert!(error.contains("db unreachable"), "got: {error}");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_registration_is_rejected_without_insert() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(|_| Ok(Some(stored_user(1, "ada", "secret"))));
        users.expect_create().times(0);
        let service = service(users, MockMembershipRepository::new());

        let request = RegisterRequest {
            username: Some("ada".into()),
            password: Some(Zeroizing::new("secret".into())),
            display_name: None,
        };
        let result = service.register(request).await;
        assert_eq!(result.error(), Some(&AuthError::AlreadyRegistered));
    }

    #[rstest]
    #[tokio::test]
    async fn registration_defaults_the_display_name_to_the_username() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));
        users
            .expect_create()
            .withf(|new: &NewUser| {
                new.username == "ada"
                    && new.display_name == "ada"
                    && verify_password("secret", &new.hashed_password)
            })
            .times(1)
            .return_once(|new| {
                Ok(User::new(
                    UserId::new(1),
                    new.username,
                    new.display_name,
                    new.hashed_password,
                    new.created,
                    None,
                ))
            });
        let service = service(users, MockMembershipRepository::new());

        let request = RegisterRequest {
            username: Some("ada".into()),
            password: Some(Zeroizing::new("secret".into())),
            display_name: None,
        };
        let result = service.register(request).await;
        assert!(result.is_success());
    }

    #[rstest]
    fn register_validator_accepts_absent_display_name_but_not_empty() {
        let base = RegisterRequest {
            username: Some("ada".into()),
            password: Some(Zeroizing::new("secret".into())),
            display_name: None,
        };
        assert!(validate_register(Some(&base)).is_success());

        let empty_display = RegisterRequest {
            display_name: Some(String::new()),
            ..base
        };
        let result = validate_register(Some(&empty_display));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.errors()[0].message(),
            "Display name is null or empty"
        );
    }
}
