//! User directory use-cases: registration, authentication, account removal.

use std::sync::Arc;

use serde_json::json;

use super::auth::{LoginCredentials, NewAccount};
use super::credential::{hash_password, verify_password};
use super::error::Error;
use super::ports::{DuplicateField, UserPersistenceError, UserRepository};
use super::user::{User, Username};

/// Map persistence failures to transport-agnostic domain errors.
///
/// Duplicate-identity violations are expected, recoverable conditions and
/// become a `Conflict` carrying the collided field when it is known.
fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::Duplicate { field } => duplicate_identity_error(field),
    }
}

fn duplicate_identity_error(field: Option<DuplicateField>) -> Error {
    let error = match field {
        Some(DuplicateField::Username) => Error::conflict("username is already taken"),
        Some(DuplicateField::Email) => Error::conflict("email is already registered"),
        None => Error::conflict("username or email is already taken"),
    };
    match field {
        Some(field) => error.with_details(json!({ "field": field.to_string() })),
        None => error,
    }
}

/// Account use-cases over the [`UserRepository`] port.
///
/// This service owns the credential lifecycle: plaintext passwords are hashed
/// on the way in and verified against the stored credential on the way back,
/// and neither operation reveals whether a given username exists.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Create a new service backed by the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// Uniqueness of username and email is enforced by the persistence layer
    /// at commit time; a violation surfaces as a `Conflict` error scoped to
    /// the collided field when the adapter can identify it.
    ///
    /// # Errors
    ///
    /// - `Conflict` when the username or email is already registered.
    /// - `InternalError` when hashing or the insert itself fails.
    /// - `ServiceUnavailable` when the repository cannot be reached.
    pub async fn register(&self, account: NewAccount) -> Result<User, Error> {
        let password_hash = hash_password(account.password())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(
            account.username().clone(),
            password_hash,
            account.email().clone(),
            account.first_name().clone(),
            account.last_name().clone(),
        );

        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(user)
    }

    /// Validate credentials against the directory.
    ///
    /// Returns `Ok(None)` both when the user does not exist and when the
    /// password does not match; the return value never distinguishes the two.
    ///
    /// # Errors
    ///
    /// Only infrastructure failures error; a failed credential check is an
    /// expected outcome, not an exceptional condition.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_persistence_error)?;

        Ok(user.filter(|user| verify_password(credentials.password(), user.password_hash())))
    }

    /// Fetch an account for display.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such user exists.
    pub async fn profile(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("no such user"))
    }

    /// Remove an account and, by cascade, all feedback it owns.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such user exists.
    pub async fn delete(&self, username: &Username) -> Result<(), Error> {
        let existed = self
            .users
            .delete(username)
            .await
            .map_err(map_user_persistence_error)?;
        if existed {
            Ok(())
        } else {
            Err(Error::not_found("no such user"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for registration and authentication semantics.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::user::{EmailAddress, PersonName};

    #[derive(Default)]
    struct StubState {
        stored: Vec<User>,
        insert_failure: Option<UserPersistenceError>,
        find_failure: Option<UserPersistenceError>,
    }

    #[derive(Default)]
    struct StubUserRepository {
        state: Mutex<StubState>,
    }

    impl StubUserRepository {
        fn with_insert_failure(failure: UserPersistenceError) -> Self {
            Self {
                state: Mutex::new(StubState {
                    insert_failure: Some(failure),
                    ..StubState::default()
                }),
            }
        }

        fn set_find_failure(&self, failure: UserPersistenceError) {
            self.state.lock().expect("state lock").find_failure = Some(failure);
        }

        fn stored_users(&self) -> Vec<User> {
            self.state.lock().expect("state lock").stored.clone()
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
            let mut state = self.state.lock().expect("state lock");
            if let Some(failure) = state.insert_failure.clone() {
                return Err(failure);
            }
            if state
                .stored
                .iter()
                .any(|existing| existing.username() == user.username())
            {
                return Err(UserPersistenceError::duplicate(DuplicateField::Username));
            }
            if state
                .stored
                .iter()
                .any(|existing| existing.email() == user.email())
            {
                return Err(UserPersistenceError::duplicate(DuplicateField::Email));
            }
            state.stored.push(user.clone());
            Ok(())
        }

        async fn find_by_username(
            &self,
            username: &Username,
        ) -> Result<Option<User>, UserPersistenceError> {
            let state = self.state.lock().expect("state lock");
            if let Some(failure) = state.find_failure.clone() {
                return Err(failure);
            }
            Ok(state
                .stored
                .iter()
                .find(|user| user.username() == username)
                .cloned())
        }

        async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
            let mut state = self.state.lock().expect("state lock");
            let before = state.stored.len();
            state.stored.retain(|user| user.username() != username);
            Ok(state.stored.len() < before)
        }
    }

    fn account(username: &str, password: &str, email: &str) -> NewAccount {
        NewAccount::new(
            Username::new(username).expect("valid username"),
            password,
            EmailAddress::new(email).expect("valid email"),
            PersonName::new("Ada").expect("valid name"),
            PersonName::new("Lovelace").expect("valid name"),
        )
        .expect("valid account request")
    }

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid test credentials")
    }

    fn service() -> (Arc<StubUserRepository>, AccountService) {
        let repository = Arc::new(StubUserRepository::default());
        let service = AccountService::new(repository.clone());
        (repository, service)
    }

    #[tokio::test]
    async fn register_then_authenticate_returns_the_same_user() {
        let (_, service) = service();

        let registered = service
            .register(account("alice", "secret1", "a@x.com"))
            .await
            .expect("registration succeeds");

        let authenticated = service
            .authenticate(&credentials("alice", "secret1"))
            .await
            .expect("lookup succeeds")
            .expect("credentials match");

        assert_eq!(registered, authenticated);
    }

    #[rstest]
    #[case("alice", "wrong")]
    #[case("nobody", "secret1")]
    #[tokio::test]
    async fn failed_authentication_is_indistinguishable(
        #[case] username: &str,
        #[case] password: &str,
    ) {
        let (_, service) = service();
        service
            .register(account("alice", "secret1", "a@x.com"))
            .await
            .expect("registration succeeds");

        let outcome = service
            .authenticate(&credentials(username, password))
            .await
            .expect("lookup succeeds");

        // Absent user and wrong password produce the same value.
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn duplicate_username_yields_exactly_one_success() {
        let (repository, service) = service();

        let first = service.register(account("alice", "secret1", "a@x.com")).await;
        let second = service.register(account("alice", "other", "b@x.com")).await;

        assert!(first.is_ok());
        let err = second.expect_err("second registration must collide");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
            Some("username")
        );
        assert_eq!(repository.stored_users().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_scoped_to_the_email_field() {
        let (_, service) = service();

        service
            .register(account("alice", "secret1", "a@x.com"))
            .await
            .expect("registration succeeds");
        let err = service
            .register(account("bob", "secret2", "a@x.com"))
            .await
            .expect_err("email collision must fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
            Some("email")
        );
    }

    #[tokio::test]
    async fn unscoped_duplicates_carry_no_field_details() {
        let repository = Arc::new(StubUserRepository::with_insert_failure(
            UserPersistenceError::duplicate(None),
        ));
        let service = AccountService::new(repository);

        let err = service
            .register(account("alice", "secret1", "a@x.com"))
            .await
            .expect_err("duplicate must fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(err.details().is_none());
    }

    #[rstest]
    #[case(UserPersistenceError::connection("database unavailable"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("query failed"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn infrastructure_failures_map_to_domain_errors(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let (repository, service) = service();
        repository.set_find_failure(failure);

        let err = service
            .authenticate(&credentials("alice", "secret1"))
            .await
            .expect_err("failures should surface");

        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let (_, service) = service();
        let err = service
            .delete(&Username::new("ghost").expect("valid username"))
            .await
            .expect_err("missing user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_removes_the_account() {
        let (repository, service) = service();
        service
            .register(account("alice", "secret1", "a@x.com"))
            .await
            .expect("registration succeeds");

        service
            .delete(&Username::new("alice").expect("valid username"))
            .await
            .expect("delete succeeds");

        assert!(repository.stored_users().is_empty());
    }
}
