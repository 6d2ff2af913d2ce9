//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! This adapter only translates between Diesel rows and domain types. The
//! one piece of logic it owns is classifying unique-constraint violations so
//! the domain can tell callers which field collided.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{DuplicateField, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, HashedCredential, PersonName, User, Username};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Constraint names from the migration, used to field-scope duplicates.
const USERNAME_CONSTRAINT: &str = "users_pkey";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user persistence errors.
///
/// Unique violations become [`UserPersistenceError::Duplicate`], scoped to
/// the collided field when PostgreSQL reports a recognised constraint name.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserPersistenceError::duplicate(duplicate_field_for(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserPersistenceError::query("database error"),
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn duplicate_field_for(constraint: Option<&str>) -> Option<DuplicateField> {
    match constraint {
        Some(USERNAME_CONSTRAINT) => Some(DuplicateField::Username),
        Some(EMAIL_CONSTRAINT) => Some(DuplicateField::Email),
        _ => None,
    }
}

/// Convert a database row to a domain user.
///
/// Stored values that no longer satisfy the domain invariants are treated as
/// a query failure; they indicate the row was written outside this service.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        username,
        password_hash,
        email,
        first_name,
        last_name,
        ..
    } = row;

    let username = Username::new(username).map_err(invalid_row)?;
    let email = EmailAddress::new(email).map_err(invalid_row)?;
    let first_name = PersonName::new(first_name).map_err(invalid_row)?;
    let last_name = PersonName::new(last_name).map_err(invalid_row)?;

    Ok(User::new(
        username,
        HashedCredential::from_phc_string(password_hash),
        email,
        first_name,
        last_name,
    ))
}

fn invalid_row(error: impl std::fmt::Display) -> UserPersistenceError {
    warn!(%error, "stored user record violates domain invariants");
    UserPersistenceError::query("stored user record is invalid")
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            username: user.username().as_ref(),
            password_hash: user.password_hash().as_str(),
            email: user.email().as_ref(),
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Feedback rows go with the user via ON DELETE CASCADE.
        let deleted = diesel::delete(users::table.filter(users::username.eq(username.as_ref())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
