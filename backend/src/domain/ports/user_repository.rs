//! Port abstraction for user persistence adapters and their errors.

use std::fmt;

use async_trait::async_trait;

use crate::domain::user::{User, Username};

use super::define_port_error;

/// Which unique constraint a registration collided with, when the adapter can
/// tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Email => f.write_str("email"),
        }
    }
}

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// Insert collided with an existing username or email. `field` is
        /// `None` when the violated constraint could not be identified.
        Duplicate { field: Option<DuplicateField> } => "user identity already registered",
    }
}

/// Port for the user directory's persistence needs.
///
/// Uniqueness of username and email is not checked by callers; the adapter
/// surfaces a commit-time violation as [`UserPersistenceError::Duplicate`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identity.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Delete a user row, returning whether it existed. Dependent feedback
    /// rows are removed by the database cascade in the same transaction.
    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn duplicate_constructor_accepts_a_known_field() {
        let err = UserPersistenceError::duplicate(DuplicateField::Email);
        assert_eq!(
            err,
            UserPersistenceError::Duplicate {
                field: Some(DuplicateField::Email)
            }
        );
    }

    #[test]
    fn duplicate_constructor_accepts_unknown_fields() {
        let err = UserPersistenceError::duplicate(None);
        assert_eq!(err, UserPersistenceError::Duplicate { field: None });
    }
}
