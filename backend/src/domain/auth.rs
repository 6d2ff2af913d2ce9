//! Authentication primitives: login credentials and registration requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.
//! Plaintext passwords are held in [`Zeroizing`] buffers so they are wiped
//! when dropped.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, PersonName, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing, blank, or not a well-formed identity. Callers
    /// surface this exactly like a failed credential check so the response
    /// never reveals whether such a user could exist.
    InvalidUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUsername => write!(f, "username is not a valid identity"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and satisfies the [`Username`] shape.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
///
/// # Examples
/// ```
/// use feedback_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "secret1").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username =
            Username::new(username.trim()).map_err(|_| LoginValidationError::InvalidUsername)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Identity to look up.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request for a new account.
///
/// Field values arrive as already-validated newtypes from the boundary; only
/// the plaintext password is checked here.
#[derive(Debug, Clone)]
pub struct NewAccount {
    username: Username,
    password: Zeroizing<String>,
    email: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
}

impl NewAccount {
    /// Assemble a registration request, rejecting blank passwords.
    pub fn new(
        username: Username,
        password: &str,
        email: EmailAddress,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Result<Self, LoginValidationError> {
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
            email,
            first_name,
            last_name,
        })
    }

    /// Requested identity.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password to hash during registration.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Given name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidUsername)]
    #[case("   ", "pw", LoginValidationError::InvalidUsername)]
    #[case("not a name", "pw", LoginValidationError::InvalidUsername)]
    #[case("alice", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  alice  ", "secret1")]
    #[case("bob", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username().as_ref(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn registration_rejects_blank_password() {
        let err = NewAccount::new(
            Username::new("alice").expect("valid username"),
            "",
            EmailAddress::new("a@x.com").expect("valid email"),
            PersonName::new("Ada").expect("valid name"),
            PersonName::new("Lovelace").expect("valid name"),
        )
        .expect_err("blank password must fail");
        assert_eq!(err, LoginValidationError::EmptyPassword);
    }
}
