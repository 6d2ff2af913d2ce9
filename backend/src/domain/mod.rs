//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities, the account and feedback
//! use-cases, and the ownership predicates, all independent of HTTP and of
//! the database. Adapters on either side translate to and from these types.

pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod credential;
pub mod error;
pub mod feedback;
pub mod feedback_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError, NewAccount};
pub use self::authorization::{can_access_own_profile, can_modify_feedback};
pub use self::credential::{CredentialError, HashedCredential, hash_password, verify_password};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feedback::{
    Feedback, FeedbackContent, FeedbackId, FeedbackTitle, FeedbackValidationError, NewFeedback,
};
pub use self::feedback_service::FeedbackService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PersonName, User, UserValidationError, Username};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use feedback_backend::domain::{DomainResult, Error};
///
/// fn check() -> DomainResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type DomainResult<T> = Result<T, Error>;
