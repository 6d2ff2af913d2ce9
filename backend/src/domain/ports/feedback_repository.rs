//! Port abstraction for feedback persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::feedback::{Feedback, FeedbackContent, FeedbackId, FeedbackTitle, NewFeedback};
use crate::domain::user::Username;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by feedback repository adapters.
    pub enum FeedbackPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "feedback store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feedback store query failed: {message}",
    }
}

/// Port for the feedback ledger's persistence needs.
///
/// `update` and `delete` report absence through their return value rather
/// than an error so the service layer owns the `NotFound` mapping.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a new entry and return it with its database-assigned id.
    async fn insert(&self, entry: &NewFeedback) -> Result<Feedback, FeedbackPersistenceError>;

    /// Fetch an entry by id.
    async fn find_by_id(
        &self,
        id: FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError>;

    /// Replace title and content in place, returning the updated entry or
    /// `None` when no row matched. Identifier and owner are never touched.
    async fn update(
        &self,
        id: FeedbackId,
        title: &FeedbackTitle,
        content: &FeedbackContent,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError>;

    /// Delete an entry, returning whether it existed.
    async fn delete(&self, id: FeedbackId) -> Result<bool, FeedbackPersistenceError>;

    /// All entries across all users. Order is not contractually meaningful.
    async fn list_all(&self) -> Result<Vec<Feedback>, FeedbackPersistenceError>;

    /// Entries owned by a single user.
    async fn list_by_owner(
        &self,
        owner: &Username,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError>;
}
