//! Feedback ledger use-cases over the [`FeedbackRepository`] port.

use std::sync::Arc;

use super::error::Error;
use super::feedback::{Feedback, FeedbackContent, FeedbackId, FeedbackTitle, NewFeedback};
use super::ports::{FeedbackPersistenceError, FeedbackRepository};
use super::user::Username;

fn map_feedback_persistence_error(error: FeedbackPersistenceError) -> Error {
    match error {
        FeedbackPersistenceError::Connection { message } => Error::service_unavailable(message),
        FeedbackPersistenceError::Query { message } => Error::internal(message),
    }
}

fn feedback_not_found(id: FeedbackId) -> Error {
    Error::not_found(format!("no feedback entry with id {id}"))
}

/// Feedback use-cases. Ownership checks live with the caller; this service
/// only guarantees `NotFound` semantics and delegates integrity (the owner
/// foreign key) to the persistence layer.
#[derive(Clone)]
pub struct FeedbackService {
    entries: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    /// Create a new service backed by the given repository.
    pub fn new(entries: Arc<dyn FeedbackRepository>) -> Self {
        Self { entries }
    }

    /// Persist a new entry and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Infrastructure failures only; the owner is expected to exist because
    /// callers resolve it from an authenticated session.
    pub async fn create(&self, entry: NewFeedback) -> Result<Feedback, Error> {
        self.entries
            .insert(&entry)
            .await
            .map_err(map_feedback_persistence_error)
    }

    /// Fetch a single entry.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry has this id.
    pub async fn get(&self, id: FeedbackId) -> Result<Feedback, Error> {
        self.entries
            .find_by_id(id)
            .await
            .map_err(map_feedback_persistence_error)?
            .ok_or_else(|| feedback_not_found(id))
    }

    /// Replace title and content of an existing entry.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry has this id.
    pub async fn update(
        &self,
        id: FeedbackId,
        title: FeedbackTitle,
        content: FeedbackContent,
    ) -> Result<Feedback, Error> {
        self.entries
            .update(id, &title, &content)
            .await
            .map_err(map_feedback_persistence_error)?
            .ok_or_else(|| feedback_not_found(id))
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry has this id.
    pub async fn delete(&self, id: FeedbackId) -> Result<(), Error> {
        let existed = self
            .entries
            .delete(id)
            .await
            .map_err(map_feedback_persistence_error)?;
        if existed {
            Ok(())
        } else {
            Err(feedback_not_found(id))
        }
    }

    /// Every entry across all users, for the listing view.
    pub async fn list_all(&self) -> Result<Vec<Feedback>, Error> {
        self.entries
            .list_all()
            .await
            .map_err(map_feedback_persistence_error)
    }

    /// Entries owned by one user, for the profile view.
    pub async fn list_for_owner(&self, owner: &Username) -> Result<Vec<Feedback>, Error> {
        self.entries
            .list_by_owner(owner)
            .await
            .map_err(map_feedback_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for ledger semantics over a stub repository.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;

    #[derive(Default)]
    struct StubFeedbackRepository {
        entries: Mutex<Vec<Feedback>>,
        next_id: Mutex<i32>,
    }

    #[async_trait]
    impl FeedbackRepository for StubFeedbackRepository {
        async fn insert(&self, entry: &NewFeedback) -> Result<Feedback, FeedbackPersistenceError> {
            let mut next_id = self.next_id.lock().expect("id lock");
            *next_id += 1;
            let stored = Feedback::new(
                FeedbackId::new(*next_id),
                entry.title.clone(),
                entry.content.clone(),
                entry.owner.clone(),
            );
            self.entries.lock().expect("entries lock").push(stored.clone());
            Ok(stored)
        }

        async fn find_by_id(
            &self,
            id: FeedbackId,
        ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
            Ok(self
                .entries
                .lock()
                .expect("entries lock")
                .iter()
                .find(|entry| entry.id() == id)
                .cloned())
        }

        async fn update(
            &self,
            id: FeedbackId,
            title: &FeedbackTitle,
            content: &FeedbackContent,
        ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
            let mut entries = self.entries.lock().expect("entries lock");
            let Some(entry) = entries.iter_mut().find(|entry| entry.id() == id) else {
                return Ok(None);
            };
            *entry = Feedback::new(id, title.clone(), content.clone(), entry.owner().clone());
            Ok(Some(entry.clone()))
        }

        async fn delete(&self, id: FeedbackId) -> Result<bool, FeedbackPersistenceError> {
            let mut entries = self.entries.lock().expect("entries lock");
            let before = entries.len();
            entries.retain(|entry| entry.id() != id);
            Ok(entries.len() < before)
        }

        async fn list_all(&self) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
            Ok(self.entries.lock().expect("entries lock").clone())
        }

        async fn list_by_owner(
            &self,
            owner: &Username,
        ) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
            Ok(self
                .entries
                .lock()
                .expect("entries lock")
                .iter()
                .filter(|entry| entry.owner() == owner)
                .cloned()
                .collect())
        }
    }

    fn new_entry(title: &str, content: &str, owner: &str) -> NewFeedback {
        NewFeedback {
            title: FeedbackTitle::new(title).expect("valid title"),
            content: FeedbackContent::new(content).expect("valid content"),
            owner: Username::new(owner).expect("valid username"),
        }
    }

    fn service() -> FeedbackService {
        FeedbackService::new(Arc::new(StubFeedbackRepository::default()))
    }

    #[tokio::test]
    async fn create_assigns_fresh_identifiers() {
        let service = service();
        let first = service
            .create(new_entry("T", "C", "alice"))
            .await
            .expect("create succeeds");
        let second = service
            .create(new_entry("T2", "C2", "alice"))
            .await
            .expect("create succeeds");
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn update_replaces_title_and_content_only() {
        let service = service();
        let created = service
            .create(new_entry("T", "C", "alice"))
            .await
            .expect("create succeeds");

        let updated = service
            .update(
                created.id(),
                FeedbackTitle::new("T2").expect("valid title"),
                FeedbackContent::new("C2").expect("valid content"),
            )
            .await
            .expect("update succeeds");

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.owner(), created.owner());
        assert_eq!(updated.title().as_ref(), "T2");
        assert_eq!(updated.content().as_ref(), "C2");
    }

    #[rstest]
    #[tokio::test]
    async fn absent_ids_surface_as_not_found() {
        let service = service();
        let missing = FeedbackId::new(99);

        let get_err = service.get(missing).await.expect_err("get must fail");
        let update_err = service
            .update(
                missing,
                FeedbackTitle::new("T").expect("valid title"),
                FeedbackContent::new("C").expect("valid content"),
            )
            .await
            .expect_err("update must fail");
        let delete_err = service.delete(missing).await.expect_err("delete must fail");

        assert_eq!(get_err.code(), ErrorCode::NotFound);
        assert_eq!(update_err.code(), ErrorCode::NotFound);
        assert_eq!(delete_err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_for_owner_filters_by_identity() {
        let service = service();
        service
            .create(new_entry("T", "C", "alice"))
            .await
            .expect("create succeeds");
        service
            .create(new_entry("T2", "C2", "bob"))
            .await
            .expect("create succeeds");

        let owner = Username::new("alice").expect("valid username");
        let entries = service.list_for_owner(&owner).await.expect("list succeeds");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().map(Feedback::owner), Some(&owner));
    }
}
