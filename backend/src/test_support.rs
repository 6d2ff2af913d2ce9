//! Shared fixtures for unit and integration tests.
//!
//! Exposed behind the `test-support` feature so integration tests in
//! `tests/` can reuse the in-memory adapters without shipping them in
//! release builds.

use std::sync::Mutex;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use async_trait::async_trait;

use crate::domain::ports::{
    DuplicateField, FeedbackPersistenceError, FeedbackRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Feedback, FeedbackContent, FeedbackId, FeedbackTitle, NewFeedback, User, Username,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory implementation of both repository ports.
///
/// Mirrors the database contract: unique username and email on insert, and
/// deleting a user cascades to its feedback entries.
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    entries: Mutex<Vec<Feedback>>,
    next_id: Mutex<i32>,
}

impl InMemoryStore {
    /// Snapshot of the stored users.
    pub fn users(&self) -> Vec<User> {
        self.users.lock().expect("users lock").clone()
    }

    /// Snapshot of the stored feedback entries.
    pub fn entries(&self) -> Vec<Feedback> {
        self.entries.lock().expect("entries lock").clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("users lock");
        if users
            .iter()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate(DuplicateField::Username));
        }
        if users.iter().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate(DuplicateField::Email));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .lock()
            .expect("users lock")
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.lock().expect("users lock");
        let before = users.len();
        users.retain(|user| user.username() != username);
        let existed = users.len() < before;
        if existed {
            // Same observable effect as the database's ON DELETE CASCADE.
            self.entries
                .lock()
                .expect("entries lock")
                .retain(|entry| entry.owner() != username);
        }
        Ok(existed)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn insert(&self, entry: &NewFeedback) -> Result<Feedback, FeedbackPersistenceError> {
        let mut next_id = self.next_id.lock().expect("id lock");
        *next_id += 1;
        let stored = Feedback::new(
            FeedbackId::new(*next_id),
            entry.title.clone(),
            entry.content.clone(),
            entry.owner.clone(),
        );
        self.entries
            .lock()
            .expect("entries lock")
            .push(stored.clone());
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
