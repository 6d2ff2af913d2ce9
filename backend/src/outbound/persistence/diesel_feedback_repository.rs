//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.
//!
//! A thin adapter: queries return `Option`/`bool` so the domain service owns
//! the `NotFound` mapping, and referential integrity (the owner foreign key
//! with its delete cascade) is enforced entirely by the database.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{FeedbackPersistenceError, FeedbackRepository};
use crate::domain::{
    Feedback, FeedbackContent, FeedbackId, FeedbackTitle, NewFeedback, Username,
};

use super::models::{FeedbackRow, FeedbackUpdate, NewFeedbackRow};
use super::pool::{DbPool, PoolError};
use super::schema::feedback_entries;

/// Diesel-backed implementation of the `FeedbackRepository` port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain feedback persistence errors.
fn map_pool_error(error: PoolError) -> FeedbackPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FeedbackPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain feedback persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> FeedbackPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FeedbackPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => FeedbackPersistenceError::query("database error"),
        DieselError::NotFound => FeedbackPersistenceError::query("record not found"),
        _ => FeedbackPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain feedback entry.
fn row_to_feedback(row: FeedbackRow) -> Result<Feedback, FeedbackPersistenceError> {
    let FeedbackRow {
        id,
        title,
        content,
        owner_username,
        ..
    } = row;

    let title = FeedbackTitle::new(title).map_err(invalid_row)?;
    let content = FeedbackContent::new(content).map_err(invalid_row)?;
    let owner = Username::new(owner_username).map_err(invalid_row)?;

    Ok(Feedback::new(FeedbackId::new(id), title, content, owner))
}

fn invalid_row(error: impl std::fmt::Display) -> FeedbackPersistenceError {
    warn!(%error, "stored feedback record violates domain invariants");
    FeedbackPersistenceError::query("stored feedback record is invalid")
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, entry: &NewFeedback) -> Result<Feedback, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewFeedbackRow {
            title: entry.title.as_ref(),
            content: entry.content.as_ref(),
            owner_username: entry.owner.as_ref(),
        };

        let row: FeedbackRow = diesel::insert_into(feedback_entries::table)
            .values(&new_row)
            .returning(FeedbackRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_feedback(row)
    }

    async fn find_by_id(
        &self,
        id: FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<FeedbackRow> = feedback_entries::table
            .find(id.as_i32())
            .select(FeedbackRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_feedback).transpose()
    }

    async fn update(
        &self,
        id: FeedbackId,
        title: &FeedbackTitle,
        content: &FeedbackContent,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = FeedbackUpdate {
            title: title.as_ref(),
            content: content.as_ref(),
        };

        let row: Option<FeedbackRow> =
            diesel::update(feedback_entries::table.find(id.as_i32()))
                .set((
                    &changes,
                    feedback_entries::updated_at.eq(diesel::dsl::now),
                ))
                .returning(FeedbackRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        row.map(row_to_feedback).transpose()
    }

    async fn delete(&self, id: FeedbackId) -> Result<bool, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(feedback_entries::table.find(id.as_i32()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list_all(&self) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeedbackRow> = feedback_entries::table
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_feedback).collect()
    }

    async fn list_by_owner(
        &self,
        owner: &Username,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeedbackRow> = feedback_entries::table
            .filter(feedback_entries::owner_username.eq(owner.as_ref()))
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_feedback).collect()
    }
}
