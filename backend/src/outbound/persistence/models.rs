//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{feedback_entries, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Row struct for reading from the feedback_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub owner_username: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new feedback records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback_entries)]
pub(crate) struct NewFeedbackRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub owner_username: &'a str,
}

/// Changeset struct for updating title and content of an entry.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = feedback_entries)]
pub(crate) struct FeedbackUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
}
