//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate or update them whenever a migration changes the
//! schema.

diesel::table! {
    /// Registered accounts, keyed by username.
    users (username) {
        /// Primary key: account identity (max 20 characters).
        username -> Varchar,
        /// Salted Argon2 credential in PHC string format.
        password_hash -> Varchar,
        /// Unique contact address (max 50 characters).
        email -> Varchar,
        /// Given name (max 30 characters).
        first_name -> Varchar,
        /// Family name (max 30 characters).
        last_name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Feedback entries, each owned by exactly one user.
    feedback_entries (id) {
        /// Primary key: auto-incrementing identifier.
        id -> Int4,
        /// Headline (max 100 characters).
        title -> Varchar,
        /// Unbounded body text.
        content -> Text,
        /// Owning user; cascades on account deletion.
        owner_username -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(feedback_entries -> users (owner_username));
diesel::allow_tables_to_appear_in_same_query!(users, feedback_entries);
