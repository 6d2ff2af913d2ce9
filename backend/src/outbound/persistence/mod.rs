//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via the Diesel ORM with async support through `diesel-async`
//! and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic lives here, with one
//!   deliberate exception: classifying unique-constraint violations so the
//!   domain can field-scope duplicate registrations.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Transactional integrity**: uniqueness of username/email and the
//!   owner foreign key with its delete cascade are enforced by the database
//!   itself, declared in the embedded migrations.

mod diesel_feedback_repository;
mod diesel_user_repository;
mod migrate;
mod models;
mod pool;
mod schema;

pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrate::{MigrateError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
