//! Feedback backend library modules.
//!
//! A session-authenticated CRUD service: users register, log in, and manage
//! short feedback entries tied to their account. The crate follows a
//! hexagonal layout: `domain` holds entities, services, and ports; `inbound`
//! and `outbound` hold the HTTP and PostgreSQL adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
