//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable with in-memory
//! repositories.

use crate::domain::{AccountService, FeedbackService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub feedback: FeedbackService,
}

impl HttpState {
    /// Construct state from the two domain services.
    pub fn new(accounts: AccountService, feedback: FeedbackService) -> Self {
        Self { accounts, feedback }
    }
}
