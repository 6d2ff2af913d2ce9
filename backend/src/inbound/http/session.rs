//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! A thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: binding an identity, reading it back, and
//! clearing it on logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Username};

pub(crate) const IDENTITY_KEY: &str = "username";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the authenticated identity to this client's session.
    pub fn persist_identity(&self, username: &Username) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, username.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if one is bound.
    ///
    /// A stored value that is not a well-formed username is treated as no
    /// session; tampered cookies degrade to anonymous rather than erroring.
    pub fn identity(&self) -> Result<Option<Username>, Error> {
        let stored = self
            .0
            .get::<String>(IDENTITY_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match stored {
            Some(raw) => match Username::new(raw) {
                Ok(username) => Ok(Some(username)),
                Err(error) => {
                    tracing::warn!("invalid identity in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require a bound identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Username, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the session binding. A no-op when no session is active.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
