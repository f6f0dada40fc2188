//! Session cookie access for handlers.
//!
//! Wraps the Actix session so handlers deal only in staff ids and resolved
//! callers.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::IdentityQuery;
use crate::domain::{Caller, Error, ErrorCode, StaffId};

pub(crate) const STAFF_ID_KEY: &str = "staff_id";

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session cookie to `staff_id`, rotating the session key.
    pub fn persist_staff(&self, staff_id: &StaffId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(STAFF_ID_KEY, staff_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Staff id held by the session, if any. Tampered values read as absent.
    pub fn staff_id(&self) -> Result<Option<StaffId>, Error> {
        let raw = self
            .0
            .get::<String>(STAFF_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match StaffId::new(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid staff id in session cookie");
                None
            }
        }))
    }

    pub fn require_staff_id(&self) -> Result<StaffId, Error> {
        self.staff_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the signed-in caller against the identity directory.
    ///
    /// A session naming a deleted identity is cleared and treated as logged
    /// out.
    pub async fn require_caller(&self, identities: &dyn IdentityQuery) -> Result<Caller, Error> {
        let id = self.require_staff_id()?;
        match identities.resolve_caller(&id).await {
            Err(error) if error.code() == ErrorCode::Unauthorized => {
                self.purge();
                Err(error)
            }
            other => other,
        }
    }

    pub fn purge(&self) {
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
