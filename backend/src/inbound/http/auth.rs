//! Bearer authentication extractors.
//!
//! Handlers take [`AuthenticatedUser`] when an identity is mandatory and
//! [`OptionalUser`] when anonymous callers are accepted. Both read
//! `Authorization: Bearer <token>` and resolve it through the
//! [`SessionVerifier`](crate::domain::ports::SessionVerifier) port held in
//! [`HttpState`].
//!
//! Verifier infrastructure failures always propagate, so an outage never
//! silently downgrades a caller to anonymous.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, SessionToken, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Outcome of reading the `Authorization` header.
#[derive(Debug)]
enum BearerHeader {
    Missing,
    Malformed,
    Present(SessionToken),
}

fn read_bearer(req: &HttpRequest) -> BearerHeader {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return BearerHeader::Missing;
    };
    let Ok(value) = value.to_str() else {
        return BearerHeader::Malformed;
    };
    let Some((scheme, token)) = value.trim().split_once(' ') else {
        return BearerHeader::Malformed;
    };
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return BearerHeader::Malformed;
    }
    SessionToken::try_new(token).map_or(BearerHeader::Malformed, BearerHeader::Present)
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))
}

/// Verified caller identity. Rejects the request with 401 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let bearer = read_bearer(req);
        let state = http_state(req);
        Box::pin(async move {
            let token = match bearer {
                BearerHeader::Present(token) => token,
                BearerHeader::Missing => return Err(Error::unauthorized("bearer token required")),
                BearerHeader::Malformed => {
                    return Err(Error::unauthorized("malformed authorization header"));
                }
            };
            state?
                .sessions
                .verify(&token)
                .await?
                .map(Self)
                .ok_or_else(|| Error::unauthorized("session is invalid or expired"))
        })
    }
}

/// Caller identity when one is presented and verified, `None` otherwise.
///
/// Missing headers, malformed headers and unknown or expired tokens all
/// yield `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalUser(Option<UserId>);

impl OptionalUser {
    pub fn into_inner(self) -> Option<UserId> {
        self.0
    }
}

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let bearer = read_bearer(req);
        let state = http_state(req);
        Box::pin(async move {
            match bearer {
                BearerHeader::Missing => Ok(Self(None)),
                BearerHeader::Malformed => {
                    debug!("ignoring malformed authorization header on optional route");
                    Ok(Self(None))
                }
                BearerHeader::Present(token) => state?.sessions.verify(&token).await.map(Self),
            }
        })
    }
}
