//! Requester identity extraction from gateway headers.
//!
//! The upstream gateway authenticates callers and relays their identity in
//! `X-User-Email` and `X-User-Role`. Handlers receive a [`RequesterContext`]
//! and call [`RequesterContext::require`] so unauthenticated requests turn
//! into `401 Unauthorized` uniformly.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use tracing::warn;

use crate::domain::{Error, Requester, RequesterRole};

/// Header carrying the authenticated email.
pub const USER_EMAIL_HEADER: &str = "X-User-Email";
/// Header carrying the granted role (`USER` or `ADMIN`).
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Identity relayed by the gateway, when present and well formed.
#[derive(Debug, Clone)]
pub struct RequesterContext {
    requester: Option<Requester>,
}

impl RequesterContext {
    fn from_http_request(req: &HttpRequest) -> Self {
        let email = req
            .headers()
            .get(USER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        let Some(email) = email else {
            return Self { requester: None };
        };

        let role = match req.headers().get(USER_ROLE_HEADER) {
            None => RequesterRole::User,
            Some(value) => match value.to_str().ok().map(str::parse) {
                Some(Ok(role)) => role,
                _ => {
                    warn!(email, "unparseable role header; rejecting identity");
                    return Self { requester: None };
                }
            },
        };

        Self {
            requester: Some(Requester {
                email: email.to_owned(),
                role,
            }),
        }
    }

    /// The relayed identity, if the gateway supplied one.
    #[must_use]
    pub fn requester(&self) -> Option<&Requester> {
        self.requester.as_ref()
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require(&self) -> Result<Requester, Error> {
        self.requester
            .clone()
            .ok_or_else(|| Error::unauthorized("authenticated identity required"))
    }
}

impl FromRequest for RequesterContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_http_request(req)))
    }
}
