//! Bearer-token authentication for HTTP handlers.
//!
//! Tokens are HMAC-signed with the configured key via the cookie crate's
//! signed jar. The signed value is `<user id>|<expiry unix seconds>`, so a
//! token carries its own expiry and needs no server-side session store.
//! Handlers take [`AuthenticatedUser`] to require a valid token.

use std::sync::Arc;

use actix_web::cookie::{Cookie, CookieJar, Key};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::{Ready, ready};
use mockable::Clock;
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

const TOKEN_NAME: &str = "marketplace_token";
const BEARER_PREFIX: &str = "Bearer ";

/// Issues and verifies signed bearer tokens.
#[derive(Clone)]
pub struct BearerTokens {
    key: Key,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

/// A freshly issued token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerTokens {
    /// Token signer using `key`; tokens expire `ttl` after issue.
    pub fn new(key: Key, ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self { key, ttl, clock }
    }

    /// Sign a token for `user_id` valid for the configured lifetime.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, Error> {
        let expires_at = self.clock.utc() + self.ttl;
        let payload = format!("{user_id}|{}", expires_at.timestamp());
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(Cookie::new(TOKEN_NAME, payload));
        let token = jar
            .get(TOKEN_NAME)
            .map(|cookie| cookie.value().to_owned())
            .ok_or_else(|| Error::internal("signed token missing from jar"))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify the signature and expiry of `token`.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(TOKEN_NAME, token.to_owned()));
        let cookie = jar
            .signed(&self.key)
            .get(TOKEN_NAME)
            .ok_or_else(|| invalid_token("signature mismatch"))?;

        let (raw_id, raw_expiry) = cookie
            .value()
            .split_once('|')
            .ok_or_else(|| invalid_token("malformed payload"))?;
        let expiry: i64 = raw_expiry
            .parse()
            .map_err(|_| invalid_token("malformed expiry"))?;
        if self.clock.utc().timestamp() >= expiry {
            return Err(Error::unauthorized("token expired"));
        }
        UserId::new(raw_id).map_err(|_| invalid_token("malformed user id"))
    }
}

fn invalid_token(reason: &'static str) -> Error {
    debug!(reason, "rejecting bearer token");
    Error::unauthorized("invalid token")
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("login required"))?;
    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("expected a bearer token"))
}

/// The caller identified by a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// Identifier of the caller the token was issued to.
    pub fn id(&self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| Error::internal("HTTP state not configured"))
            .and_then(|state| {
                let token = bearer_token(req)?;
                state.tokens.verify(token)
            })
            .map(AuthenticatedUser);
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{FixedClock, fixed_now};
    use rstest::{fixture, rstest};

    #[fixture]
    fn tokens() -> BearerTokens {
        BearerTokens::new(
            Key::generate(),
            TimeDelta::hours(24),
            Arc::new(FixedClock(fixed_now())),
        )
    }

    #[rstest]
    fn issued_token_verifies(tokens: BearerTokens) {
        let user = UserId::random();
        let issued = tokens.issue(user).expect("issued");

        assert_eq!(issued.expires_at, fixed_now() + TimeDelta::hours(24));
        assert_eq!(tokens.verify(&issued.token).expect("valid"), user);
    }

    #[rstest]
    fn token_from_another_key_is_rejected(tokens: BearerTokens) {
        let other = BearerTokens::new(
            Key::generate(),
            TimeDelta::hours(24),
            Arc::new(FixedClock(fixed_now())),
        );
        let issued = other.issue(UserId::random()).expect("issued");

        let err = tokens.verify(&issued.token).expect_err("foreign key");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn tampered_token_is_rejected(tokens: BearerTokens) {
        let issued = tokens.issue(UserId::random()).expect("issued");
        let mut tampered = issued.token.clone();
        tampered.push('0');

        assert!(tokens.verify(&tampered).is_err());
    }

    #[rstest]
    fn expired_token_is_rejected() {
        let key = Key::generate();
        let issuer = BearerTokens::new(
            key.clone(),
            TimeDelta::hours(1),
            Arc::new(FixedClock(fixed_now())),
        );
        let later = BearerTokens::new(
            key,
            TimeDelta::hours(1),
            Arc::new(FixedClock(fixed_now() + TimeDelta::hours(2))),
        );
        let issued = issuer.issue(UserId::random()).expect("issued");

        let err = later.verify(&issued.token).expect_err("expired");
        assert_eq!(err.message(), "token expired");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer "))]
    fn missing_or_non_bearer_header_is_unauthorized(#[case] header: Option<&str>) {
        let mut req = actix_web::test::TestRequest::default();
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let req = req.to_http_request();

        let err = bearer_token(&req).expect_err("no bearer token");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
