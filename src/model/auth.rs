/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::constants::ASSERTION_LIFETIME_SECS;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Claims of the client assertion sent to the token endpoint.
///
/// `iss`, `sub` and `aud` identify the client; `iat`, `exp` and `jti` bound
/// the assertion in time and make it single use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issuer, the client id
    pub iss: String,
    /// Subject, the client id
    pub sub: String,
    /// Audience, the auth server issuer URL
    pub aud: String,
    /// Issued at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Unique assertion id
    pub jti: String,
}

impl AssertionClaims {
    /// Builds the claims for `client_id` addressed to `audience`, issued at `now`
    pub fn new(client_id: &str, audience: &str, now: DateTime<Utc>, jti: String) -> Self {
        let iat = now.timestamp();
        Self {
            iss: client_id.to_string(),
            sub: client_id.to_string(),
            aud: audience.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            jti,
        }
    }
}

/// Successful response of `POST /oauth2/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// Opaque bearer token
    pub access_token: String,
    /// Lifetime of the token in seconds, integral or fractional
    pub expires_in: f64,
    /// Token type, usually `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Granted scope
    #[serde(default)]
    pub scope: Option<String>,
}

/// Cached access token of a client instance.
///
/// Both fields are `None` until the first successful refresh. The state is
/// replaced wholesale on every refresh and cleared when a refresh fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    access_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// Builds the state for a token that was issued at `now`
    ///
    /// The lifetime is applied with millisecond precision. A lifetime that
    /// does not fit in the calendar saturates at the latest (or earliest)
    /// representable instant.
    pub fn issued(access_token: String, expires_in: f64, now: DateTime<Utc>) -> Self {
        Self {
            access_token: Some(access_token),
            expires_at: Some(expiry_after(now, expires_in)),
        }
    }

    /// The cached bearer token, if any
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Absolute expiry of the cached token, if any
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether a token must be fetched before the next call.
    ///
    /// A token that was never acquired counts as expired, and so does one
    /// whose expiry equals `now`.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expires_at) {
            (Some(_), Some(expires_at)) => expires_at <= now,
            _ => true,
        }
    }

    /// Returns the token only if it is still valid at `now`
    #[must_use]
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        if self.needs_refresh(now) {
            None
        } else {
            self.access_token()
        }
    }
}

fn expiry_after(now: DateTime<Utc>, expires_in: f64) -> DateTime<Utc> {
    // `as` saturates out of range values and maps NaN to zero
    let millis = (expires_in * 1000.0) as i64;
    let limit = if millis < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    TimeDelta::try_milliseconds(millis)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(limit)
}
