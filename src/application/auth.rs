/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Authentication module for the pandago API
//!
//! This module handles the OAuth2 client-credentials flow:
//! - Signing the RS256 client assertion
//! - Exchanging it for a bearer token at the auth server
//! - Caching the token and refreshing it once it expires

use crate::application::config::Config;
use crate::constants::{
    ASSERTION_AUDIENCE, CLIENT_ASSERTION_TYPE_JWT_BEARER, GRANT_TYPE_CLIENT_CREDENTIALS,
    TOKEN_PATH,
};
use crate::error::AppError;
use crate::model::auth::{AccessTokenResponse, AssertionClaims, TokenState};
use crate::model::http::{Headers, HttpTransport, RequestDescriptor, into_result};
use crate::utils::id::assertion_id;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Method;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Token manager for a single client instance
///
/// Owns the cached [`TokenState`]; only [`Auth::refresh_token`] writes it.
/// Concurrent callers that both find the token expired refresh independently.
pub struct Auth {
    config: Arc<Config>,
    transport: Arc<dyn HttpTransport>,
    token: RwLock<TokenState>,
}

impl Auth {
    /// Creates a new Auth instance with an empty token cache
    ///
    /// # Arguments
    /// * `config` - Configuration containing credentials and environment
    /// * `transport` - Transport used for the token endpoint
    pub fn new(config: Arc<Config>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            token: RwLock::new(TokenState::default()),
        }
    }

    /// Signs the client assertion for the token endpoint
    ///
    /// # Returns
    /// * `Ok(String)` - Compact RS256 JWT with `kid` set to the configured key id
    /// * `Err(AppError::Signing)` - If the private key or claims are rejected
    pub fn sign_assertion(&self) -> Result<String, AppError> {
        self.sign_assertion_at(Utc::now())
    }

    /// Signs the client assertion as if issued at `now`
    pub fn sign_assertion_at(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let credentials = &self.config.credentials;
        let claims =
            AssertionClaims::new(&credentials.client_id, ASSERTION_AUDIENCE, now, assertion_id());

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(credentials.key_id.clone());

        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }

    /// Fetches a new access token and stores it
    ///
    /// Any failure clears the cached token so the next call starts from a
    /// fresh exchange instead of reusing a token the server may have revoked.
    ///
    /// # Returns
    /// * `Ok(String)` - The new bearer token
    /// * `Err(AppError)` - Signing, transport or HTTP failure, unchanged
    pub async fn refresh_token(&self) -> Result<String, AppError> {
        info!("Refreshing pandago access token");

        match self.exchange_assertion().await {
            Ok(response) => {
                let state = TokenState::issued(
                    response.access_token.clone(),
                    response.expires_in,
                    Utc::now(),
                );
                debug!("Access token expires at {:?}", state.expires_at());
                *self.token.write().await = state;
                info!("✓ Token refreshed successfully");
                Ok(response.access_token)
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                *self.token.write().await = TokenState::default();
                Err(e)
            }
        }
    }

    async fn exchange_assertion(&self) -> Result<AccessTokenResponse, AppError> {
        let assertion = self.sign_assertion()?;
        let credentials = &self.config.credentials;

        let request = RequestDescriptor::new(
            Method::POST,
            format!("{}{}", self.config.auth_url(), TOKEN_PATH),
        )
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_header("Accept", "application/json")
        .with_form([
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
            ("client_id", credentials.client_id.as_str()),
            ("client_assertion_type", CLIENT_ASSERTION_TYPE_JWT_BEARER),
            ("client_assertion", assertion.as_str()),
            ("scope", self.config.scope.as_str()),
        ]);

        if self.config.debug {
            debug!("Token request: {:?}", request.redacted());
        }

        let response = self.transport.send(&request).await?;
        let body = into_result(response)?;
        Ok(serde_json::from_value(body)?)
    }

    /// Returns headers carrying a usable bearer token
    ///
    /// A refresh happens first when `force` is set, when no token was ever
    /// acquired, or when the cached one expires at or before now.
    pub async fn resolve_headers(&self, force: bool) -> Result<Headers, AppError> {
        let cached = if force {
            None
        } else {
            self.token
                .read()
                .await
                .valid_token(Utc::now())
                .map(str::to_owned)
        };

        let token = match cached {
            Some(token) => token,
            None => self.refresh_token().await?,
        };

        Ok(api_headers(&token))
    }

    /// Snapshot of the cached token state
    pub async fn token_state(&self) -> TokenState {
        self.token.read().await.clone()
    }
}

/// Headers sent with every resource API call
#[must_use]
pub fn api_headers(token: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("Authorization".to_string(), format!("Bearer {token}"));
    headers
}
