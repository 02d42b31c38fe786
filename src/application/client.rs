/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Client for the pandago delivery API
//!
//! This module provides the client that handles:
//! - Automatic token acquisition and caching
//! - Transparent retry when the API rejects a token with 403
//! - Typed order and outlet endpoints
//!
//! # Example
//! ```ignore
//! use pandago_client::prelude::*;
//!
//! let config = Config::new();
//! let client = Client::new(config)?;
//!
//! // Authentication is handled automatically
//! let order = client.get_order("abc123").await?;
//! ```

use crate::application::auth::Auth;
use crate::application::config::Config;
use crate::application::interfaces::{OrderService, OutletService};
use crate::constants::MAX_RETRIES;
use crate::error::AppError;
use crate::model::auth::TokenState;
use crate::model::http::{HttpTransport, RequestDescriptor, ReqwestTransport, into_result};
use crate::model::requests::{CallbackEvent, CancelOrderRequest, CancelReason, OrderRequest, Outlet};
use crate::model::responses::{CourierLocation, FeeEstimate, Order, TimeEstimate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Client for the pandago API with automatic authentication
///
/// Each instance owns exactly one cached token. Every endpoint funnels
/// through [`Client::request`], which resolves headers, dispatches the call
/// and retries on 403 up to [`MAX_RETRIES`] times.
pub struct Client {
    auth: Arc<Auth>,
    transport: Arc<dyn HttpTransport>,
    config: Arc<Config>,
    api_url: String,
}

impl Client {
    /// Creates a new client backed by `reqwest`
    ///
    /// No token is fetched until the first request.
    ///
    /// # Returns
    /// * `Ok(Client)` - Client ready to use
    /// * `Err(AppError)` - If the configuration is invalid or the HTTP client cannot be built
    pub fn new(config: Config) -> Result<Self, AppError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout_secs)?);
        Self::with_transport(config, transport)
    }

    /// Creates a new client that sends every request through `transport`
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let config = Arc::new(config);
        let auth = Arc::new(Auth::new(config.clone(), transport.clone()));
        let api_url = config.api_url();

        info!(
            "pandago client ready for {} ({})",
            config.environment, api_url
        );

        Ok(Self {
            auth,
            transport,
            config,
            api_url,
        })
    }

    /// Base URL of the resource API this client talks to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets a reference to the underlying Auth instance
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Expiry of the cached access token, `None` before the first refresh
    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.auth.token_state().await.expires_at()
    }

    /// Snapshot of the cached token state
    pub async fn token_state(&self) -> TokenState {
        self.auth.token_state().await
    }

    /// Makes an authenticated request against the resource API
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path below the API base URL, e.g. `/orders/abc123`
    /// * `body` - Optional body, serialized as JSON
    ///
    /// # Returns
    /// * `Ok(T)` - Deserialized response body (`null` for empty bodies)
    /// * `Err(AppError)` - If the request ultimately fails
    pub async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let path = path.trim_start_matches('/');
        let url = format!("{}/{}", self.api_url, path);
        self.request_url(method, url, body).await
    }

    /// Like [`Client::request`], but each of `segments` is percent-encoded
    /// as exactly one path segment, so ids containing `/`, `?` or `#`
    /// cannot change the route.
    pub async fn request_segments<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let url = self.resource_url(segments)?;
        self.request_url(method, url, body).await
    }

    fn resource_url(&self, segments: &[&str]) -> Result<String, AppError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Config(format!("invalid api url {}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| AppError::Config(format!("api url {} has no path", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn request_url<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let mut request = RequestDescriptor::new(method, url);
        if let Some(b) = body {
            request = request.with_json(serde_json::to_value(b)?);
        }

        let value = self.call(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Attaches valid headers and dispatches the request
    async fn call(&self, request: RequestDescriptor) -> Result<Value, AppError> {
        let headers = self.auth.resolve_headers(false).await?;
        self.dispatch(request.with_headers(headers)).await
    }

    /// Sends `request`, refreshing the token and retrying on 403.
    ///
    /// The budget is per call: at most [`MAX_RETRIES`] retries, each preceded
    /// by a forced refresh and sent as a new descriptor with fresh headers.
    /// Other statuses and transport failures are returned immediately.
    async fn dispatch(&self, request: RequestDescriptor) -> Result<Value, AppError> {
        let mut request = request;
        let mut attempt: u32 = 0;

        loop {
            if self.config.debug {
                debug!("Request (attempt {}): {:?}", attempt, request.redacted());
            }

            let outcome = match self.transport.send(&request).await {
                Ok(response) => into_result(response),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(body) => return Ok(body),
                Err(e) if e.is_forbidden() && attempt < MAX_RETRIES => {
                    warn!(
                        "{} {} rejected with 403, refreshing token and retrying ({}/{})",
                        request.method,
                        request.url,
                        attempt + 1,
                        MAX_RETRIES
                    );
                    let headers = self.auth.resolve_headers(true).await?;
                    request = request.with_headers(headers);
                    attempt += 1;
                }
                Err(e) => {
                    if self.config.debug {
                        error!("{} {} failed: {}", request.method, request.url, e);
                    }
                    return Err(e);
                }
            }
        }
    }
}

fn require_id<'a>(name: &str, id: &'a str) -> Result<&'a str, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::InvalidInput(format!("{name} must not be empty")));
    }
    Ok(id)
}

#[async_trait]
impl OrderService for Client {
    async fn estimate_fee(&self, order: &OrderRequest) -> Result<FeeEstimate, AppError> {
        debug!("Estimating fee for order {}", order.client_order_id);
        self.request(Method::POST, "/orders/fee", Some(order)).await
    }

    async fn estimate_time(&self, order: &OrderRequest) -> Result<TimeEstimate, AppError> {
        debug!("Estimating time for order {}", order.client_order_id);
        self.request(Method::POST, "/orders/time", Some(order)).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<Option<Order>, AppError> {
        info!("Submitting order {}", order.client_order_id);
        let created: Option<Order> = self.request(Method::POST, "/orders", Some(order)).await?;
        match created.as_ref().and_then(|o| o.order_id.as_deref()) {
            Some(order_id) => info!("Order {} created as {}", order.client_order_id, order_id),
            None => info!("Order {} accepted", order.client_order_id),
        }
        Ok(created)
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, AppError> {
        let order_id = require_id("order_id", order_id)?;
        self.request_segments(Method::GET, &["orders", order_id], None::<&()>)
            .await
    }

    async fn cancel_order(
        &self,
        order_id: &str,
        reason: Option<CancelReason>,
    ) -> Result<Value, AppError> {
        let order_id = require_id("order_id", order_id)?;
        let body = CancelOrderRequest {
            reason: reason.unwrap_or_default(),
        };
        info!("Cancelling order {} ({})", order_id, body.reason);
        self.request_segments(Method::DELETE, &["orders", order_id], Some(&body))
            .await
    }

    async fn get_courier_location(&self, order_id: &str) -> Result<CourierLocation, AppError> {
        let order_id = require_id("order_id", order_id)?;
        self.request_segments(
            Method::GET,
            &["orders", order_id, "coordinates"],
            None::<&()>,
        )
        .await
    }

    async fn callback(&self, event: &CallbackEvent) -> Result<Value, AppError> {
        debug!("Pushing callback for order {}", event.order_id);
        self.request(Method::POST, "/callback", Some(event)).await
    }
}

#[async_trait]
impl OutletService for Client {
    async fn upsert_outlet(
        &self,
        id: &str,
        outlet: &Outlet,
    ) -> Result<Option<Outlet>, AppError> {
        let id = require_id("outlet id", id)?;
        info!("Creating or updating outlet {}", id);
        self.request_segments(Method::PUT, &["outlets", id], Some(outlet))
            .await
    }

    async fn get_outlet(&self, id: &str) -> Result<Outlet, AppError> {
        let id = require_id("outlet id", id)?;
        self.request_segments(Method::GET, &["outlets", id], None::<&()>)
            .await
    }
}
