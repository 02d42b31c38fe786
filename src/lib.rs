/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # pandago client
//!
//! Async client for the pandago last-mile delivery API.
//!
//! The API authenticates with the OAuth2 client-credentials grant using an
//! RS256 signed JWT assertion. The [`Client`] takes care of signing the
//! assertion, caching the bearer token, refreshing it when it expires and
//! retrying calls the API rejects with `403 Forbidden`.
//!
//! ```ignore
//! use pandago_client::prelude::*;
//!
//! let config = Config::with_credentials("client-id", "key-id", pem)
//!     .with_environment(Environment::Production)
//!     .with_country_code("tw");
//! let client = Client::new(config)?;
//!
//! let fee = client.estimate_fee(&order).await?;
//! if let Some(order_id) = client.submit_order(&order).await?.and_then(|o| o.order_id) {
//!     client.cancel_order(&order_id, None).await?;
//! }
//! ```

/// Authentication, configuration, client and service traits
pub mod application;
/// Global constants
pub mod constants;
/// Error type
pub mod error;
/// Data models
pub mod model;
/// Commonly used re-exports
pub mod prelude;
/// Utilities
pub mod utils;

pub use application::client::Client;
pub use application::config::{Config, Environment};
pub use error::AppError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
