/// Token acquisition and header resolution
pub mod auth;
/// Authenticated client and endpoint implementations
pub mod client;
/// Application configuration module
pub mod config;
/// Service traits implemented by the client
pub mod interfaces;
