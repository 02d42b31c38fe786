/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
/// Token state and OAuth payloads
pub mod auth;
/// Request descriptors, response classification and the HTTP transport
pub mod http;
/// Request models for API calls
pub mod requests;
/// Response models from API calls
pub mod responses;
