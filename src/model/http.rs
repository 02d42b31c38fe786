/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! HTTP plumbing shared by token acquisition and resource calls.
//!
//! A [`RequestDescriptor`] describes one call. It is handed to an
//! [`HttpTransport`], which returns the raw status and body, and
//! [`into_result`] turns that into either the parsed JSON body or a
//! normalized [`AppError`].

use crate::constants::USER_AGENT;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Header map of a request, kept ordered so logs are stable
pub type Headers = BTreeMap<String, String>;

const REDACTED: &str = "<redacted>";

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document, used by every resource endpoint
    Json(Value),
    /// `application/x-www-form-urlencoded` fields, used by the token endpoint
    Form(Vec<(String, String)>),
}

/// Everything needed to issue one HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP verb
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Optional body
    pub body: Option<RequestBody>,
}

impl RequestDescriptor {
    /// Creates a descriptor without headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Attaches a JSON body
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attaches form fields
    #[must_use]
    pub fn with_form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Adds a single header, replacing any previous value
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns a copy of this descriptor whose headers are exactly `headers`
    #[must_use]
    pub fn with_headers(&self, headers: Headers) -> Self {
        Self {
            method: self.method.clone(),
            url: self.url.clone(),
            headers,
            body: self.body.clone(),
        }
    }

    /// Copy safe for logging: bearer tokens and client assertions are masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.clone(), format!("Bearer {REDACTED}"))
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect();
        let body = match &self.body {
            Some(RequestBody::Form(fields)) => Some(RequestBody::Form(
                fields
                    .iter()
                    .map(|(k, v)| {
                        if k == "client_assertion" {
                            (k.clone(), REDACTED.to_string())
                        } else {
                            (k.clone(), v.clone())
                        }
                    })
                    .collect(),
            )),
            other => other.clone(),
        };
        Self {
            method: self.method.clone(),
            url: self.url.clone(),
            headers,
            body,
        }
    }
}

/// Status and body of any HTTP response, successful or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Response status
    pub status: StatusCode,
    /// Response body as text, possibly empty
    pub body: String,
}

impl RawResponse {
    /// Creates a raw response
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Error payload returned by the pandago API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the server supplied `message` field from an error body, if any
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Parses a success body; an empty body (e.g. `204 No Content`) becomes `null`
pub fn parse_body(body: &str) -> Result<Value, AppError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Classifies a raw response.
///
/// # Returns
/// * `Ok(Value)` - Parsed body of a 2xx response
/// * `Err(AppError::Http)` - Any other status, carrying the server message when
///   present and `request failed with status code <code>` otherwise
pub fn into_result(response: RawResponse) -> Result<Value, AppError> {
    if response.status.is_success() {
        return parse_body(&response.body);
    }
    let message = server_message(&response.body).unwrap_or_else(|| {
        format!(
            "request failed with status code {}",
            response.status.as_u16()
        )
    });
    Err(AppError::Http {
        status: response.status,
        message,
    })
}

/// Issues HTTP requests on behalf of the client.
///
/// Implementations return `Ok` for every response that was received,
/// whatever its status, and `Err(AppError::Transport)` when no response was
/// obtained at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the raw response
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, AppError>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest::Client`
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, AppError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
