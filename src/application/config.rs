/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_COUNTRY_CODE, DEFAULT_SCOPE, DEFAULT_TIMEOUT_SECS,
    PRODUCTION_API_HOST, PRODUCTION_AUTH_URL, SANDBOX_API_HOST, SANDBOX_AUTH_URL,
};
use crate::error::AppError;
use crate::utils::config::{get_env_flag, get_env_or_default, get_env_or_none};
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error};

/// Deployment environment of the pandago API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox environment, used for integration testing
    #[default]
    Sandbox,
    /// Live environment
    Production,
}

impl Environment {
    /// Base URL of the auth server for this environment
    #[must_use]
    pub fn auth_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_AUTH_URL,
            Environment::Production => PRODUCTION_AUTH_URL,
        }
    }

    /// Base URL of the resource API for this environment.
    ///
    /// The sandbox is only deployed in the `sg` region, so `country_code`
    /// is ignored there.
    #[must_use]
    pub fn api_url(&self, country_code: &str, version: &str) -> String {
        match self {
            Environment::Sandbox => format!("{SANDBOX_API_HOST}/api/{version}"),
            Environment::Production => {
                format!("{PRODUCTION_API_HOST}/{country_code}/api/{version}")
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::InvalidInput(format!(
                "unknown environment '{other}', expected 'sandbox' or 'production'"
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
/// Credentials identifying this client to the pandago auth server
pub struct Credentials {
    /// OAuth client id, also used as issuer and subject of the assertion
    pub client_id: String,
    /// Key id placed in the assertion header (`kid`)
    pub key_id: String,
    /// PEM encoded RSA private key used to sign the assertion
    pub private_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("key_id", &self.key_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Main configuration for the pandago API client
pub struct Config {
    /// Target environment
    pub environment: Environment,
    /// Country code used in production URLs
    pub country_code: String,
    /// Resource API version, e.g. `v1`
    pub version: String,
    /// Authentication credentials
    #[serde(skip_serializing)]
    pub credentials: Credentials,
    /// OAuth scope requested with every token
    pub scope: String,
    /// Enables request and error logging
    pub debug: bool,
    /// Timeout in seconds for HTTP requests
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// A `.env` file is loaded first when present. Missing required
    /// credentials are reported with `error!`; use [`Config::validate`] to
    /// turn them into a hard failure.
    pub fn new() -> Self {
        load_dotenv();
        let private_key = load_private_key_from_env().unwrap_or_else(|e| {
            error!("Failed to load private key: {e}");
            String::new()
        });
        Self::from_env_with_key(private_key)
    }

    /// Creates a new configuration from environment variables, failing
    /// instead of logging.
    ///
    /// # Returns
    /// * `Ok(Config)` - A configuration that passed [`Config::validate`]
    /// * `Err(AppError::Io)` - If `PANDAGO_PRIVATE_KEY_PATH` cannot be read
    /// * `Err(AppError::Config)` - If a required value is missing or malformed
    pub fn try_new() -> Result<Self, AppError> {
        load_dotenv();
        let config = Self::from_env_with_key(load_private_key_from_env()?);
        config.validate()?;
        Ok(config)
    }

    fn from_env_with_key(private_key: String) -> Self {
        let environment = get_env_or_default("PANDAGO_ENV", Environment::Sandbox);
        let client_id = get_env_or_default("PANDAGO_CLIENT_ID", String::new());
        let key_id = get_env_or_default("PANDAGO_KEY_ID", String::new());

        if client_id.is_empty() {
            error!("PANDAGO_CLIENT_ID not found in environment variables or .env file");
        }
        if key_id.is_empty() {
            error!("PANDAGO_KEY_ID not found in environment variables or .env file");
        }
        if private_key.is_empty() {
            error!(
                "PANDAGO_PRIVATE_KEY or PANDAGO_PRIVATE_KEY_PATH not found in environment variables or .env file"
            );
        }

        Config {
            environment,
            country_code: get_env_or_default(
                "PANDAGO_COUNTRY_CODE",
                String::from(DEFAULT_COUNTRY_CODE),
            ),
            version: get_env_or_default("PANDAGO_API_VERSION", String::from(DEFAULT_API_VERSION)),
            credentials: Credentials {
                client_id,
                key_id,
                private_key,
            },
            scope: get_env_or_default("PANDAGO_SCOPE", String::from(DEFAULT_SCOPE)),
            debug: get_env_flag("PANDAGO_DEBUG", false),
            timeout_secs: get_env_or_default("PANDAGO_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Creates a sandbox configuration with the given credentials and default settings
    pub fn with_credentials(
        client_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Config {
            environment: Environment::Sandbox,
            country_code: String::from(DEFAULT_COUNTRY_CODE),
            version: String::from(DEFAULT_API_VERSION),
            credentials: Credentials {
                client_id: client_id.into(),
                key_id: key_id.into(),
                private_key: private_key.into(),
            },
            scope: String::from(DEFAULT_SCOPE),
            debug: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Replaces the private key with the PEM file at `path`
    pub fn with_private_key_file(mut self, path: impl AsRef<Path>) -> Result<Self, AppError> {
        self.credentials.private_key = read_private_key(path)?;
        Ok(self)
    }

    /// Sets the target environment
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the country code used in production URLs
    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    /// Sets the resource API version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the requested OAuth scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Enables or disables request and error logging
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the HTTP timeout in seconds
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL of the auth server
    #[must_use]
    pub fn auth_url(&self) -> &'static str {
        self.environment.auth_url()
    }

    /// Base URL of the resource API
    #[must_use]
    pub fn api_url(&self) -> String {
        self.environment.api_url(&self.country_code, &self.version)
    }

    /// Checks that the required credentials are present
    ///
    /// # Returns
    /// * `Ok(())` - If the configuration can be used to sign assertions
    /// * `Err(AppError::Config)` - Naming the first offending field
    pub fn validate(&self) -> Result<(), AppError> {
        if self.credentials.client_id.trim().is_empty() {
            return Err(AppError::Config("client_id is required".to_string()));
        }
        if self.credentials.key_id.trim().is_empty() {
            return Err(AppError::Config("key_id is required".to_string()));
        }
        if !self.credentials.private_key.contains("-----BEGIN") {
            return Err(AppError::Config(
                "private_key must be a PEM encoded RSA key".to_string(),
            ));
        }
        if self.country_code.trim().is_empty() || self.version.trim().is_empty() {
            return Err(AppError::Config(
                "country_code and version must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads the PEM key inline from `PANDAGO_PRIVATE_KEY` or from the file named by
/// `PANDAGO_PRIVATE_KEY_PATH`. Escaped `\n` sequences are unfolded so the key can
/// live on a single line of a `.env` file.
fn load_private_key_from_env() -> Result<String, AppError> {
    if let Some(inline) = get_env_or_none::<String>("PANDAGO_PRIVATE_KEY") {
        return Ok(inline.replace("\\n", "\n"));
    }
    match get_env_or_none::<String>("PANDAGO_PRIVATE_KEY_PATH") {
        Some(path) => read_private_key(path),
        None => Ok(String::new()),
    }
}

fn read_private_key(path: impl AsRef<Path>) -> Result<String, AppError> {
    let path = path.as_ref();
    debug!("Reading private key from {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

fn load_dotenv() {
    match dotenv() {
        Ok(_) => debug!("Successfully loaded .env file"),
        Err(e) => debug!("Failed to load .env file: {e}"),
    }
}
