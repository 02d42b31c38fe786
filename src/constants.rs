/// Maximum number of token-refresh retries for a single call (three attempts in total)
pub const MAX_RETRIES: u32 = 2;
/// User agent string used in HTTP requests to identify this client to the pandago API
pub const USER_AGENT: &str = "Rust-Pandago-Client/0.1.0";
/// Default request timeout in seconds for the HTTP transport
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Auth server used by the sandbox environment
pub const SANDBOX_AUTH_URL: &str = "https://sts-st.deliveryhero.io";
/// Auth server used by the production environment
pub const PRODUCTION_AUTH_URL: &str = "https://sts.deliveryhero.io";
/// Resource API host for the sandbox environment (always the `sg` region)
pub const SANDBOX_API_HOST: &str = "https://pandago-api-sandbox.deliveryhero.io/sg";
/// Resource API host for production, the country code is appended to it
pub const PRODUCTION_API_HOST: &str = "https://pandago-api-apse.deliveryhero.io";
/// Audience claim of the client assertion.
///
/// The production issuer is used for both environments.
pub const ASSERTION_AUDIENCE: &str = "https://sts.deliveryhero.io";
/// Path of the OAuth2 token endpoint on the auth server
pub const TOKEN_PATH: &str = "/oauth2/token";

/// OAuth2 grant type used to obtain access tokens
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
/// Assertion type announcing a signed JWT as client credential
pub const CLIENT_ASSERTION_TYPE_JWT_BEARER: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Default country code for production URLs
pub const DEFAULT_COUNTRY_CODE: &str = "tw";
/// Default resource API version
pub const DEFAULT_API_VERSION: &str = "v1";
/// Default OAuth scope
pub const DEFAULT_SCOPE: &str = "pandago.api.sg.*";

/// Length of generated client order ids
pub const CLIENT_ORDER_ID_LENGTH: usize = 24;
/// Lifetime in seconds of a signed client assertion (`exp - iat`)
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;
