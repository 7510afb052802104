//! Configuration for the invoice relay.

use std::time::Duration;

/// Provider API configuration constants.
pub mod api {
    use std::time::Duration;

    /// QuickBooks authorization endpoint (browser redirect target).
    pub const AUTHORIZE_ENDPOINT: &str = "https://appcenter.intuit.com/connect/oauth2";

    /// QuickBooks token endpoint (code/token exchange).
    pub const TOKEN_ENDPOINT: &str = "https://oauth.platform.intuit.com/oauth2/v1/tokens/bearer";

    /// Accounting API base URL for the sandbox environment.
    pub const SANDBOX_API: &str = "https://sandbox-quickbooks.api.intuit.com";

    /// Accounting API base URL for the production environment.
    pub const PRODUCTION_API: &str = "https://quickbooks.api.intuit.com";

    /// Scopes requested during authorization: accounting read plus identity.
    pub const SCOPES: &str = "com.intuit.quickbooks.accounting openid";

    /// Query-language statement for the full invoice collection.
    pub const INVOICE_QUERY: &str = "select * from Invoice";

    /// API minor version pinned for invoice queries.
    pub const MINOR_VERSION: &str = "40";

    /// Request timeout for provider calls.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default listen port.
    pub const DEFAULT_PORT: u16 = 3000;
}

/// Name of the session cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "relay_session";

/// Minimum length for the cookie-signing secret.
const MIN_SECRET_LEN: usize = 32;

/// Target provider environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Sandbox companies (development).
    #[default]
    Sandbox,
    /// Live companies.
    Production,
}

impl Environment {
    /// Accounting API base URL for this environment.
    #[must_use]
    pub const fn api_base_url(self) -> &'static str {
        match self {
            Self::Sandbox => api::SANDBOX_API,
            Self::Production => api::PRODUCTION_API,
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => anyhow::bail!("unknown environment '{other}' (expected sandbox or production)"),
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client id issued by the provider.
    pub client_id: String,

    /// OAuth client secret issued by the provider.
    pub client_secret: String,

    /// Provider environment (selects the accounting API base URL).
    pub environment: Environment,

    /// Redirect URL registered with the provider (the `/callback` route).
    pub redirect_url: String,

    /// Secret keying the signed session cookie (at least 32 bytes).
    pub session_secret: String,

    /// Listen port.
    pub port: u16,

    /// Authorization endpoint (overridable for tests).
    pub authorize_endpoint: String,

    /// Token endpoint (overridable for tests).
    pub token_endpoint: String,

    /// Accounting API base URL (overridable for tests).
    pub api_base_url: String,

    /// Request timeout for provider calls.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration for the given credentials and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the session secret is shorter than 32 bytes;
    /// the signed-cookie key derivation requires that much entropy.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
        redirect_url: impl Into<String>,
        session_secret: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let session_secret = session_secret.into();
        if session_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes");
        }

        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment,
            redirect_url: redirect_url.into(),
            session_secret,
            port: api::DEFAULT_PORT,
            authorize_endpoint: api::AUTHORIZE_ENDPOINT.to_string(),
            token_endpoint: api::TOKEN_ENDPOINT.to_string(),
            api_base_url: environment.api_base_url().to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        })
    }

    /// Create a test configuration with every provider URL pointed at a
    /// mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            environment: Environment::Sandbox,
            redirect_url: "http://localhost:3000/callback".to_string(),
            session_secret: "0123456789abcdef0123456789abcdef0123456789abcdef".to_string(),
            port: 0,
            authorize_endpoint: format!("{base_url}/connect/oauth2"),
            token_endpoint: format!("{base_url}/oauth2/v1/tokens/bearer"),
            api_base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `CLIENT_ID`, `CLIENT_SECRET`, `ENVIRONMENT`, `REDIRECT_URL`,
    /// `SESSION_SECRET`, and optionally `PORT`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let require = |name: &str| {
            std::env::var(name).map_err(|_| anyhow::anyhow!("missing environment variable {name}"))
        };

        let environment: Environment = require("ENVIRONMENT")?.parse()?;
        let mut config = Self::new(
            require("CLIENT_ID")?,
            require("CLIENT_SECRET")?,
            environment,
            require("REDIRECT_URL")?,
            require("SESSION_SECRET")?,
        )?;

        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().map_err(|_| anyhow::anyhow!("invalid PORT '{port}'"))?;
        }

        Ok(config)
    }
}
