//! Credentials and endpoint configuration.
//!
//! Defaults point at the production service. Select the sandbox with
//! [`Environment::Sandbox`], or point at any host with [`AvaTaxConfig::host`].

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::core::ConfigError;

/// Sandbox (development) host.
pub const SANDBOX_HOST: &str = "development.avalara.net";

/// Production host.
pub const PRODUCTION_HOST: &str = "avatax.avalara.net";

/// Newest API version this library knows how to talk to.
pub const API_VERSION_MAX: &str = "1.0";

/// Client identifier sent with GetTax unless overridden or disabled.
pub const DEFAULT_CLIENT: &str = concat!("avatax-rs,", env!("CARGO_PKG_VERSION"));

const JSON: &str = "application/json";

/// Account credentials for HTTP Basic authentication.
///
/// Custom `Debug` implementation redacts the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` if either value is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic <base64 of "username:password">`.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

/// Which well-known AvaTax host to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Sandbox,
    #[default]
    Production,
}

impl Environment {
    pub fn host(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_HOST,
            Self::Production => PRODUCTION_HOST,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "development" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(ConfigError::InvalidValue(
                "environment".into(),
                format!("expected sandbox or production, got '{other}'"),
            )),
        }
    }
}

/// Whether `version` sorts after [`API_VERSION_MAX`].
///
/// The comparison is lexical, so "1.10" does not exceed "1.9".
pub fn version_exceeds_known(version: &str) -> bool {
    version > API_VERSION_MAX
}

/// Configuration for an [`crate::AvaTaxClient`].
#[derive(Debug, Clone)]
pub struct AvaTaxConfig {
    credentials: Credentials,
    environment: Environment,
    host: Option<String>,
    version: String,
    default_client: Option<String>,
}

impl AvaTaxConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            environment: Environment::default(),
            host: None,
            version: API_VERSION_MAX.to_string(),
            default_client: Some(DEFAULT_CLIENT.to_string()),
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the host entirely. Accepts a bare host name (HTTPS is
    /// assumed) or a full base URL such as `http://127.0.0.1:8080`. A blank
    /// value clears the override.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into()).filter(|h| !h.trim().is_empty());
        self
    }

    /// API version path prefix, e.g. "1.0".
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Client identifier sent with GetTax requests that do not name one.
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.default_client = Some(client.into());
        self
    }

    /// Send no client identifier by default.
    pub fn disable_client(mut self) -> Self {
        self.default_client = None;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `AVATAX_USERNAME`, `AVATAX_PASSWORD` (required)
    /// - `AVATAX_ENVIRONMENT` (`sandbox` or `production`, default: production)
    /// - `AVATAX_HOST` (overrides the environment host)
    /// - `AVATAX_API_VERSION` (default: `1.0`)
    /// - `AVATAX_CLIENT` (an empty value disables the client identifier)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        };
        let credentials = Credentials::new(required("AVATAX_USERNAME")?, required("AVATAX_PASSWORD")?)?;

        let mut config = Self::new(credentials);
        if let Some(env) = lookup("AVATAX_ENVIRONMENT") {
            config.environment = env
                .parse()
                .map_err(|_| ConfigError::InvalidValue("AVATAX_ENVIRONMENT".into(), env.clone()))?;
        }
        if let Some(host) = lookup("AVATAX_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = Some(host);
        }
        if let Some(version) = lookup("AVATAX_API_VERSION").filter(|v| !v.is_empty()) {
            config.version = version;
        }
        if let Some(client) = lookup("AVATAX_CLIENT") {
            config.default_client = Some(client).filter(|c| !c.is_empty());
        }
        Ok(config)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_version(&self) -> &str {
        &self.version
    }

    pub fn default_client(&self) -> Option<&str> {
        self.default_client.as_deref()
    }

    /// Host resolution: explicit override, else the environment's host.
    pub fn resolved_host(&self) -> &str {
        self.host
            .as_deref()
            .unwrap_or_else(|| self.environment.host())
    }

    /// Base URL all request paths are joined onto.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let host = self.resolved_host();
        let raw = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Url::parse(&raw).map_err(|e| ConfigError::InvalidHost(host.to_string(), e.to_string()))
    }

    /// `/<version>/<operation>`.
    pub fn api_path(&self, operation: &str) -> String {
        format!("/{}/{}", self.version, operation.trim_start_matches('/'))
    }

    /// A fresh header set for one request.
    pub fn request_headers(&self) -> Result<HeaderMap, ConfigError> {
        let mut authorization = HeaderValue::from_str(&self.credentials.authorization_header())
            .map_err(|e| ConfigError::InvalidValue("Authorization".into(), e.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(AUTHORIZATION, authorization);
        Ok(headers)
    }
}
