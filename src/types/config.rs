use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::Error;

pub const CREDENTIAL_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";
pub const BIND_ADDR_VAR: &str = "QA_BIND_ADDR";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// API key for the model service. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank keys are treated as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Process-wide settings, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credential: Option<Credential>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Configuration with defaults and the given credential.
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// A missing credential is not an error here; it surfaces when a query is made.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(CREDENTIAL_VAR).and_then(Credential::new));

        if let Some(model) = lookup(MODEL_VAR) {
            config = config.with_model(model)?;
        }

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = base_url;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs))?;
        }

        let bind = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        config.bind_addr = bind
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("{BIND_ADDR_VAR} is not a socket address: '{bind}'")))?;

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self, Error> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::config("model identifier must not be empty"));
        }
        self.model = model;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        if timeout.is_zero() {
            return Err(Error::config("request timeout must be greater than zero"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The credential, or a configuration error when none was supplied.
    pub fn credential(&self) -> Result<&Credential, Error> {
        self.credential
            .as_ref()
            .ok_or_else(|| Error::config(format!("{CREDENTIAL_VAR} is not set")))
    }
}
