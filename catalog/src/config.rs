use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_UPSTREAM_URL: &str = "https://rickandmortyapi.com/api";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Listener and admin listener cannot share {0}")]
    ListenerConflict(String),

    #[error("Unsupported upstream scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Upstream timeout must be greater than 0")]
    InvalidTimeout,

    #[error("Resident fan-out concurrency must be greater than 0")]
    InvalidConcurrency,
}

/// Catalog front-end configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for the public HTML and JSON routes
    #[serde(default)]
    pub listener: Listener,
    /// Listener for health and readiness probes
    #[serde(default = "Listener::admin")]
    pub admin_listener: Listener,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub residents: ResidentsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listener: Listener::default(),
            admin_listener: Listener::admin(),
            upstream: UpstreamConfig::default(),
            residents: ResidentsConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.listener == self.admin_listener {
            return Err(ValidationError::ListenerConflict(self.listener.address()));
        }

        self.upstream.validate()?;

        if self.residents.max_concurrency == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8888,
        }
    }
}

impl Listener {
    fn admin() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8889,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// The catalog REST API being proxied
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL that resource paths (`character`, `episode`, `location`) are appended to
    pub url: Url,
    /// Applies to each upstream call, from connect until the body is read
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            url: Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream URL is valid"),
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResidentsConfig {
    /// Resident lookups in flight at once for a single location page
    pub max_concurrency: usize,
}

impl Default for ResidentsConfig {
    fn default() -> Self {
        ResidentsConfig { max_concurrency: 8 }
    }
}
