//! Process settings and the HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use campus_backend::domain::Email;
use campus_backend::domain::ports::PrincipalBootstrapRequest;
use campus_backend::inbound::http::session_config::SessionSettings;
use campus_backend::outbound::persistence::PoolConfig;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PRINCIPAL_NAME: &str = "Principal";

/// Settings loaded from `CAMPUS_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAMPUS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Principal account created on startup when no principal exists.
    pub principal_email: Option<String>,
    pub principal_password: Option<String>,
    pub principal_name: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("principal email and password must be set together")]
    IncompletePrincipal,
    #[error("invalid principal email: {message}")]
    PrincipalEmail { message: String },
}

impl AppSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool configuration when a database URL is present.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.trim().is_empty())?;
        let config = PoolConfig::new(url);
        Some(match self.pool_max_size {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }

    /// Bootstrap request for the principal, if one was configured.
    pub fn principal_bootstrap(&self) -> Result<Option<PrincipalBootstrapRequest>, SettingsError> {
        let email = self.principal_email.as_deref().filter(|v| !v.trim().is_empty());
        let password = self.principal_password.as_deref().filter(|v| !v.is_empty());
        match (email, password) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => {
                let email = Email::new(email).map_err(|err| SettingsError::PrincipalEmail {
                    message: err.to_string(),
                })?;
                Ok(Some(PrincipalBootstrapRequest {
                    name: self
                        .principal_name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PRINCIPAL_NAME.to_owned()),
                    email,
                    password: Zeroizing::new(password.to_owned()),
                }))
            }
            _ => Err(SettingsError::IncompletePrincipal),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
