use crate::allowed_methods::AllowedMethods;
use crate::base_url::FixedBaseUrl;
use crate::constants::cors::WILDCARD;
use crate::memory::DEFAULT_PRINCIPAL_HEADER;
use crate::result::CorsError;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REPOSITORY: &str = "default";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;
const DEFAULT_ANONYMOUS_PRINCIPAL: &str = "Guest";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address
    pub bind_addr: IpAddr,
    /// Listen port
    pub port: u16,
    /// Externally visible root URL, always ending with `/`
    pub base_url: Url,
    /// CORS authorized origins (`*` allows any)
    pub allowed_origins: Vec<String>,
    /// Methods granted on preflight
    pub allow_methods: AllowedMethods,
    /// Repository uploads are imported into
    pub repository: String,
    /// Upload body limit in bytes
    pub max_upload_bytes: usize,
    /// Header naming the authenticated caller
    pub principal_header: String,
    /// Principal used when the caller header is absent (None = reject)
    pub anonymous_principal: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: default_base_url(DEFAULT_PORT),
            allowed_origins: vec![WILDCARD.to_string()],
            allow_methods: AllowedMethods::default(),
            repository: DEFAULT_REPOSITORY.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            principal_header: DEFAULT_PRINCIPAL_HEADER.to_string(),
            anonymous_principal: Some(DEFAULT_ANONYMOUS_PRINCIPAL.to_string()),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("SCENARI_BIND_ADDR") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SCENARI_BIND_ADDR", value))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT", value))?,
            None => DEFAULT_PORT,
        };

        let base_url = match lookup("SCENARI_BASE_URL") {
            Some(value) => FixedBaseUrl::new(
                Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl(value))?,
            )
            .into_url(),
            None => default_base_url(port),
        };

        // Unset keeps the permissive default; an explicit empty value allows nothing.
        let allowed_origins = match lookup("SCENARI_ALLOWED_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => vec![WILDCARD.to_string()],
        };

        let allow_methods = match lookup("SCENARI_ALLOW_METHODS") {
            Some(value) => AllowedMethods::list(value.split(',').map(str::trim))?,
            None => AllowedMethods::default(),
        };

        let repository = lookup("SCENARI_REPOSITORY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());

        let max_upload_bytes = match lookup("SCENARI_MAX_UPLOAD_BYTES") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SCENARI_MAX_UPLOAD_BYTES", value))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let principal_header = lookup("SCENARI_PRINCIPAL_HEADER")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PRINCIPAL_HEADER.to_string());

        let anonymous_principal = match lookup("SCENARI_ANONYMOUS_PRINCIPAL") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.trim().to_string()),
            None => Some(DEFAULT_ANONYMOUS_PRINCIPAL.to_string()),
        };

        Ok(Self {
            bind_addr,
            port,
            base_url,
            allowed_origins,
            allow_methods,
            repository,
            max_upload_bytes,
            principal_header,
            anonymous_principal,
        })
    }
}

fn default_base_url(port: u16) -> Url {
    let raw = format!("http://localhost:{port}/");
    Url::parse(&raw).unwrap_or_else(|err| unreachable!("{raw} is a valid URL: {err}"))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid CORS configuration: {0}")]
    Cors(#[from] CorsError),
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
