//! Service configuration and external-config loading.
//!
//! # Design
//! Settings are looked up by `<SERVICE_NAME>_<KEY>`, first in the process
//! environment and then in the `KEY=value` credentials file named by
//! `IBM_CREDENTIALS_FILE`. The lookup is injected so loading can be tested
//! without touching the real environment.

use std::collections::HashMap;
use std::fs;

use log::debug;

use crate::auth::Authenticator;
use crate::error::ApiError;

pub const DEFAULT_SERVICE_URL: &str = "https://us-south.iaas.cloud.ibm.com/v1";
pub const DEFAULT_SERVICE_NAME: &str = "vpc_classic";
/// API version date sent as `version` on every call.
pub const DEFAULT_VERSION: &str = "2020-06-02";
/// Classic infrastructure is generation 1.
pub const DEFAULT_GENERATION: u32 = 1;

const CREDENTIALS_FILE_VAR: &str = "IBM_CREDENTIALS_FILE";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_url: String,
    pub version: String,
    pub generation: u32,
    pub authenticator: Authenticator,
    /// Sent with every request, before per-call headers.
    pub default_headers: Vec<(String, String)>,
}

impl ServiceConfig {
    pub fn new(authenticator: Authenticator) -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            generation: DEFAULT_GENERATION,
            authenticator,
            default_headers: Vec::new(),
        }
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Load settings for `service_name` from the environment and the
    /// credentials file.
    pub fn from_env(service_name: &str) -> Result<Self, ApiError> {
        let file = match std::env::var(CREDENTIALS_FILE_VAR) {
            Ok(path) => {
                let contents = fs::read_to_string(&path)
                    .map_err(|e| ApiError::Config(format!("reading {path}: {e}")))?;
                debug!("loaded credentials file {path}");
                parse_credentials(&contents)
            }
            Err(_) => HashMap::new(),
        };
        Self::from_lookup(service_name, |key| {
            std::env::var(key).ok().or_else(|| file.get(key).cloned())
        })
    }

    /// Load settings for `service_name` through `lookup`.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = service_name.to_ascii_uppercase().replace('-', "_");
        let get = |key: &str| lookup(&format!("{prefix}_{key}")).filter(|v| !v.is_empty());

        let auth_type = get("AUTH_TYPE").unwrap_or_else(|| "noauth".to_string());
        let authenticator = match auth_type.to_ascii_lowercase().as_str() {
            "noauth" => Authenticator::NoAuth,
            "bearertoken" => Authenticator::BearerToken(
                get("BEARER_TOKEN").ok_or_else(|| missing(&prefix, "BEARER_TOKEN"))?,
            ),
            "basic" => Authenticator::Basic {
                username: get("USERNAME").ok_or_else(|| missing(&prefix, "USERNAME"))?,
                password: get("PASSWORD").ok_or_else(|| missing(&prefix, "PASSWORD"))?,
            },
            other => {
                return Err(ApiError::Config(format!(
                    "unsupported authentication type `{other}`"
                )))
            }
        };

        let mut config = ServiceConfig::new(authenticator);
        if let Some(url) = get("URL") {
            config.service_url = url;
        }
        if let Some(version) = get("VERSION") {
            config.version = version;
        }
        if let Some(generation) = get("GENERATION") {
            config.generation = generation
                .parse()
                .map_err(|_| ApiError::Config(format!("invalid {prefix}_GENERATION `{generation}`")))?;
        }
        debug!(
            "configured {service_name}: url={} auth={}",
            config.service_url,
            config.authenticator.auth_type()
        );
        Ok(config)
    }
}

fn missing(prefix: &str, key: &str) -> ApiError {
    ApiError::Config(format!("{prefix}_{key} is not set"))
}

/// Parse `KEY=value` lines, skipping blanks and `#` comments.
pub(crate) fn parse_credentials(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}
