//! Runtime configuration for the remote file service.
//!
//! Every value has a documented default so a session can be built without any
//! environment; `from_env` overrides individual values.

use std::env;
use std::time::Duration;

use crate::resolve::SubfolderTemplate;
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const ENV_API_BASE_URL: &str = "DOCATTACH_API_BASE_URL";
const ENV_SUBFOLDER_TEMPLATE: &str = "DOCATTACH_SUBFOLDER_TEMPLATE";
const ENV_PREVIEW_RELEASE_MS: &str = "DOCATTACH_PREVIEW_RELEASE_MS";

/// Base URL of the file service when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
/// Grace period before a previewed blob is released.
pub const DEFAULT_PREVIEW_RELEASE_DELAY: Duration = Duration::from_millis(5000);

/// Remote file service configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the file service, without a trailing slash.
    pub base_url: String,
    /// Naming rule for per-record attachment folders.
    pub subfolder_template: SubfolderTemplate,
    /// How long a previewed blob stays available to the viewer.
    pub preview_release_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            subfolder_template: SubfolderTemplate::default(),
            preview_release_delay: DEFAULT_PREVIEW_RELEASE_DELAY,
        }
    }
}

impl ServiceConfig {
    /// Build a default configuration pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            ..Self::default()
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; invalid values are rejected.
    pub fn from_env() -> Result<Self> {
        parse_config(|key| env::var(key).ok())
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::default();

    if let Some(base_url) = normalize_text_option(lookup(ENV_API_BASE_URL)) {
        config.base_url = normalize_base_url(&base_url)?;
    }

    if let Some(template) = normalize_text_option(lookup(ENV_SUBFOLDER_TEMPLATE)) {
        config.subfolder_template = SubfolderTemplate::new(template)?;
    }

    if let Some(raw_ms) = normalize_text_option(lookup(ENV_PREVIEW_RELEASE_MS)) {
        let millis = raw_ms.parse::<u64>().map_err(|error| {
            Error::InvalidInput(format!(
                "{ENV_PREVIEW_RELEASE_MS} must be a number of milliseconds: {error}"
            ))
        })?;
        config.preview_release_delay = Duration::from_millis(millis);
    }

    Ok(config)
}

/// Trim a base URL, drop trailing slashes, and require an http(s) scheme.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::InvalidInput(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(&base) {
        return Err(Error::InvalidInput(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}
