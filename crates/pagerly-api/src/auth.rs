// Credential resolution and process-wide defaults.
//
// Every request carries `Authorization: Token token=<key>`. The key comes from
// the client that issues the call, falling back to a process default that can
// be set exactly once during setup.

use std::sync::OnceLock;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Root URL used when neither the client nor the defaults name one.
pub const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";

/// Process-wide fallback credentials and base address.
///
/// Read-only once installed via [`init_defaults`].
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    pub api_key: Option<SecretString>,
    pub base_url: Option<Url>,
}

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

/// Install the process-wide defaults. May only be called once.
pub fn init_defaults(defaults: Defaults) -> Result<(), Error> {
    DEFAULTS.set(defaults).map_err(|_| Error::Configuration {
        message: "process defaults are already initialized".into(),
    })
}

/// The installed defaults, if any.
pub fn defaults() -> Option<&'static Defaults> {
    DEFAULTS.get()
}

/// Resolve the API key for one call: explicit → process default → error.
pub fn resolve_api_key(explicit: Option<&SecretString>) -> Result<SecretString, Error> {
    if let Some(key) = explicit {
        return Ok(key.clone());
    }
    defaults()
        .and_then(|d| d.api_key.clone())
        .ok_or_else(|| Error::Configuration {
            message: "no API key configured: pass one to the client or call init_defaults".into(),
        })
}

/// Resolve the base URL for one call: explicit → process default → built-in.
pub fn resolve_base_url(explicit: Option<&Url>) -> Result<Url, Error> {
    if let Some(url) = explicit {
        return Ok(url.clone());
    }
    if let Some(url) = defaults().and_then(|d| d.base_url.clone()) {
        return Ok(url);
    }
    Ok(Url::parse(DEFAULT_BASE_URL)?)
}

/// Build the sensitive `Authorization` header value for a key.
pub fn authorization_header(api_key: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Token token={}", api_key.expose_secret()))
        .map_err(|e| Error::Configuration {
            message: format!("invalid API key header value: {e}"),
        })?;
    value.set_sensitive(true);
    Ok(value)
}
