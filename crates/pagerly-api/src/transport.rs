// Transport: execute exactly one HTTP request and classify the outcome.
//
// `Transport` is the single seam where request execution is swapped out.
// `HttpTransport` drives a blocking `reqwest` client; `classify` is pure and
// shared by every implementation.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::request::ApiRequest;

// ── Configuration ───────────────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for test doubles and intercepting proxies).
    DangerAcceptInvalid,
}

/// Transport configuration for building the blocking HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub proxy: Option<Url>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            proxy: None,
            user_agent: concat!("pagerly/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a blocking `reqwest` client from this config.
    pub fn build_client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        if let Some(ref proxy) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::Tls(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── Seam ────────────────────────────────────────────────────────────

/// Status, final URL and body text of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub url: Url,
    pub body: String,
}

/// Executes a built request. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, Error>;
}

/// Production transport over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            timeout: config.timeout,
        })
    }

    /// Wrap an existing client (caller manages TLS and timeouts).
    pub fn from_client(http: reqwest::blocking::Client) -> Self {
        Self {
            http,
            timeout: TransportConfig::default().timeout,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, Error> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .query(&request.query);

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().map_err(|e| self.map_send_error(e))?;
        let status = resp.status().as_u16();
        let url = resp.url().clone();
        let body = resp.text().map_err(|e| self.map_send_error(e))?;

        Ok(RawResponse { status, url, body })
    }
}

// ── Classification ──────────────────────────────────────────────────

/// Map a raw response onto the error taxonomy, decoding JSON on success.
///
/// A 2xx with an empty body yields `Ok(None)`.
pub fn classify(response: RawResponse) -> Result<Option<Value>, Error> {
    let RawResponse { status, url, body } = response;

    match status {
        404 => {
            debug!(%url, "resource not found");
            return Err(Error::NotFound {
                url: url.to_string(),
                body,
            });
        }
        400..=499 => {
            debug!(status, %url, "request rejected");
            return Err(Error::bad_request(status, body));
        }
        200..=299 => {}
        _ => {
            debug!(status, %url, "unexpected status");
            return Err(Error::Unknown {
                status,
                url: url.to_string(),
                body,
            });
        }
    }

    if body.is_empty() {
        return Ok(None);
    }

    trace!(%url, body = %body, "response body");
    serde_json::from_str(&body).map(Some).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::InvalidResponse {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
