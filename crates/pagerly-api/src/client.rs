// API client: the configuration object threaded through every call.
//
// Holds the optional explicit API key and base URL plus the injected
// transport. Credentials are resolved per call so a client built before
// `init_defaults` still picks the defaults up.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth;
use crate::error::Error;
use crate::request::{self, RequestOptions};
use crate::transport::{self, HttpTransport, Transport, TransportConfig};

/// Settings for building an [`ApiClient`] over HTTP.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// `None` defers to the process defaults, then the public API host.
    pub base_url: Option<Url>,
    /// `None` defers to the process defaults.
    pub api_key: Option<SecretString>,
    pub transport: TransportConfig,
}

/// Blocking client for the REST API.
///
/// Cheap to clone; entities keep a clone as their back-reference to the
/// credentials and base address they were fetched with.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build an HTTP-backed client from a [`ClientConfig`].
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(&config.transport)?;
        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            transport: Arc::new(transport),
        })
    }

    /// Build a client over any [`Transport`] (tests, custom HTTP stacks).
    pub fn with_transport(
        base_url: Option<Url>,
        api_key: Option<SecretString>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url,
            api_key,
            transport,
        }
    }

    /// Same transport and base URL, different key.
    pub fn with_api_key(&self, api_key: SecretString) -> Self {
        Self {
            api_key: Some(api_key),
            ..self.clone()
        }
    }

    /// Same transport and key, different base URL.
    pub fn with_base_url(&self, base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
            ..self.clone()
        }
    }

    /// The base URL this client sends to, after default resolution.
    pub fn base_url(&self) -> Result<Url, Error> {
        auth::resolve_base_url(self.base_url.as_ref())
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Build, send and classify one request.
    ///
    /// Fails with `Error::Configuration` before any I/O when no API key
    /// resolves.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Option<Value>, Error> {
        let api_key = auth::resolve_api_key(self.api_key.as_ref())?;
        let base_url = self.base_url()?;
        let request = request::build_request(method, &base_url, path, &api_key, options)?;

        debug!(
            method = %request.method,
            url = %request.url,
            query = ?request.query,
            "sending request"
        );

        let response = self.transport.send(&request)?;
        transport::classify(response)
    }

    pub fn get(&self, path: &str, options: &RequestOptions) -> Result<Option<Value>, Error> {
        self.request(Method::GET, path, options)
    }

    pub fn post(&self, path: &str, options: &RequestOptions) -> Result<Option<Value>, Error> {
        self.request(Method::POST, path, options)
    }

    pub fn put(&self, path: &str, options: &RequestOptions) -> Result<Option<Value>, Error> {
        self.request(Method::PUT, path, options)
    }

    pub fn delete(&self, path: &str, options: &RequestOptions) -> Result<Option<Value>, Error> {
        self.request(Method::DELETE, path, options)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::request::{ApiRequest, Params};
    use crate::transport::RawResponse;

    /// Records requests and answers every call with one canned response.
    struct Canned {
        status: u16,
        body: String,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_owned(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for Canned {
        fn send(&self, request: &ApiRequest) -> Result<RawResponse, Error> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(RawResponse {
                status: self.status,
                url: request.url.clone(),
                body: self.body.clone(),
            })
        }
    }

    fn client(transport: Arc<Canned>, key: Option<&str>) -> ApiClient {
        ApiClient::with_transport(
            Some(Url::parse("https://api.example.test").unwrap()),
            key.map(|k| SecretString::from(k.to_string())),
            transport,
        )
    }

    #[test]
    fn missing_key_fails_before_io() {
        let transport = Canned::new(200, "{}");
        let err = client(Arc::clone(&transport), None)
            .get("users", &RequestOptions::new())
            .unwrap_err();

        assert!(matches!(err, Error::Configuration { .. }));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn invalid_header_fails_before_io() {
        let transport = Canned::new(200, "{}");
        let options = RequestOptions::new().header("From", "a\r\nb");
        let err = client(Arc::clone(&transport), Some("k"))
            .get("users", &options)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidHeaders { .. }));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn with_base_url_keeps_key_and_transport() {
        let transport = Canned::new(204, "");
        let events = client(Arc::clone(&transport), Some("k"))
            .with_base_url(Url::parse("https://events.example.test/v1/").unwrap());
        events.post("enqueue", &RequestOptions::new()).unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url.as_str(), "https://events.example.test/v1/enqueue");
        assert!(seen[0].headers.contains_key("authorization"));
    }

    #[test]
    fn request_is_built_and_classified() {
        let transport = Canned::new(200, r#"{"users":[]}"#);
        let options = RequestOptions::new().query(Params::new().with("query", "bob"));
        let value = client(Arc::clone(&transport), Some("k"))
            .get("users", &options)
            .unwrap();

        assert_eq!(value, Some(json!({"users": []})));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::GET);
        assert_eq!(seen[0].url.as_str(), "https://api.example.test/users");
        assert_eq!(seen[0].query, vec![("query".to_owned(), "bob".to_owned())]);
    }

    #[test]
    fn with_api_key_keeps_transport() {
        let transport = Canned::new(204, "");
        let base = client(Arc::clone(&transport), None);
        let keyed = base.with_api_key(SecretString::from("k2".to_string()));

        assert_eq!(keyed.delete("users/P1", &RequestOptions::new()).unwrap(), None);
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", client(Canned::new(200, ""), Some("secret-key")));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("REDACTED"));
    }
}
