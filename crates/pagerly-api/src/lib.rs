// pagerly-api: blocking transport, request builder, and error taxonomy for the
// PagerDuty v2 REST API.

pub mod auth;
pub mod client;
pub mod error;
pub mod request;
pub mod transport;

pub use auth::{DEFAULT_BASE_URL, Defaults, init_defaults};
pub use client::{ApiClient, ClientConfig};
pub use error::Error;
pub use request::{ApiRequest, Params, QueryValue, Reference, RequestOptions};
pub use transport::{HttpTransport, RawResponse, TlsMode, Transport, TransportConfig, classify};

// Re-exported so downstream crates name methods without a direct reqwest dep.
pub use reqwest::Method;
