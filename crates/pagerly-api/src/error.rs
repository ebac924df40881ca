use serde_json::Value;
use thiserror::Error;

/// Top-level error type shared by every `pagerly` crate.
///
/// Covers the whole caller-visible taxonomy: configuration, request building,
/// HTTP status classification, response shape, and entity lifecycle.
/// `pagerly-core` re-exports it unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// No API key could be resolved, or process defaults were misused.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Request building ────────────────────────────────────────────
    /// A caller-supplied header name or value is not valid HTTP.
    #[error("Invalid headers: {name:?} ({reason})")]
    InvalidHeaders { name: String, reason: String },

    /// An operation received malformed input.
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// An action that needs an acting user was called without one.
    #[error("MissingFromEmail (400): {operation} requires a valid 'from' email")]
    MissingFromEmail { operation: String },

    // ── HTTP status classification ──────────────────────────────────
    /// The server answered 404.
    #[error("Not found: {url}")]
    NotFound { url: String, body: String },

    /// The server answered with a 4xx other than 404.
    ///
    /// `code` is the envelope's error code when the body carried one,
    /// otherwise the HTTP status.
    #[error("BadRequest ({code}): {message}{}", sub_errors(.errors))]
    BadRequest {
        status: u16,
        code: i64,
        message: String,
        errors: Vec<Value>,
        body: String,
    },

    /// Any other non-2xx status.
    #[error("UnknownError ({status}) at {url}: {body}")]
    Unknown {
        status: u16,
        url: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body that is not JSON, or a JSON body of the wrong shape.
    #[error("InvalidResponse: {message}")]
    InvalidResponse { message: String, body: String },

    // ── Entity lifecycle ────────────────────────────────────────────
    /// The entity has no backing snapshot yet.
    #[error("{resource} entity is uninitialized")]
    Uninitialized { resource: String },

    /// A mutating call on an instance that was already deleted.
    #[error("{resource} {id} has been deleted")]
    Deleted { resource: String, id: String },

    /// The snapshot lacks a field the operation depends on.
    #[error("{resource} entity has no '{field}' field")]
    MissingField { resource: String, field: String },

    /// The operation is disabled for this resource kind.
    #[error("Unsupported operation: {operation} on {resource}")]
    UnsupportedOperation { resource: String, operation: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),
}

// ── Server error envelope ───────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<Value>,
}

fn sub_errors(errors: &[Value]) -> String {
    match errors {
        [] => String::new(),
        [single] => format!(" - {}", render(single)),
        many => {
            let joined: Vec<String> = many.iter().map(render).collect();
            format!(" - [{}]", joined.join(", "))
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Error {
    /// Build a `BadRequest` from a 4xx status and its raw body.
    ///
    /// When the body matches `{"error": {"code", "message", "errors"}}` the
    /// code, message and sub-errors are taken from it.
    pub fn bad_request(status: u16, body: String) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(ErrorEnvelope { error }) => Self::BadRequest {
                status,
                code: error.code.unwrap_or_else(|| i64::from(status)),
                message: error.message.unwrap_or_else(|| body.clone()),
                errors: error.errors,
                body,
            },
            Err(_) => Self::BadRequest {
                status,
                code: i64::from(status),
                message: body.clone(),
                errors: Vec::new(),
                body,
            },
        }
    }

    pub fn invalid_response(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            body: body.into(),
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if this error was raised locally, before any request.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::InvalidHeaders { .. }
                | Self::InvalidArguments { .. }
                | Self::MissingFromEmail { .. }
                | Self::Uninitialized { .. }
                | Self::Deleted { .. }
                | Self::MissingField { .. }
                | Self::UnsupportedOperation { .. }
        )
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::BadRequest { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::BadRequest { status, .. } | Self::Unknown { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
