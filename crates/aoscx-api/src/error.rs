use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `aoscx-api` crate.
///
/// Covers every failure mode of the client: local validation, session
/// authentication, VLAN dependency resolution, unexpected HTTP statuses,
/// and transport failures. Nothing in this crate terminates the process;
/// every failure comes back to the immediate caller as one of these.
#[derive(Debug, Error)]
pub enum Error {
    // ── Validation ──────────────────────────────────────────────────
    /// A field failed local format or enum checks. Never reaches the network.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    // ── Session ─────────────────────────────────────────────────────
    /// Login was rejected, or the switch did not hand back a session
    /// cookie and CSRF token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The switch refused to terminate the session.
    #[error("Session error: {message}")]
    Session { message: String },

    // ── Configuration ───────────────────────────────────────────────
    /// A referenced VLAN could neither be read nor created.
    #[error("VLAN {vlan_id} not found and unable to create: {source}")]
    Dependency {
        vlan_id: u16,
        #[source]
        source: Box<Error>,
    },

    /// The switch answered with a status other than the one expected
    /// for the operation.
    #[error("{operation} failed: {status}")]
    Request {
        operation: &'static str,
        status: StatusCode,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (bad CA file, TLS backend).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A response body did not have the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String },
}

impl Error {
    /// Returns `true` if the switch answered 404 for the object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Request { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Returns `true` if the request never got an answer (connection,
    /// TLS or timeout). The outcome of a write is then unknown.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the error was raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The HTTP status behind this error, if the switch answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::Dependency { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn request(operation: &'static str, status: StatusCode) -> Self {
        Self::Request { operation, status }
    }
}
