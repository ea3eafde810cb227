//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use aoscx_api::Error as ApiError;
use aoscx_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const DEPENDENCY: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to switch at {host}")]
    #[diagnostic(
        code(aoscx::connection_failed),
        help(
            "Check that the switch is reachable and its REST API is enabled\n\
             (`https-server rest access-mode read-write`)."
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(aoscx::tls_error),
        help("Use --insecure (-k) for self-signed certificates, or set ca_cert in the config file.")
    )]
    Tls { message: String },

    #[error("Request to switch failed: {message}")]
    #[diagnostic(code(aoscx::transport))]
    Transport { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(aoscx::timeout),
        help("Increase the timeout with --timeout or check the switch's load.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(aoscx::auth_failed),
        help(
            "Verify the username and password. The switch also refuses logins\n\
             when its REST session limit is reached."
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for {username}@{hostname}")]
    #[diagnostic(
        code(aoscx::no_credentials),
        help("Set AOSCX_PASSWORD, store it in the system keyring, or add it to the config file.")
    )]
    NoCredentials { hostname: String, username: String },

    #[error("Session error: {message}")]
    #[diagnostic(code(aoscx::session))]
    Session { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(aoscx::not_found))]
    NotFound {
        resource_type: &'static str,
        identifier: String,
    },

    #[error("VLAN {vlan_id} could not be read or created")]
    #[diagnostic(
        code(aoscx::dependency),
        help("The referenced VLAN is missing and the switch rejected creating it: {reason}")
    )]
    Dependency { vlan_id: u16, reason: String },

    #[error("Switch rejected {operation}: {status}")]
    #[diagnostic(code(aoscx::api_error))]
    Api { operation: String, status: String },

    #[error("Unexpected response from switch: {message}")]
    #[diagnostic(code(aoscx::protocol))]
    Protocol { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aoscx::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No switch configured")]
    #[diagnostic(
        code(aoscx::no_config),
        help(
            "Pass --host, set AOSCX_HOSTNAME, or set hostname in the config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(aoscx::config))]
    Config(Box<figment::Error>),

    // ── Output ───────────────────────────────────────────────────────

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } | Self::Transport { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Dependency { .. } => exit_code::DEPENDENCY,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Errors raised while connecting, where transport failures mean the
    /// switch is unreachable.
    pub fn from_connect(err: ApiError, host: &str) -> Self {
        if matches!(&err, ApiError::Transport(e) if !e.is_timeout()) {
            return Self::ConnectionFailed {
                host: host.to_owned(),
                source: err,
            };
        }
        err.into()
    }

    /// Attach the resource identity to "not found" answers.
    pub fn for_resource(err: ApiError, resource_type: &'static str, identifier: &str) -> Self {
        if err.is_not_found() {
            Self::NotFound {
                resource_type,
                identifier: identifier.to_owned(),
            }
        } else {
            err.into()
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            ApiError::Authentication { message } => Self::AuthFailed { message },
            ApiError::Session { message } => Self::Session { message },
            ApiError::Dependency { vlan_id, source } => Self::Dependency {
                vlan_id,
                reason: source.to_string(),
            },
            ApiError::Request { operation, status } => Self::Api {
                operation: operation.into(),
                status: status.to_string(),
            },
            ApiError::Transport(e) if e.is_timeout() => Self::Timeout,
            ApiError::Transport(e) => Self::Transport {
                message: e.to_string(),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ApiError::Tls(message) => Self::Tls { message },
            ApiError::Deserialization { message } => Self::Protocol { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, .. } if field == "hostname" => Self::NoConfig {
                path: aoscx_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { hostname, username } => {
                Self::NoCredentials { hostname, username }
            }
            ConfigError::Figment(err) => Self::Config(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aoscx_api::{AdminState, Choice};

    use super::*;

    #[test]
    fn missing_hostname_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "hostname".into(),
            reason: "no switch configured".into(),
        });
        assert!(matches!(err, CliError::NoConfig { .. }));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn library_validation_keeps_field() {
        let err = CliError::from(AdminState::from_field("sideways").unwrap_err());
        match &err {
            CliError::Validation { field, reason } => {
                assert_eq!(field, "admin");
                assert!(reason.contains("'up', 'down'"), "{reason}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn for_resource_passes_other_errors_through() {
        let err = CliError::for_resource(
            AdminState::from_field("x").unwrap_err(),
            "LAG",
            "lag60",
        );
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
