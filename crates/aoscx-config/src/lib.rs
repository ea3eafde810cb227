//! Configuration for AOS-CX switch tools.
//!
//! One switch per config: defaults, then a TOML file, then `AOSCX_*`
//! environment variables. The password is resolved separately
//! (environment, then system keyring, then plaintext) and the result is
//! translated into an [`aoscx_api::SessionConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use aoscx_api::{ResolverOptions, SessionConfig, TlsMode, TransportConfig, TrunkPolicy};

/// Prefix of every environment variable the loader reads.
pub const ENV_PREFIX: &str = "AOSCX_";

/// Environment variable holding the switch password.
pub const PASSWORD_ENV: &str = "AOSCX_PASSWORD";

const KEYRING_SERVICE: &str = "aoscx";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {username}@{hostname}")]
    NoCredentials { hostname: String, username: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Connection settings for one switch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SwitchConfig {
    /// Switch address, e.g. `10.0.0.5` or `https://core-1.example.net`.
    pub hostname: Option<String>,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password. Prefer the keyring or `AOSCX_PASSWORD`.
    pub password: Option<String>,

    /// Verify the switch certificate. Off by default: switches ship with
    /// self-signed certificates.
    #[serde(default, deserialize_with = "flag_or_false")]
    pub verify_cert: bool,

    /// PEM CA bundle used when `verify_cert` is on.
    pub ca_cert: Option<PathBuf>,

    /// API version to fall back to when the switch cannot be probed.
    pub version: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub trunk_policy: TrunkPolicy,

    /// Cache resolved VLAN references for the session.
    #[serde(default, deserialize_with = "flag_or_false")]
    pub cache_vlans: bool,

    /// Look the password up in the system keyring.
    #[serde(default = "default_keyring", deserialize_with = "flag_or_true")]
    pub keyring: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            username: default_username(),
            password: None,
            verify_cert: false,
            ca_cert: None,
            version: None,
            timeout: default_timeout(),
            trunk_policy: TrunkPolicy::default(),
            cache_vlans: false,
            keyring: default_keyring(),
        }
    }
}

fn default_username() -> String {
    "admin".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_keyring() -> bool {
    true
}

// ── Boolean flags ───────────────────────────────────────────────────

/// A boolean as it arrives from TOML or the environment. Figment turns
/// `AOSCX_VERIFY_CERT=1` into an integer and `=t` into a string, so all
/// three shapes are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Str(String),
    Other(serde::de::IgnoredAny),
}

impl Flag {
    /// `1`, `t`, `T`, `TRUE`, `true`, `True` and their `0`/`f` counterparts.
    /// Anything else is ignored.
    fn value(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Int(1) => Some(true),
            Self::Int(0) => Some(false),
            Self::Str(s) => match s.as_str() {
                "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
                "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
                _ => None,
            },
            Self::Int(_) | Self::Other(_) => None,
        }
    }
}

fn flag_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Flag::deserialize(deserializer)?.value().unwrap_or(false))
}

fn flag_or_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Flag::deserialize(deserializer)?.value().unwrap_or(true))
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file location (`~/.config/aoscx/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "aoscx", "aoscx").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("aoscx");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from the platform config file and the environment.
pub fn load_config() -> Result<SwitchConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit TOML file and the environment.
///
/// A missing file is not an error; the environment alone may be enough.
pub fn load_config_from(path: &Path) -> Result<SwitchConfig, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(SwitchConfig::default()))
        .merge(Toml::file(path))
        // The password has its own resolution chain.
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["password"]));

    Ok(figment.extract()?)
}

impl SwitchConfig {
    fn require_hostname(&self) -> Result<&str, ConfigError> {
        match self.hostname.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => Ok(host),
            _ => Err(ConfigError::Validation {
                field: "hostname".into(),
                reason: format!("no switch configured (set {ENV_PREFIX}HOSTNAME or --host)"),
            }),
        }
    }

    /// Resolve the password: `AOSCX_PASSWORD`, then the system keyring
    /// (service `aoscx`, user `<username>@<hostname>`), then the file.
    pub fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        let hostname = self.require_hostname()?;

        if let Ok(pw) = std::env::var(PASSWORD_ENV) {
            return Ok(SecretString::from(pw));
        }

        if self.keyring {
            let user = format!("{}@{hostname}", self.username);
            if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &user) {
                if let Ok(pw) = entry.get_password() {
                    return Ok(SecretString::from(pw));
                }
            }
        }

        if let Some(ref pw) = self.password {
            return Ok(SecretString::from(pw.clone()));
        }

        Err(ConfigError::NoCredentials {
            hostname: hostname.into(),
            username: self.username.clone(),
        })
    }

    pub fn tls_mode(&self) -> TlsMode {
        match (&self.ca_cert, self.verify_cert) {
            (_, false) => TlsMode::DangerAcceptInvalid,
            (Some(ca), true) => TlsMode::CustomCa(ca.clone()),
            (None, true) => TlsMode::System,
        }
    }

    /// Build the session settings for `Session::connect`.
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        let hostname = self.require_hostname()?;
        if self.username.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "username".into(),
                reason: "must not be empty".into(),
            });
        }
        let password = self.resolve_password()?;

        let transport = TransportConfig::new(self.tls_mode(), Duration::from_secs(self.timeout));
        let mut config = SessionConfig::new(hostname, self.username.clone(), password)
            .with_transport(transport)
            .with_resolver(ResolverOptions {
                trunk_policy: self.trunk_policy,
                cache: self.cache_vlans,
            });
        if let Some(version) = self.version.as_deref().filter(|v| !v.trim().is_empty()) {
            config = config.with_version(version);
        }
        Ok(config)
    }
}
