//! CLI configuration: `aoscx_config` plus `GlobalOpts` flag overrides.

use aoscx_config::{SwitchConfig, config_path, load_config_from};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the switch config and apply flag overrides (flags > env > file).
pub fn load(global: &GlobalOpts) -> Result<SwitchConfig, CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);
    let mut cfg = load_config_from(&path)?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut SwitchConfig, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        cfg.hostname = Some(host.clone());
    }
    if let Some(ref username) = global.username {
        cfg.username.clone_from(username);
    }
    if let Some(ref version) = global.api_version {
        cfg.version = Some(version.clone());
    }
    if global.insecure {
        cfg.verify_cert = false;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn flags_override_loaded_values() {
        let cli = Cli::parse_from([
            "aoscx",
            "--host",
            "10.0.0.9",
            "-u",
            "netops",
            "--api-version",
            "10.11",
            "--insecure",
            "--timeout",
            "5",
            "version",
        ]);
        let mut cfg = SwitchConfig {
            hostname: Some("10.0.0.5".into()),
            verify_cert: true,
            ..SwitchConfig::default()
        };

        apply_overrides(&mut cfg, &cli.global);

        assert_eq!(cfg.hostname.as_deref(), Some("10.0.0.9"));
        assert_eq!(cfg.username, "netops");
        assert_eq!(cfg.version.as_deref(), Some("10.11"));
        assert!(!cfg.verify_cert);
        assert_eq!(cfg.timeout, 5);
    }
}
