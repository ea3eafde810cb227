use serde::Serialize;

use aoscx_api::{fetch_latest_api_version, normalize_version, switch_url};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::{self, FieldRow};

#[derive(Debug, Serialize)]
struct View {
    host: String,
    latest: String,
}

/// Probe `GET /rest` without logging in.
pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let host = cfg
        .hostname
        .clone()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| CliError::NoConfig {
            path: aoscx_config::config_path().display().to_string(),
        })?;

    let transport = aoscx_api::TransportConfig::new(
        cfg.tls_mode(),
        std::time::Duration::from_secs(cfg.timeout),
    );
    let http = transport.build_client()?;
    let base = switch_url(&host)?;

    let latest = fetch_latest_api_version(&http, &base)
        .await
        .map_err(|e| CliError::from_connect(e, &host))?;

    let view = View {
        host,
        latest: normalize_version(&latest),
    };
    let out = output::render_single(global.output, &view, |v| {
        vec![
            FieldRow::new("host", &v.host),
            FieldRow::new("latest", &v.latest),
        ]
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
