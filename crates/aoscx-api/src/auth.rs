// Session login/logout and API version negotiation
//
// The switch advertises its REST versions at `/rest`. Probing is best
// effort: any failure falls back to the pinned or default version and
// login proceeds. Login exchanges username/password for a session cookie
// plus a CSRF token, both of which every later request must present.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::session::{
    self, CSRF_HEADER, DEFAULT_API_VERSION, Session, SessionConfig, SessionCredential,
};

/// `GET /rest` response; only the latest advertised version matters.
#[derive(Deserialize)]
struct ApiVersions {
    latest: Option<ApiVersion>,
}

#[derive(Deserialize)]
struct ApiVersion {
    version: Option<String>,
}

impl Session {
    /// Connect to a switch and log in.
    ///
    /// Builds an HTTP client from `config.transport` unless one is supplied,
    /// negotiates the API version, then logs in. Login failures are returned
    /// as [`Error::Authentication`] without retrying.
    pub async fn connect(config: SessionConfig) -> Result<Self, Error> {
        let SessionConfig {
            host,
            username,
            password,
            version,
            transport,
            http,
            resolver,
        } = config;

        let http = match http {
            Some(http) => http,
            None => transport.build_client()?,
        };
        let base_url = session::switch_url(&host)?;

        let version = match fetch_latest_api_version(&http, &base_url).await {
            Ok(latest) => {
                info!(version = %latest, "using switch's latest API version");
                latest
            }
            Err(e) => {
                let fallback = version
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_owned());
                warn!(error = %e, %fallback, "could not fetch latest API version, using fallback");
                fallback
            }
        };
        let version = normalize_version(&version);

        let credential = login(&http, &base_url, &version, &username, &password).await?;

        Ok(Self::from_parts(
            http, base_url, username, version, credential, resolver,
        ))
    }

    /// End the session on the switch.
    ///
    /// `POST /rest/{version}/logout`. The in-memory credential is left as
    /// is; drop the session afterwards.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.rest_url("logout")?;
        debug!("logging out at {}", url);

        let resp = self.authorize(self.http().post(url)).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Session {
                message: format!("logout failed with status: {status}"),
            });
        }

        info!("logout successful");
        Ok(())
    }
}

/// Ask the switch which REST versions it speaks and return the latest.
pub async fn fetch_latest_api_version(
    http: &reqwest::Client,
    base_url: &Url,
) -> Result<String, Error> {
    let url = base_url.join("/rest")?;
    debug!("probing API versions at {}", url);

    let resp = http
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(Error::request("API version probe", status));
    }

    let body = resp.text().await?;
    let versions: ApiVersions =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("failed to parse API version response: {e}"),
        })?;

    versions
        .latest
        .and_then(|latest| latest.version)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Deserialization {
            message: "latest version not found in API response".into(),
        })
}

/// Ensure the version carries its leading `v` marker.
pub fn normalize_version(version: &str) -> String {
    let version = version.trim();
    if version.starts_with('v') {
        version.to_owned()
    } else {
        format!("v{version}")
    }
}

async fn login(
    http: &reqwest::Client,
    base_url: &Url,
    version: &str,
    username: &str,
    password: &SecretString,
) -> Result<SessionCredential, Error> {
    let mut url = base_url.join(&format!("/rest/{version}/login"))?;
    debug!("logging in at {}", url);
    url.query_pairs_mut()
        .append_pair("username", username)
        .append_pair("password", password.expose_secret());

    let resp = http
        .post(url)
        .header(ACCEPT, "*/*")
        .header("x-use-csrf-token", "true")
        .send()
        .await
        // The URL carries the password in its query string.
        .map_err(|e| Error::Transport(e.without_url()))?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(Error::Authentication {
            message: format!("login failed with status: {status}"),
        });
    }

    let csrf_token = resp
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| SecretString::from(v.to_owned()))
        .ok_or_else(|| Error::Authentication {
            message: "no CSRF token received from switch".into(),
        })?;

    let cookie = resp
        .cookies()
        .next()
        .map(|c| SecretString::from(format!("{}={}", c.name(), c.value())))
        .ok_or_else(|| Error::Authentication {
            message: "no cookies received from switch".into(),
        })?;

    info!(username, "login successful");
    Ok(SessionCredential { cookie, csrf_token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_gets_leading_marker() {
        assert_eq!(normalize_version("10.13"), "v10.13");
        assert_eq!(normalize_version("v10.09"), "v10.09");
        assert_eq!(normalize_version(" 10.04 "), "v10.04");
    }
}
