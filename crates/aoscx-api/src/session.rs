// Authenticated switch session and request execution
//
// A `Session` only exists after a successful login, so every request it
// issues carries both the session cookie and the CSRF token. Resource
// modules build URLs through it and judge the returned status themselves.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::resolver::{ResolverOptions, VlanResolver};
use crate::transport::{TlsMode, TransportConfig};

/// API version used when the switch does not advertise one and the caller
/// did not pin one.
pub const DEFAULT_API_VERSION: &str = "v10.09";

/// Header carrying the anti-forgery token on every request.
pub(crate) const CSRF_HEADER: &str = "x-csrf-token";

// ── Configuration ────────────────────────────────────────────────────

/// Everything [`Session::connect`] needs to reach and log into a switch.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Switch address. A bare host (`10.0.0.5`) is reached over `https://`;
    /// a value with an explicit scheme is used as given.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Version to fall back to when the switch cannot be probed.
    pub version: Option<String>,
    pub transport: TransportConfig,
    /// Pre-built HTTP client. When set, `transport` is ignored.
    pub http: Option<reqwest::Client>,
    pub resolver: ResolverOptions,
}

impl SessionConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            version: None,
            transport: TransportConfig::default(),
            http: None,
            resolver: ResolverOptions::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Verify the switch certificate against the system store, or skip
    /// verification entirely.
    pub fn verify_certificate(mut self, verify: bool) -> Self {
        self.transport.tls = TlsMode::from_verify_flag(verify);
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverOptions) -> Self {
        self.resolver = resolver;
        self
    }
}

// ── Response ─────────────────────────────────────────────────────────

/// A normalized switch response.
///
/// `body` is only populated for successful GETs that returned a JSON
/// object; everything else leaves it empty and the caller judges `status`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Map<String, Value>,
}

impl ApiResponse {
    fn empty(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            body: Map::new(),
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Cookie and CSRF token issued by the switch at login. Always held as a
/// pair.
#[derive(Debug)]
pub(crate) struct SessionCredential {
    pub(crate) cookie: SecretString,
    pub(crate) csrf_token: SecretString,
}

/// An authenticated session against one switch.
///
/// Created by [`Session::connect`]. Safe to share between tasks; the
/// library adds no locking of its own except around VLAN auto-provisioning.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    version: String,
    credential: SessionCredential,
    resolver: VlanResolver,
}

impl Session {
    pub(crate) fn from_parts(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        version: String,
        credential: SessionCredential,
        resolver: ResolverOptions,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            version,
            credential,
            resolver: VlanResolver::new(resolver),
        }
    }

    /// The negotiated REST API version, always prefixed with `v`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The switch root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The VLAN dependency resolver scoped to this session.
    pub fn resolver(&self) -> &VlanResolver {
        &self.resolver
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Versioned path of a REST object, e.g. `/rest/v10.09/system/vlans/10`.
    ///
    /// This is the form the switch uses for cross-references between
    /// objects, so it doubles as a resource's URI.
    pub fn rest_path(&self, path: &str) -> String {
        format!("/rest/{}/{}", self.version, path.trim_start_matches('/'))
    }

    /// Full URL for a versioned REST path. `path` may carry a query string.
    pub fn rest_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&self.rest_path(path))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(ACCEPT, "*/*")
            .header(COOKIE, self.credential.cookie.expose_secret())
            .header(CSRF_HEADER, self.credential.csrf_token.expose_secret())
    }

    /// Send a GET and parse a JSON object body when there is one.
    ///
    /// 4xx answers come back with an empty body (absent objects are an
    /// ordinary outcome), 5xx answers are logged. Unparseable bodies are
    /// tolerated and also produce an empty body.
    pub async fn get(&self, url: Url) -> Result<ApiResponse, Error> {
        debug!("GET {}", url);

        let resp = self
            .authorize(self.http.get(url))
            .header(CONTENT_TYPE, "text/plain")
            .send()
            .await?;

        Ok(Self::read_object(resp).await)
    }

    /// Send a POST with a JSON body.
    pub async fn post(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<ApiResponse, Error> {
        debug!("POST {}", url);
        trace!(body = %json_preview(body), "request body");

        let resp = self.authorize(self.http.post(url)).json(body).send().await?;
        Ok(Self::finish_write(resp).await)
    }

    /// Send a PUT with a JSON body.
    pub async fn put(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<ApiResponse, Error> {
        debug!("PUT {}", url);
        trace!(body = %json_preview(body), "request body");

        let resp = self.authorize(self.http.put(url)).json(body).send().await?;
        Ok(Self::finish_write(resp).await)
    }

    /// Send a PATCH with a JSON body.
    pub async fn patch(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        debug!("PATCH {}", url);
        trace!(body = %json_preview(body), "request body");

        let resp = self.authorize(self.http.patch(url)).json(body).send().await?;
        Ok(Self::finish_write(resp).await)
    }

    /// Send a DELETE.
    pub async fn delete(&self, url: Url) -> Result<ApiResponse, Error> {
        debug!("DELETE {}", url);

        let resp = self
            .authorize(self.http.delete(url))
            .header(CONTENT_TYPE, "text/plain")
            .send()
            .await?;

        Ok(Self::finish_write(resp).await)
    }

    async fn read_object(resp: reqwest::Response) -> ApiResponse {
        let status = resp.status();
        let headers = resp.headers().clone();

        if status.is_server_error() {
            warn!(%status, "switch returned a server error");
            return ApiResponse::empty(status, headers);
        }
        if !status.is_success() {
            return ApiResponse::empty(status, headers);
        }

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to read response body");
                return ApiResponse::empty(status, headers);
            }
        };
        if text.is_empty() {
            return ApiResponse::empty(status, headers);
        }

        if !content_type.is_empty() && !content_type.contains("json") {
            warn!(content_type, "response is not JSON, ignoring body");
            return ApiResponse::empty(status, headers);
        }

        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(body) => ApiResponse {
                status,
                headers,
                body,
            },
            Err(e) => {
                let preview: String = text.chars().take(200).collect();
                warn!(error = %e, body = %preview, "failed to decode JSON response");
                ApiResponse::empty(status, headers)
            }
        }
    }

    async fn finish_write(resp: reqwest::Response) -> ApiResponse {
        let status = resp.status();
        let headers = resp.headers().clone();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(%status, body = %body, "write rejected by switch");
        }

        ApiResponse::empty(status, headers)
    }
}

fn json_preview(body: &impl Serialize) -> String {
    serde_json::to_string(body).unwrap_or_default()
}

/// Resolve the configured host into the switch root URL.
pub fn switch_url(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(Error::validation("host", "must not be empty"));
    }
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    Ok(Url::parse(&raw)?)
}
