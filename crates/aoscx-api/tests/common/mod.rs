// Shared mock-switch helpers for integration tests.
#![allow(clippy::unwrap_used, dead_code)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aoscx_api::{ResolverOptions, Session, SessionConfig, TlsMode, TransportConfig};

pub const COOKIE: &str = "id=sess-7f3a";
pub const CSRF: &str = "csrf-91bc";

pub fn rest(suffix: &str) -> String {
    format!("/rest/v10.09/{suffix}")
}

pub fn vlan_uri(id: u16) -> String {
    rest(&format!("system/vlans/{id}"))
}

/// Mount the version probe and a login endpoint that issues a session.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latest": { "version": "v10.09", "prefix": "/rest/v10.09" }
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(rest("login")))
        .and(header("x-use-csrf-token", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{COOKIE}; Path=/; HttpOnly").as_str())
                .insert_header("x-csrf-token", CSRF),
        )
        .mount(server)
        .await;
}

pub async fn setup() -> (MockServer, Session) {
    setup_with(ResolverOptions::default()).await
}

pub async fn setup_with(resolver: ResolverOptions) -> (MockServer, Session) {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let config =
        SessionConfig::new(server.uri(), "admin", "secret".to_owned()).with_resolver(resolver);
    let session = Session::connect(config).await.unwrap();
    (server, session)
}

/// Session whose requests give up after `timeout`.
pub async fn setup_with_timeout(timeout: Duration) -> (MockServer, Session) {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let config = SessionConfig::new(server.uri(), "admin", "secret".to_owned())
        .with_transport(TransportConfig::new(TlsMode::DangerAcceptInvalid, timeout));
    let session = Session::connect(config).await.unwrap();
    (server, session)
}

/// A VLAN that already exists on the switch.
pub async fn mount_existing_vlan(server: &MockServer, id: u16) {
    Mock::given(method("GET"))
        .and(path(rest(&format!("system/vlans/{id}"))))
        .and(query_param("selector", "writable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("VLAN{id}"),
            "description": "",
            "admin": "up"
        })))
        .mount(server)
        .await;
}

/// A VLAN the switch does not have yet.
pub async fn mount_missing_vlan(server: &MockServer, id: u16) {
    Mock::given(method("GET"))
        .and(path(rest(&format!("system/vlans/{id}"))))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// Requests the server saw after login, as `(method, path)` pairs.
pub async fn requests_after_login(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.method.to_string(), r.url.path().to_owned()))
        .filter(|(_, p)| p != "/rest" && !p.ends_with("/login"))
        .collect()
}
