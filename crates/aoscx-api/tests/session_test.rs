// Session lifecycle against a mocked switch: version probe, login, logout,
// and the tolerant read path.
#![allow(clippy::unwrap_used)]

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aoscx_api::{DEFAULT_API_VERSION, Error, Session, SessionConfig};

use common::{COOKIE, CSRF, rest};

fn config(server: &MockServer) -> SessionConfig {
    SessionConfig::new(server.uri(), "admin", "secret".to_owned())
}

async fn mount_probe(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn login_ok() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", format!("{COOKIE}; Path=/").as_str())
        .insert_header("x-csrf-token", CSRF)
}

#[tokio::test]
async fn connect_negotiates_latest_version() {
    let server = MockServer::start().await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "latest": { "version": "10.13" } })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/rest/v10.13/login"))
        .and(query_param("username", "admin"))
        .and(query_param("password", "secret"))
        .and(header("x-use-csrf-token", "true"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;

    // The switch's answer wins over a pinned version.
    let session = Session::connect(config(&server).with_version("v10.04"))
        .await
        .unwrap();

    assert_eq!(session.version(), "v10.13");
    assert_eq!(session.username(), "admin");
    assert_eq!(session.rest_path("system/vlans"), "/rest/v10.13/system/vlans");
}

#[tokio::test]
async fn connect_falls_back_to_pinned_version_on_malformed_probe() {
    let server = MockServer::start().await;
    mount_probe(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;
    Mock::given(method("POST"))
        .and(path("/rest/v10.11/login"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::connect(config(&server).with_version("10.11"))
        .await
        .unwrap();

    assert_eq!(session.version(), "v10.11");
}

#[tokio::test]
async fn connect_falls_back_to_default_version() {
    let server = MockServer::start().await;
    mount_probe(&server, ResponseTemplate::new(404)).await;
    Mock::given(method("POST"))
        .and(path(rest("login")))
        .respond_with(login_ok())
        .mount(&server)
        .await;

    let session = Session::connect(config(&server)).await.unwrap();

    assert_eq!(session.version(), DEFAULT_API_VERSION);
}

#[tokio::test]
async fn rejected_login_is_an_authentication_error() {
    let server = MockServer::start().await;
    mount_probe(&server, ResponseTemplate::new(404)).await;
    Mock::given(method("POST"))
        .and(path(rest("login")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = Session::connect(config(&server)).await.unwrap_err();

    match err {
        Error::Authentication { message } => assert!(message.contains("401"), "{message}"),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn login_without_csrf_token_is_rejected() {
    let server = MockServer::start().await;
    mount_probe(&server, ResponseTemplate::new(404)).await;
    Mock::given(method("POST"))
        .and(path(rest("login")))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", COOKIE))
        .mount(&server)
        .await;

    let err = Session::connect(config(&server)).await.unwrap_err();

    match err {
        Error::Authentication { message } => assert!(message.contains("CSRF"), "{message}"),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn login_without_cookie_is_rejected() {
    let server = MockServer::start().await;
    mount_probe(&server, ResponseTemplate::new(404)).await;
    Mock::given(method("POST"))
        .and(path(rest("login")))
        .respond_with(ResponseTemplate::new(200).insert_header("x-csrf-token", CSRF))
        .mount(&server)
        .await;

    let err = Session::connect(config(&server)).await.unwrap_err();

    match err {
        Error::Authentication { message } => assert!(message.contains("cookie"), "{message}"),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_switch_is_a_transport_error() {
    let config = SessionConfig::new("http://127.0.0.1:1", "admin", "secret".to_owned());

    let err = Session::connect(config).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert!(!err.to_string().contains("secret"), "password leaked: {err}");
}

#[tokio::test]
async fn empty_host_is_rejected_before_any_request() {
    let err = Session::connect(SessionConfig::new("", "admin", "secret".to_owned()))
        .await
        .unwrap_err();

    assert!(err.is_validation(), "got {err:?}");
}

#[tokio::test]
async fn requests_carry_session_credentials() {
    let (server, session) = common::setup().await;
    Mock::given(method("GET"))
        .and(path(rest("system")))
        .and(header("cookie", COOKIE))
        .and(header("x-csrf-token", CSRF))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hostname": "core-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = session.get(session.rest_url("system").unwrap()).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.get("hostname"), Some(&json!("core-1")));
}

#[tokio::test]
async fn read_tolerates_malformed_and_failed_responses() {
    let (server, session) = common::setup().await;
    Mock::given(method("GET"))
        .and(path(rest("system/broken")))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rest("system/crashed")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let broken = session
        .get(session.rest_url("system/broken").unwrap())
        .await
        .unwrap();
    assert_eq!(broken.status, 200);
    assert!(broken.body.is_empty());

    let crashed = session
        .get(session.rest_url("system/crashed").unwrap())
        .await
        .unwrap();
    assert_eq!(crashed.status, 503);
    assert!(crashed.body.is_empty());
}

#[tokio::test]
async fn logout_posts_with_credentials() {
    let (server, session) = common::setup().await;
    Mock::given(method("POST"))
        .and(path(rest("logout")))
        .and(header("cookie", COOKIE))
        .and(header("x-csrf-token", CSRF))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    session.logout().await.unwrap();
}

#[tokio::test]
async fn failed_logout_is_a_session_error() {
    let (server, session) = common::setup().await;
    Mock::given(method("POST"))
        .and(path(rest("logout")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = session.logout().await.unwrap_err();

    match err {
        Error::Session { message } => assert!(message.contains("500"), "{message}"),
        other => panic!("expected Session, got {other:?}"),
    }
}
