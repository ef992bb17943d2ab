//! End-to-end session tests against a mock credential service.

use std::sync::Arc;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use authgate::{AuthSession, AuthStatus, HttpCredentialService, MemoryTokenStore, TokenStore, TOKEN_KEY};

fn session_against(server: &MockServer, store: Arc<MemoryTokenStore>) -> AuthSession {
    let service = Arc::new(HttpCredentialService::new(server.uri()).unwrap());
    AuthSession::new(store, service)
}

#[tokio::test]
async fn sign_in_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .and(body_json(serde_json::json!({ "id": "user", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = session_against(&server, store.clone());

    session.log_in("user", "secret").await;

    assert_eq!(session.token(), "tok-1");
    assert_eq!(session.error(), "");
    assert!(!session.is_loading());
    assert_eq!(session.status(), AuthStatus::Authenticated);
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn rejected_sign_in_surfaces_error_and_skips_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = session_against(&server, store.clone());

    session.log_in("user", "wrong").await;

    assert_eq!(session.token(), "");
    assert_eq!(session.error(), "Invalid credentials or expired token");
    assert_eq!(session.status(), AuthStatus::Failed);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn server_error_is_reported_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let session = session_against(&server, Arc::new(MemoryTokenStore::new()));
    session.log_in("user", "secret").await;

    assert_eq!(session.error(), "Server error: database down");
}

#[tokio::test]
async fn resume_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .and(header("authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.set(TOKEN_KEY, "tok-9").unwrap();
    let session = session_against(&server, store);

    session.resume().await;

    assert_eq!(session.token(), "tok-9");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn resume_with_expired_token_fails_but_keeps_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.set(TOKEN_KEY, "tok-stale").unwrap();
    let session = session_against(&server, store.clone());

    session.resume().await;

    assert_eq!(session.token(), "tok-stale");
    assert_eq!(session.status(), AuthStatus::Failed);
    assert_eq!(session.error(), "Invalid credentials or expired token");
    // only log_out clears persistence
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-stale"));
}

#[tokio::test]
async fn log_out_after_sign_in_clears_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok-2" })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = session_against(&server, store.clone());

    session.log_in("user", "secret").await;
    assert!(session.is_authenticated());

    session.log_out();

    assert_eq!(session.token(), "");
    assert_eq!(session.status(), AuthStatus::Idle);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn malformed_sign_in_response_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let session = session_against(&server, Arc::new(MemoryTokenStore::new()));
    session.log_in("user", "secret").await;

    assert_eq!(session.status(), AuthStatus::Failed);
    assert!(session.error().starts_with("Invalid response"));
}
