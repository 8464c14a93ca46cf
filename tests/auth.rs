mod common;

use bawk_storefront::auth::AuthChangeEvent;
use bawk_storefront::error::Error;
use bawk_storefront::session::SessionStore;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{session_json, storefront};

#[tokio::test]
async fn test_sign_up_with_metadata() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(header("apikey", "test_anon_key"))
        .and(body_string_contains(r#""role":"admin""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(Some("admin"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = storefront(&mock_server);
    let session = SessionStore::new(store.auth().clone());
    assert!(!session.is_admin());

    let response = session
        .sign_up(
            "ada@example.com",
            "password123",
            Some(json!({ "role": "admin", "full_name": "Ada Lovelace" })),
        )
        .await
        .unwrap();

    assert_eq!(response.user().id, "test_user_id");
    assert!(session.is_admin());
    assert!(session.can_checkout());
    assert_eq!(
        session.current_user().and_then(|u| u.full_name().map(str::to_string)),
        Some("Ada Lovelace".to_string())
    );
}

#[tokio::test]
async fn test_sign_up_pending_confirmation_has_no_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pending_user",
            "email": "new@example.com",
            "role": "authenticated"
        })))
        .mount(&mock_server)
        .await;

    let store = storefront(&mock_server);
    let session = SessionStore::new(store.auth().clone());
    let response = session
        .sign_up("new@example.com", "password123", None)
        .await
        .unwrap();

    assert!(response.session().is_none());
    assert_eq!(response.user().id, "pending_user");
    assert!(session.current_user().is_none());
    assert!(!session.can_checkout());
}

#[tokio::test]
async fn test_rejected_sign_in_is_auth_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&mock_server)
        .await;

    let store = storefront(&mock_server);
    let session = SessionStore::new(store.auth().clone());
    let err = session.sign_in("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn test_auth_state_changes_reach_subscribers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(None)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = storefront(&mock_server);
    let session = SessionStore::new(store.auth().clone());
    let mut subscription = session.subscribe();

    let initial = subscription.try_recv().unwrap();
    assert_eq!(initial.event, AuthChangeEvent::InitialSession);
    assert!(initial.session.is_none());

    store
        .auth()
        .sign_in_with_password("ada@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(session.sync(&mut subscription), 1);
    assert_eq!(
        session.current_user().and_then(|u| u.email),
        Some("ada@example.com".to_string())
    );
    assert!(!session.is_admin());

    session.sign_out().await.unwrap();
    let event = subscription.recv().await.unwrap();
    assert_eq!(event.event, AuthChangeEvent::SignedOut);
    assert!(event.session.is_none());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn test_failed_sign_out_keeps_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(None)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let store = storefront(&mock_server);
    let session = SessionStore::new(store.auth().clone());
    session.sign_in("ada@example.com", "password123").await.unwrap();

    let err = session.sign_out().await.unwrap_err();
    assert_eq!(err.to_string(), "Authentication error: upstream down");
    assert!(session.current_user().is_some());
    assert!(store.auth().get_session().is_some());
}

#[tokio::test]
async fn test_tables_use_user_token_after_sign_in() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(None)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .and(header("apikey", "test_anon_key"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = storefront(&mock_server);
    store
        .auth()
        .sign_in_with_password("ada@example.com", "password123")
        .await
        .unwrap();

    let rows: Vec<serde_json::Value> = store.from("orders").select("*").execute().await.unwrap();
    assert!(rows.is_empty());
}
