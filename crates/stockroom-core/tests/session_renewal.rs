//! Integration tests for bearer injection and refresh-and-retry

use std::sync::Arc;

use serde_json::json;
use stockroom_core::api::error::UNREACHABLE_MESSAGE;
use stockroom_core::api::{ApiClient, ApiError, ApiRequest};
use stockroom_core::auth::{
    CredentialStore, MemoryCredentialStore, SessionEvent, TerminationReason, REFRESH_TOKEN_KEY,
    TOKEN_KEY,
};
use tokio::sync::broadcast::Receiver;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with(server: &MockServer, store: &Arc<MemoryCredentialStore>) -> ApiClient {
    ApiClient::new(server.uri(), store.clone()).unwrap()
}

fn stored(store: &MemoryCredentialStore) -> (Option<String>, Option<String>) {
    (
        store.get(TOKEN_KEY).unwrap(),
        store.get(REFRESH_TOKEN_KEY).unwrap(),
    )
}

fn drain(rx: &mut Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn terminations(events: &[SessionEvent]) -> usize {
    events.iter().filter(|e| e.is_terminated()).count()
}

fn categories_page() -> serde_json::Value {
    json!({
        "success": true,
        "message": "ok",
        "data": {
            "data": [{"id": "c1", "name": "Minuman", "description": "", "createdAt": null, "updatedAt": null}],
            "pagination": {
                "total_data": 1, "total_page": 1, "total_display": 1,
                "first_page": true, "last_page": true,
                "prev": null, "current": 1, "next": null, "detail": [1]
            }
        }
    })
}

async fn mount_refresh(server: &MockServer, refresh_token: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .and(body_json(json!({ "refreshToken": refresh_token })))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn renewed_tokens(token: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "message": "Token refreshed",
        "data": { "token": token, "refreshToken": refresh }
    }))
}

#[tokio::test]
async fn test_bearer_header_attached_when_token_stored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/all"))
        .and(header("authorization", "Bearer T1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_page()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);

    let response = client
        .execute(&ApiRequest::get("/api/categories/all"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_page()))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_with(&server, &store);
    client
        .execute(&ApiRequest::get("/api/categories/all"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_expired_token_is_renewed_and_request_replayed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories/all"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false, "message": "Token expired", "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/all"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_page()))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", renewed_tokens("T2", "R2"), 1).await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let page = client
        .list_categories(&Default::default())
        .await
        .unwrap();
    assert_eq!(page.data[0].name, "Minuman");

    assert_eq!(stored(&store), (Some("T2".to_string()), Some("R2".to_string())));
    assert_eq!(drain(&mut events), vec![SessionEvent::Renewed]);

    // the refresh call itself carries no bearer token
    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/api/auth/refresh-token")
        .unwrap();
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_rejected_refresh_clears_session_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/all"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({
            "success": false, "message": "Refresh token expired", "data": null
        })),
        1,
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let err = client
        .execute(&ApiRequest::get("/api/products/all"))
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected(message) => assert_eq!(message, "Refresh token expired"),
        other => panic!("expected refresh rejection, got {:?}", other),
    }

    assert_eq!(stored(&store), (None, None));
    let events = drain(&mut events);
    assert_eq!(terminations(&events), 1);
    assert_eq!(
        events,
        vec![SessionEvent::Terminated(TerminationReason::RefreshFailed)]
    );
}

#[tokio::test]
async fn test_refresh_endpoint_error_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/store/all"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(401).set_body_json(json!({
            "success": false, "message": "Invalid refresh token"
        })),
        1,
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let err = client
        .execute(&ApiRequest::get("/api/store/all"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Invalid refresh token");

    assert_eq!(stored(&store), (None, None));
    assert_eq!(terminations(&drain(&mut events)), 1);
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/akun/all"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false, "message": "Token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", renewed_tokens("T2", "R2"), 0).await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.set(TOKEN_KEY, "T1").unwrap();
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let err = client
        .execute(&ApiRequest::get("/api/akun/all"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Token expired");

    assert_eq!(stored(&store), (None, None));
    assert_eq!(
        drain(&mut events),
        vec![SessionEvent::Terminated(TerminationReason::MissingRefreshToken)]
    );
}

#[tokio::test]
async fn test_second_401_passes_through_without_second_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/quotations/all"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false, "message": "Not allowed"
        })))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", renewed_tokens("T2", "R2"), 1).await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let err = client
        .execute(&ApiRequest::get("/api/quotations/all"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Not allowed");

    // the renewed pair is kept; only the replayed call failed
    assert_eq!(stored(&store), (Some("T2".to_string()), Some("R2".to_string())));
    assert_eq!(drain(&mut events), vec![SessionEvent::Renewed]);

    let requests = server.received_requests().await.unwrap();
    let replay = requests
        .iter()
        .filter(|r| r.url.path() == "/api/quotations/all")
        .nth(1)
        .unwrap();
    assert_eq!(
        replay.headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer T2"
    );
}

#[tokio::test]
async fn test_forbidden_passes_through_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/store/delete"))
        .and(body_json(json!({ "id": "5" })))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false, "message": "You do not have permission to delete stores"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", renewed_tokens("T2", "R2"), 0).await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let err = client.delete_store("5").await.unwrap_err();
    assert!(matches!(err, ApiError::AccessDenied(_)));
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.message(), "You do not have permission to delete stores");

    assert_eq!(stored(&store), (Some("T1".to_string()), Some("R1".to_string())));
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/products/create"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);

    let err = client
        .execute(&ApiRequest::post("/api/products/create").json(&json!({})).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServerError { status: 500, .. }));
    assert_eq!(err.message(), "boom");
}

#[tokio::test]
async fn test_unreachable_server_never_refreshes() {
    // nothing listens on port 1
    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = ApiClient::new("http://127.0.0.1:1", store.clone()).unwrap();
    let mut events = client.subscribe();

    let err = client
        .execute(&ApiRequest::get("/api/categories/all"))
        .await
        .unwrap_err();
    assert!(err.is_unreachable());
    assert_eq!(err.to_string(), UNREACHABLE_MESSAGE);
    assert_eq!(
        UNREACHABLE_MESSAGE,
        "Server is unreachable. Please check your connection or try again later."
    );
    assert_eq!(err.status(), None);

    assert_eq!(stored(&store), (Some("T1".to_string()), Some("R1".to_string())));
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "message": "ok", "data": {}
        })))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", renewed_tokens("T2", "R2"), 1).await;

    let store = Arc::new(MemoryCredentialStore::with_credentials("T1", "R1"));
    let client = client_with(&server, &store);

    let stores = ApiRequest::get("/api/store/all");
    let products = ApiRequest::get("/api/products/all");
    let (a, b) = tokio::join!(client.execute(&stores), client.execute(&products));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(stored(&store), (Some("T2".to_string()), Some("R2".to_string())));
}

/// Memory store whose write of one specific refresh token fails.
struct RefusingStore {
    inner: MemoryCredentialStore,
    refused: &'static str,
}

impl CredentialStore for RefusingStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if key == REFRESH_TOKEN_KEY && value == self.refused {
            anyhow::bail!("keychain write denied");
        }
        self.inner.set(key, value)
    }

    fn clear(&self, key: &str) -> anyhow::Result<()> {
        self.inner.clear(key)
    }
}

#[tokio::test]
async fn test_renewed_pair_that_cannot_be_saved_ends_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories/all"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/all"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_page()))
        .expect(0)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", renewed_tokens("T2", "R2"), 1).await;

    let store = Arc::new(RefusingStore {
        inner: MemoryCredentialStore::with_credentials("T1", "R1"),
        refused: "R2",
    });
    let client = ApiClient::new(server.uri(), store.clone()).unwrap();
    let mut events = client.subscribe();

    let err = client
        .execute(&ApiRequest::get("/api/categories/all"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    // Neither the new access token nor the spent refresh token survives.
    assert_eq!(stored(&store.inner), (None, None));
    assert_eq!(
        drain(&mut events),
        vec![SessionEvent::Terminated(TerminationReason::RefreshFailed)]
    );
}

#[tokio::test]
async fn test_login_pair_that_cannot_be_saved_leaves_store_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login success",
            "data": { "token": "T9", "refreshToken": "R9" }
        })))
        .mount(&server)
        .await;

    let store = Arc::new(RefusingStore {
        inner: MemoryCredentialStore::with_credentials("T1", "R1"),
        refused: "R9",
    });
    let client = ApiClient::new(server.uri(), store.clone()).unwrap();
    let mut events = client.subscribe();

    client.login("admin@example.com", "secret").await.unwrap();

    assert_eq!(stored(&store.inner), (None, None));
    assert!(drain(&mut events).is_empty());
    assert!(!client.is_authenticated());
}
