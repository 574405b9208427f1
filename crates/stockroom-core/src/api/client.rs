//! API client for communicating with the inventory REST API.
//!
//! Every request passes through the same pipeline:
//!
//! 1. the stored access token is attached as `Authorization: Bearer ...`
//! 2. the request is sent
//! 3. a 401 on the first attempt triggers one session renewal through the
//!    refresh endpoint, followed by exactly one replay of the request
//!
//! Anything that cannot be recovered clears the stored credentials and
//! publishes `SessionEvent::Terminated` for the front end to act on.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::request::{ApiRequest, Attempt};
use super::ApiError;
use crate::auth::{
    CredentialStore, Credentials, MemoryCredentialStore, SessionEvent, SessionEvents,
    TerminationReason, REFRESH_TOKEN_KEY, TOKEN_KEY,
};
use crate::models::{ApiResponse, AuthTokens};

// ============================================================================
// Constants
// ============================================================================

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3080";

/// Upper bound for a single HTTP exchange. A call still pending after this
/// long is reported as unreachable.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fixed path of the token refresh endpoint.
const REFRESH_PATH: &str = "/api/auth/refresh-token";

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<AuthTokens>,
}

/// Session-aware API client.
/// Clone is cheap - the HTTP pool, store and event channel are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    events: SessionEvents,
    // Serializes renewals so concurrent 401s share one refresh call.
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a client for `base_url` backed by the given credential store.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        Self::builder().base_url(base_url).credential_store(store).build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Receive session lifecycle events (login, renewal, termination).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Whether an access token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    // ===== Pipeline =====

    /// Send a request, renewing the session once if the server answers 401.
    ///
    /// Returns the successful (2xx) response untouched.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let sent_with = self.access_token();

        match self
            .dispatch(request, sent_with.as_deref(), Attempt::First)
            .await
        {
            Err(err) if err.is_unauthorized() => {
                let token = self.renew_session(sent_with.as_deref(), err).await?;
                self.dispatch(request, Some(&token), Attempt::Retry).await
            }
            result => result,
        }
    }

    /// Send a request once, without session renewal on 401.
    pub(crate) async fn execute_once(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let token = self.access_token();
        self.dispatch(request, token.as_deref(), Attempt::First).await
    }

    /// Execute and decode the `{ success, message, data }` envelope.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.execute(request).await?;
        let text = response.text().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to read response from {}: {}", request.path(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", request.path(), e))
        })
    }

    /// Execute and return the raw body, for PDF endpoints.
    pub async fn call_bytes(&self, request: &ApiRequest) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to read body from {}: {}", request.path(), e))
        })?;
        Ok(bytes.to_vec())
    }

    /// Send one attempt. Non-2xx statuses come back as `ApiError`.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<Response, ApiError> {
        let url = self.url(request.path());
        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .query(request.query_pairs());

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(
            method = %request.method(),
            path = request.path(),
            retry = attempt.is_retry(),
            authenticated = token.is_some(),
            "Sending request"
        );

        let response = builder.send().await.map_err(|e| {
            warn!(path = request.path(), error = %e, "Network error - API server may be down or unreachable");
            ApiError::Unreachable(e)
        })?;

        Self::check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    // ===== Session renewal =====

    /// Obtain a usable access token after `rejected` came back 401.
    ///
    /// `sent_with` is the token the failed request carried. If another call
    /// renewed the session while this one waited for the gate, the fresh
    /// token is reused instead of refreshing a second time.
    async fn renew_session(
        &self,
        sent_with: Option<&str>,
        rejected: ApiError,
    ) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.access_token() {
            if sent_with != Some(current.as_str()) {
                debug!("Session already renewed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.read_store(REFRESH_TOKEN_KEY) else {
            warn!("Received 401 with no refresh token stored");
            self.terminate(TerminationReason::MissingRefreshToken);
            return Err(rejected);
        };

        match self.request_refresh(&refresh_token).await {
            Ok(credentials) => {
                // A half-written pair leaves the new token beside a spent refresh token.
                if let Err(e) = self.store.save_credentials(&credentials) {
                    warn!(error = %e, "Failed to persist renewed credentials");
                    self.terminate(TerminationReason::RefreshFailed);
                    return Err(rejected);
                }
                info!("Session renewed");
                self.events.emit(SessionEvent::Renewed);
                Ok(credentials.access_token)
            }
            Err(err) => {
                warn!(error = %err, "Session renewal failed");
                self.terminate(TerminationReason::RefreshFailed);
                Err(err)
            }
        }
    }

    /// Call the refresh endpoint directly, outside the request pipeline.
    async fn request_refresh(&self, refresh_token: &str) -> Result<Credentials, ApiError> {
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(ApiError::Unreachable)?;

        let response = Self::check_response(response).await?;
        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse refresh response: {}", e)))?;

        if !body.success {
            return Err(ApiError::Rejected(if body.message.is_empty() {
                "Refresh token was rejected".to_string()
            } else {
                body.message
            }));
        }

        body.data
            .map(Credentials::from)
            .ok_or_else(|| ApiError::InvalidResponse("Refresh response has no tokens".to_string()))
    }

    /// Drop both tokens and tell subscribers the session is gone.
    fn terminate(&self, reason: TerminationReason) {
        if let Err(e) = self.store.clear_credentials() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        warn!(%reason, "Session terminated");
        self.events.emit(SessionEvent::Terminated(reason));
    }

    // ===== Session lifecycle =====

    /// Persist a token pair obtained by login.
    pub(crate) fn establish(&self, credentials: &Credentials) {
        if let Err(e) = self.store.save_credentials(credentials) {
            warn!(error = %e, "Failed to persist credentials");
            if let Err(e) = self.store.clear_credentials() {
                warn!(error = %e, "Failed to clear partially written credentials");
            }
            return;
        }
        info!("Session established");
        self.events.emit(SessionEvent::Established);
    }

    /// Clear credentials as a user-initiated logout.
    pub(crate) fn end_session(&self) {
        self.terminate(TerminationReason::LoggedOut);
    }

    // ===== Helpers =====

    fn access_token(&self) -> Option<String> {
        self.read_store(TOKEN_KEY)
    }

    /// Store reads are best effort; a failing backend reads as empty.
    fn read_store(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read credential store");
                None
            }
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Builder for ApiClient
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    store: Option<Arc<dyn CredentialStore>>,
    events: Option<SessionEvents>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            store: None,
            events: None,
        }
    }
}

impl ApiClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout; `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Publish on an existing event channel instead of a new one.
    pub fn session_events(mut self, events: SessionEvents) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidRequest("base_url is required".to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut client_builder = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(ApiClient {
            client,
            base_url,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new())),
            events: self.events.unwrap_or_default(),
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }
}
