//! The request dispatcher.
//!
//! [`MinervaClient`] owns an HTTP client, the resolved API base and the
//! session. Every endpoint method funnels through [`MinervaClient::dispatch`]:
//!
//! 1. Snapshot the session; fail with `NoSession` if nobody is set.
//! 2. Resolve the `Authorization` header (guest sentinel or a fresh token).
//! 3. Prepare the request against the API base and send it.
//! 4. Normalize the response.
//!
//! Calls are independent: no retries, no de-duplication, no ordering
//! between concurrent dispatches.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::credential::{resolve_authorization, CredentialSource};
use crate::error::ClientError;
use crate::request::ApiRequest;
use crate::response::{normalize, ApiResponse};
use crate::session::SessionHolder;

/// Timeout applied by [`MinervaClient::new`] to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one Minerva deployment.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Debug, Clone)]
pub struct MinervaClient {
    http: Client,
    api_base: String,
    session: SessionHolder,
}

impl MinervaClient {
    /// Build a client with a default HTTP client ([`DEFAULT_TIMEOUT`]).
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_http_client(config, http)
    }

    /// Build a client around a pre-configured `reqwest::Client`.
    pub fn with_http_client(config: &ClientConfig, http: Client) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            http,
            api_base: config.api_base(),
            session: SessionHolder::new(),
        })
    }

    /// `{base_url}/{stage}`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    // ── Session ───────────────────────────────────────────────────────────────

    pub fn set_identity(&self, source: Arc<dyn CredentialSource>) {
        self.session.set_identity(source);
    }

    pub fn clear_identity(&self) {
        self.session.clear_identity();
    }

    pub fn set_guest_mode(&self, guest: bool) {
        self.session.set_guest_mode(guest);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The `Authorization` header value the next request would carry.
    pub async fn token(&self) -> Result<String, ClientError> {
        resolve_authorization(&self.session.snapshot()).await
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Send `request` as the current identity and normalize the outcome.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        debug!(method = %request.method, path = %request.path, "dispatch");

        let identity = self.session.snapshot();
        let authorization = match resolve_authorization(&identity).await {
            Ok(value) => value,
            Err(ClientError::NoSession) => {
                warn!(
                    "tried to call {} {} with no session available",
                    request.method, request.path
                );
                return Err(ClientError::NoSession);
            }
            Err(e) => return Err(e),
        };

        let prepared = request
            .prepare(&self.api_base)?
            .with_authorization(&authorization);

        let mut builder = self.http.request(prepared.method.into(), &prepared.url);
        for (name, value) in &prepared.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = prepared.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("{} {} failed: {e}", prepared.method, prepared.url);
            ClientError::Network(e)
        })?;

        normalize(response, request.binary).await
    }

    /// Dispatch and decode the JSON body into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        self.dispatch(request).await?.into_json()
    }

    /// Dispatch with the binary flag set and return the raw body.
    pub async fn fetch_binary(&self, request: ApiRequest) -> Result<Bytes, ClientError> {
        self.dispatch(request.binary()).await?.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        body::Bytes as AxumBytes,
        http::{HeaderMap, StatusCode},
        routing::{get, post, put},
        Json, Router,
    };
    use minerva_api::Repository;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::credential::{CredentialError, FnCredential, StaticCredential};

    /// Spawn a loopback axum server and return its base URL (e.g. `http://127.0.0.1:PORT`).
    async fn spawn_mock_server(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn client_for(router: Router) -> MinervaClient {
        let base = spawn_mock_server(router).await;
        MinervaClient::new(&ClientConfig::new(base)).unwrap()
    }

    async fn echo_auth(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({ "authorization": auth }))
    }

    #[tokio::test]
    async fn authenticated_request_carries_bearer_token() {
        let client = client_for(Router::new().route("/dev/whoami", get(echo_auth))).await;
        client.set_identity(Arc::new(StaticCredential::new("jwt-123")));

        let body: Value = client.fetch_json(ApiRequest::get("/whoami")).await.unwrap();
        assert_eq!(body["authorization"], "Bearer jwt-123");
    }

    #[tokio::test]
    async fn guest_request_carries_anonymous() {
        let client = client_for(Router::new().route("/dev/whoami", get(echo_auth))).await;
        client.set_guest_mode(true);

        let body: Value = client.fetch_json(ApiRequest::get("/whoami")).await.unwrap();
        assert_eq!(body["authorization"], "Bearer Anonymous");
    }

    #[tokio::test]
    async fn no_session_sends_nothing() {
        static HITS: AtomicUsize = AtomicUsize::new(0);
        async fn counted() -> StatusCode {
            HITS.fetch_add(1, Ordering::SeqCst);
            StatusCode::NO_CONTENT
        }
        let client = client_for(Router::new().route("/dev/repository", get(counted))).await;

        let err = client.dispatch(ApiRequest::get("/repository")).await.unwrap_err();
        assert!(matches!(err, ClientError::NoSession));
        assert_eq!(HITS.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refresh_failure_sends_nothing() {
        static HITS: AtomicUsize = AtomicUsize::new(0);
        async fn counted() -> StatusCode {
            HITS.fetch_add(1, Ordering::SeqCst);
            StatusCode::NO_CONTENT
        }
        let client = client_for(Router::new().route("/dev/repository", get(counted))).await;
        client.set_identity(Arc::new(FnCredential::new(|| async {
            Err(CredentialError::Provider("unreachable".into()))
        })));

        let err = client.dispatch(ApiRequest::get("/repository")).await.unwrap_err();
        assert!(matches!(err, ClientError::CredentialRefresh(_)));
        assert_eq!(HITS.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_content_is_empty_even_when_binary() {
        let client = client_for(
            Router::new().route("/dev/gone", get(|| async { StatusCode::NO_CONTENT })),
        )
        .await;
        client.set_guest_mode(true);

        let plain = client.dispatch(ApiRequest::get("/gone")).await.unwrap();
        let binary = client.dispatch(ApiRequest::get("/gone").binary()).await.unwrap();
        assert_eq!(plain, ApiResponse::Empty);
        assert_eq!(binary, ApiResponse::Empty);
    }

    #[tokio::test]
    async fn error_status_carries_body_text() {
        let client = client_for(Router::new().route(
            "/dev/missing",
            get(|| async { (StatusCode::NOT_FOUND, "not found") }),
        ))
        .await;
        client.set_guest_mode(true);

        let err = client.dispatch(ApiRequest::get("/missing")).await.unwrap_err();
        match err {
            ClientError::Http { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn binary_body_is_returned_raw() {
        let client = client_for(Router::new().route(
            "/dev/tile",
            get(|| async { vec![0xFF_u8, 0xD8, 0xFF, 0xE0] }),
        ))
        .await;
        client.set_guest_mode(true);

        let bytes = client.fetch_binary(ApiRequest::get("/tile")).await.unwrap();
        assert_eq!(&bytes[..], &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let client =
            client_for(Router::new().route("/dev/bad", get(|| async { "{not json" }))).await;
        client.set_guest_mode(true);

        let err = client.dispatch(ApiRequest::get("/bad")).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_ok_body_is_decode_error() {
        let client =
            client_for(Router::new().route("/dev/blank", get(|| async { StatusCode::OK }))).await;
        client.set_guest_mode(true);

        let err = client.dispatch(ApiRequest::get("/blank")).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn no_content_write_yields_none() {
        let client = client_for(Router::new().route(
            "/dev/repository/{id}",
            put(|| async { StatusCode::NO_CONTENT }),
        ))
        .await;
        client.set_identity(Arc::new(StaticCredential::new("jwt")));

        let repo: Repository =
            serde_json::from_value(json!({"uuid": "r1", "name": "demo"})).unwrap();
        assert_eq!(client.update_repository(&repo).await.unwrap(), None);
    }

    #[tokio::test]
    async fn truncated_error_body_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    return;
                }
                head.extend_from_slice(&chunk[..n]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 64\r\n\r\npartial",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = MinervaClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
        client.set_guest_mode(true);

        let err = client.dispatch(ApiRequest::get("/boom")).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn body_round_trips_through_echo() {
        async fn echo(body: AxumBytes) -> AxumBytes {
            body
        }
        let client = client_for(Router::new().route("/dev/echo", post(echo))).await;
        client.set_guest_mode(true);

        let sent = json!({"name": "demo", "nested": {"list": [1, 2.5, null, "x"]}, "flag": true});
        let back: Value = client
            .fetch_json(ApiRequest::post("/echo").with_body(sent.clone()))
            .await
            .unwrap();
        assert_eq!(back, sent);
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = MinervaClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
        client.set_guest_mode(true);

        let err = client.dispatch(ApiRequest::get("/repository")).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn token_reports_current_header() {
        let client = MinervaClient::new(&ClientConfig::new("http://127.0.0.1:1")).unwrap();
        assert!(matches!(client.token().await, Err(ClientError::NoSession)));

        client.set_identity(Arc::new(StaticCredential::new("abc")));
        assert_eq!(client.token().await.unwrap(), "Bearer abc");

        client.set_guest_mode(true);
        assert_eq!(client.token().await.unwrap(), "Bearer Anonymous");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = MinervaClient::new(&ClientConfig::new("api.example.com")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
