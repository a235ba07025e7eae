//! Shared helpers for the Minerva client conformance test suite.
//!
//! Provides [`spawn_mock_api`]: a function that binds a `TcpListener` on an
//! ephemeral port, serves an in-process [`MockApi`] on it, and returns both
//! the base URL and a handle to the mock's state so tests can seed data and
//! inspect recorded requests without going through the HTTP layer.

pub mod mock;

use std::sync::Arc;

use minerva_api::CognitoDetails;

pub use mock::{MockApi, RecordedRequest, STAGE, TILE_JPEG};

/// Identity-provider details the mock reports from `/cognito_details`.
pub fn mock_cognito_details() -> CognitoDetails {
    CognitoDetails {
        region: Some("us-east-1".into()),
        user_pool_id: Some("us-east-1_MockPool".into()),
        client_id: Some("mock-client-id".into()),
        identity_pool_id: Some("us-east-1:00000000-0000-7000-8000-000000000000".into()),
        ..Default::default()
    }
}

/// Start an ephemeral mock API and return `(base_url, api)`.
///
/// The mock runs in a background `tokio` task bound to an OS-assigned port
/// on `127.0.0.1`. `base_url` has no stage, e.g. `http://127.0.0.1:51234`;
/// routes live under `/{STAGE}`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound.
pub async fn spawn_mock_api() -> (String, Arc<MockApi>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let api = Arc::new(MockApi::new(mock_cognito_details()));
    let router = mock::build_router(Arc::clone(&api));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("mock API stopped: {e}");
        }
    });

    (base_url, api)
}
