//! A local stand-in for the VPC classic API, used by the client's
//! integration tests.
//!
//! Every path is served by one generic handler on top of [`store::Store`]:
//! collections list with `start`/`limit` paging, `POST` creates, `PATCH`
//! merges, `DELETE` removes. Calls without `version` or with a generation
//! other than 1 are rejected the way the real service rejects them.

pub mod store;

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::HOST, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use log::info;
use tokio::{net::TcpListener, sync::RwLock};

pub use store::{RecordedRequest, Reply, Store};

/// Shared handle on the server's store.
#[derive(Clone, Debug)]
pub struct MockState(Arc<RwLock<Store>>);

impl Default for MockState {
    fn default() -> Self {
        Self(Arc::new(RwLock::new(Store::seeded())))
    }
}

impl MockState {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.0.read().await.requests().to_vec()
    }

    /// For callers outside the runtime, such as a test thread driving the
    /// server over a socket.
    pub fn requests_blocking(&self) -> Vec<RecordedRequest> {
        self.0.blocking_read().requests().to_vec()
    }
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("serving VPC classic mock on http://{addr}/v1");
    }
    axum::serve(listener, app_with_state(state)).await
}

async fn dispatch(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let base_url = format!("http://{host}/v1");
    let reply = state.0.write().await.handle(&store::Call {
        method: &method,
        path: uri.path(),
        query: &query,
        body: &body,
        base_url: &base_url,
    });
    match reply.body {
        Some(body) => (reply.status, Json(body)).into_response(),
        None => reply.status.into_response(),
    }
}
