//! HTTP binding: SOAP over POST, plus a health check.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tracing::error;

use catalog::MovieRepository;

use crate::dispatcher::{DispatchOutcome, MessageDispatcher};

pub const HEALTH_PATH: &str = "/health";

/// Content type of SOAP 1.1 messages.
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<MessageDispatcher>,
    pub repository: Arc<MovieRepository>,
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub movies: usize,
}

/// Build the axum router with the SOAP and health endpoints.
pub fn build_router(state: AppState, service_path: &str) -> Router {
    Router::new()
        .route(service_path, post(soap_handler))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(state)
}

// Raw bytes, so that a body that is not UTF-8 still gets a SOAP fault.
async fn soap_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match state.dispatcher.dispatch_bytes(&body) {
        DispatchOutcome::Response(xml) => xml_response(StatusCode::OK, xml),
        // SOAP 1.1 over HTTP reports every fault with a 500.
        DispatchOutcome::Fault(fault) => match fault.encode() {
            Ok(xml) => xml_response(StatusCode::INTERNAL_SERVER_ERROR, xml),
            Err(err) => {
                error!(error = %err, "Failed to encode fault");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        DispatchOutcome::NoEndpoint(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        movies: state.repository.len(),
    })
}

fn xml_response(status: StatusCode, xml: String) -> Response {
    (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], xml).into_response()
}
