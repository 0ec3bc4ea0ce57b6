//! HTTP routing
//!
//! Every path other than the auxiliary endpoints is an LDP resource and goes
//! through [`ldp`], which dispatches on the method.

mod access;
mod common;
mod create;
mod delete;
mod patch;
mod read;
mod replace;
mod status;

pub use status::CONSTRAINTS;

/// Paths served outside the repository. The store never allocates them.
pub const STATUS_PATH: &str = "/status";
pub const CONSTRAINTS_PATH: &str = "/constraints.txt";

use crate::error::ServerError;
use crate::extract::{Agent, LdpHeaders};
use crate::state::AppState;
use crate::telemetry::{create_request_span, extract_request_id, set_span_error_code};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::header::{HeaderValue, LINK};
use axum::http::{Method, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use bytes::Bytes;
use ldp_vocab::ldp as ldp_ns;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use common::LdpRequest;

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(STATUS_PATH, get(status::status))
        .route(CONSTRAINTS_PATH, get(status::constraints))
        .fallback(ldp)
        .layer(middleware::from_fn_with_state(state.clone(), constrained_by))
        .layer(DefaultBodyLimit::max(state.config.body_limit))
        .with_state(state.clone());

    router = router.layer(TraceLayer::new_for_http());

    if state.config.cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        );
    }

    router
}

/// LDP resource handler
///
/// Runs the method handler inside a request span; handlers hold the store
/// lock for their whole read-modify-write.
pub async fn ldp(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    agent: Agent,
    headers: LdpHeaders,
    body: Bytes,
) -> Response {
    let request_id = extract_request_id(&headers.raw);
    let span = create_request_span(method.as_str(), uri.path(), request_id.as_deref());

    span.in_scope(|| {
        let request = LdpRequest {
            uri: state.resource_uri(uri.path()),
            headers,
            agent,
            body,
        };
        tracing::debug!(uri = %request.uri, agent = ?request.agent.webid(), "ldp request");

        let result = match method {
            Method::GET => read::get(&state, &request, false),
            Method::HEAD => read::get(&state, &request, true),
            Method::OPTIONS => read::options(&state, &request),
            Method::POST => create::post(&state, &request),
            Method::PUT => replace::put(&state, &request),
            Method::PATCH => patch::patch(&state, &request),
            Method::DELETE => delete::delete(&state, &request),
            other => Err(ServerError::method_not_allowed(format!("{other} is not supported"))),
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                set_span_error_code(&span, e.error_type());
                tracing::debug!(error = %e, "request failed");
                e.into_response()
            }
        };
        span.record("status", response.status().as_u16());
        response
    })
}

/// Add `Link: <constraints>; rel="ldp:constrainedBy"` to every error response
pub async fn constrained_by(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let link = format!(
            "<{}>; rel=\"{}\"",
            state.constraints_uri(),
            ldp_ns::CONSTRAINED_BY
        );
        if let Ok(value) = HeaderValue::from_str(&link) {
            response.headers_mut().append(LINK, value);
        }
    }
    response
}
