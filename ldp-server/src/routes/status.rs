//! Auxiliary endpoints: /status, /constraints.txt

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::state::AppState;

/// Constraints document linked from every error response
pub const CONSTRAINTS: &str = include_str!("../../static/constraints.txt");

/// Repository status endpoint
///
/// GET /status
///
/// Plain-text listing of live and deleted URIs.
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("status requested");
    let store = state.store.read();

    let mut body = String::new();
    let _ = writeln!(body, "Base: {}", store.base_uri());
    let _ = writeln!(body, "Uptime: {}s", state.start_time.elapsed().as_secs());
    let uris = store.uris();
    let _ = writeln!(body, "\nResources ({}):", uris.len());
    for uri in uris {
        let types = store
            .get(uri)
            .map(|r| r.rdf_types().first().copied().unwrap_or_default())
            .unwrap_or_default();
        let _ = writeln!(body, "  {uri} {types}");
    }
    let deleted: Vec<&str> = store.deleted().collect();
    let _ = writeln!(body, "\nDeleted ({}):", deleted.len());
    for uri in deleted {
        let _ = writeln!(body, "  {uri}");
    }

    ([(CONTENT_TYPE, ldp_vocab::media_types::TEXT_PLAIN)], body)
}

/// Constraints document
///
/// GET /constraints.txt
pub async fn constraints() -> impl IntoResponse {
    ([(CONTENT_TYPE, ldp_vocab::media_types::TEXT_PLAIN)], CONSTRAINTS)
}
