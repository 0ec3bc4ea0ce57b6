//! PATCH: SPARQL Update on an RDF resource

use axum::body::Body;
use axum::http::header::ETAG;
use axum::http::{Response, StatusCode};
use ldp_core::{check_digest, AccessMode};
use ldp_vocab::media_types;
use tracing::info;

use super::access::authorize;
use super::common::{check_if_match, describe, finish, LdpRequest};
use crate::error::{Result, ServerError};
use crate::state::AppState;

pub(crate) fn patch(state: &AppState, req: &LdpRequest) -> Result<Response<Body>> {
    if !state.config.patch_enabled() {
        return Err(ServerError::method_not_allowed("PATCH is disabled"));
    }
    let mut store = state.store.write();
    let resource = store.get(&req.uri)?;
    authorize(state, &store, &req.uri, AccessMode::Write, &req.agent)?;

    if resource.is_memento() {
        return Err(ServerError::method_not_allowed("mementos are immutable"));
    }
    if resource.is_version_container() {
        return Err(ServerError::method_not_allowed(
            "version containers are managed by the server",
        ));
    }
    if !resource.has_rdf_content() {
        return Err(ServerError::method_not_allowed(format!(
            "{} is not an RDF source",
            req.uri
        )));
    }
    let content_type = req.headers.require_content_type()?;
    if content_type != media_types::SPARQL_UPDATE {
        return Err(ServerError::unsupported_media_type(format!(
            "PATCH accepts {}, not {content_type}",
            media_types::SPARQL_UPDATE
        )));
    }
    if let Some(digest) = &req.headers.digest {
        check_digest(digest, &req.body).map_err(ServerError::request_digest)?;
    }
    check_if_match(req, resource.etag(), false)?;

    let update = std::str::from_utf8(&req.body)
        .map_err(|_| ServerError::bad_request("SPARQL Update body is not UTF-8"))?;
    let resource = store.get_mut(&req.uri)?;
    resource.patch(update, content_type)?;
    info!(uri = %req.uri, etag = %resource.etag(), "resource patched");

    let resource = store.get(&req.uri)?;
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(ETAG, resource.etag());
    finish(describe(builder, state, &store, resource), Body::empty())
}
