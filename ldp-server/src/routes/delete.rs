//! DELETE

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Response, StatusCode};
use ldp_core::AccessMode;
use ldp_vocab::media_types;
use tracing::info;

use super::access::authorize;
use super::common::{finish, LdpRequest};
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Delete a resource and everything it contains.
///
/// Deleting a version container detaches it from its original. Deleting an
/// ACL removes the assignment from the resource it protected.
pub(crate) fn delete(state: &AppState, req: &LdpRequest) -> Result<Response<Body>> {
    if !state.config.delete_enabled() {
        return Err(ServerError::method_not_allowed("DELETE is disabled"));
    }
    let mut store = state.store.write();
    let resource = store.get(&req.uri)?;
    authorize(state, &store, &req.uri, AccessMode::Write, &req.agent)?;

    if req.uri == store.base_uri() {
        return Err(ServerError::method_not_allowed("the root container cannot be deleted"));
    }
    let detach_original = resource
        .as_version_container()
        .and(resource.original.clone());
    let detach_acl = resource
        .as_access_control()
        .and_then(|a| a.acl_for.clone());

    let container = store.delete(&req.uri)?;

    if let Some(original) = detach_original {
        if let Ok(original) = store.get_mut(&original) {
            original.timemap = None;
        }
    }
    if let Some(target) = detach_acl {
        if let Ok(target) = store.get_mut(&target) {
            if target.acl.as_deref() == Some(req.uri.as_str()) {
                target.acl = None;
            }
        }
    }
    info!(uri = %req.uri, container = ?container, agent = ?req.agent.webid(), "resource deleted");

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, media_types::TEXT_PLAIN);
    finish(builder, Body::from(format!("Deleted {}\n", req.uri)))
}
