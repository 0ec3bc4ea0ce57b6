//! PUT: create-if-absent or replace-if-present

use axum::body::Body;
use axum::http::header::ETAG;
use axum::http::{Response, StatusCode};
use ldp_core::{AccessMode, Resource, Store, StoreError};
use ldp_vocab::media_types;
use tracing::info;

use super::access::authorize;
use super::common::{build_resource, check_if_match, created, describe, finish, insert_resource, LdpRequest};
use crate::error::{Result, ServerError};
use crate::state::AppState;

pub(crate) fn put(state: &AppState, req: &LdpRequest) -> Result<Response<Body>> {
    if !state.config.put_enabled() {
        return Err(ServerError::method_not_allowed("PUT is disabled"));
    }
    let mut store = state.store.write();
    if store.is_deleted(&req.uri) {
        return Err(StoreError::Deleted(req.uri.clone()).into());
    }
    if store.contains(&req.uri) {
        replace(state, &mut store, req)
    } else {
        create(state, &mut store, req)
    }
}

fn replace(state: &AppState, store: &mut Store, req: &LdpRequest) -> Result<Response<Body>> {
    authorize(state, store, &req.uri, AccessMode::Write, &req.agent)?;
    let current = store.get(&req.uri)?;
    if current.is_memento() {
        return Err(ServerError::method_not_allowed("mementos are immutable"));
    }
    if current.is_version_container() {
        return Err(ServerError::method_not_allowed(
            "version containers are managed by the server",
        ));
    }
    check_if_match(req, current.etag(), state.config.require_if_match())?;

    let content_type = req
        .headers
        .content_type
        .as_deref()
        .unwrap_or(media_types::OCTET_STREAM);
    let template = current.empty_like(content_type);
    let (replacement, containment) = build_resource(state, req, &req.uri, Some(template))?;
    current.check_replacement(&replacement)?;
    current.check_containment(&containment)?;

    let resource = store.get_mut(&req.uri)?;
    resource.replace_content(replacement)?;
    info!(uri = %req.uri, etag = %resource.etag(), "resource replaced");

    let resource = store.get(&req.uri)?;
    let builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ETAG, resource.etag());
    finish(describe(builder, state, store, resource), Body::empty())
}

fn create(state: &AppState, store: &mut Store, req: &LdpRequest) -> Result<Response<Body>> {
    if req.headers.if_match.is_some() {
        return Err(ServerError::PreconditionFailed(format!(
            "{} does not exist",
            req.uri
        )));
    }
    let parent = parent_container(store, &req.uri);
    let guard = parent.clone().unwrap_or_else(|| store.base_uri().to_string());
    authorize(state, store, &guard, AccessMode::Append, &req.agent)?;

    let protected = protected_resource(state, store, &req.uri);
    let template = protected.as_deref().map(|target| Resource::access_control(Some(target)));
    let (resource, containment) = build_resource(state, req, &req.uri, template)?;
    resource.check_containment(&containment)?;

    let uri = insert_resource(state, store, req, resource, &req.uri, parent.as_deref())?;
    if let Some(target) = protected {
        if store.get(&uri)?.is_access_control() {
            store.get_mut(&target)?.acl = Some(uri.clone());
            info!(acl = %uri, resource = %target, "ACL assigned");
        }
    }
    created(state, store, &uri)
}

/// The live, non-version container whose path is the parent of `uri`
fn parent_container(store: &Store, uri: &str) -> Option<String> {
    let (parent, _) = uri.rsplit_once('/')?;
    let parent = store.resolve_uri(parent);
    let resource = store.get(&parent).ok()?;
    (resource.is_container() && !resource.is_version_container() && !resource.is_memento())
        .then_some(parent)
}

/// Resource whose individual ACL lives at `uri`, when ACLs are enabled
fn protected_resource(state: &AppState, store: &Store, uri: &str) -> Option<String> {
    if !state.config.acl_enabled() {
        return None;
    }
    let target = uri.strip_suffix(ldp_core::store::DEFAULT_ACL_SUFFIX)?;
    let target = store.resolve_uri(target);
    (store.contains(&target) && store.individual_acl(&target) == uri).then_some(target)
}
