//! POST: create a resource in a container, or a memento in a version container

use axum::body::Body;
use axum::http::Response;
use chrono::Utc;
use ldp_core::{AccessMode, Store};
use ldp_vocab::media_types;
use tracing::info;

use super::access::authorize;
use super::common::{build_resource, created, insert_resource, LdpRequest};
use crate::error::{Result, ServerError};
use crate::state::AppState;

pub(crate) fn post(state: &AppState, req: &LdpRequest) -> Result<Response<Body>> {
    let mut store = state.store.write();
    let (is_memento, is_container, is_version_container) = {
        let target = store.get(&req.uri)?;
        (target.is_memento(), target.is_container(), target.is_version_container())
    };
    authorize(state, &store, &req.uri, AccessMode::Append, &req.agent)?;

    if is_memento {
        return Err(ServerError::method_not_allowed("mementos are immutable"));
    }
    if !is_container {
        return Err(ServerError::method_not_allowed(format!(
            "{} is not a container",
            req.uri
        )));
    }
    if is_version_container {
        let uri = create_memento(state, &mut store, req)?;
        return created(state, &store, &uri);
    }

    let new_uri = store.next_uri(Some(&req.uri), req.headers.slug.as_deref());
    let (resource, containment) = build_resource(state, req, &new_uri, None)?;
    resource.check_containment(&containment)?;
    let uri = insert_resource(state, &mut store, req, resource, &new_uri, Some(&req.uri))?;
    created(state, &store, &uri)
}

/// Add a memento to the version container `req.uri`.
///
/// With `Memento-Datetime` the body is the memento's content; otherwise the
/// original's current content is snapshotted at the current instant.
fn create_memento(state: &AppState, store: &mut Store, req: &LdpRequest) -> Result<String> {
    let original_uri = store
        .get(&req.uri)?
        .original
        .clone()
        .ok_or_else(|| ServerError::internal(format!("{} has no original resource", req.uri)))?;
    let datetime = req.headers.memento_datetime()?;
    let new_uri = store.next_uri(Some(&req.uri), req.headers.slug.as_deref());

    let original = store.get(&original_uri)?;
    let media_type = original
        .as_binary()
        .map_or(media_types::OCTET_STREAM, |b| b.media_type())
        .to_string();
    let mut memento = match datetime {
        Some(_) => {
            let template = original.empty_like(&media_type);
            let (memento, containment) = build_resource(state, req, &new_uri, Some(template))?;
            memento.check_containment(&containment)?;
            memento
        }
        None => {
            let mut snapshot = original.empty_like(&media_type);
            snapshot.copy_content_from(original)?;
            snapshot
        }
    };
    memento.original = Some(original_uri.clone());
    memento.timemap = Some(req.uri.clone());
    memento.memento_datetime = Some(datetime.unwrap_or_else(Utc::now));

    let uri = store.add(memento, Some(&new_uri), Some(&req.uri), None)?;
    info!(memento = %uri, original = %original_uri, "memento created");
    Ok(uri)
}
