//! GET, HEAD and OPTIONS

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, LINK, LOCATION, VARY};
use axum::http::{Response, StatusCode};
use ldp_core::{format_http_date, resolve_want_digest, AccessMode, Mode, Resource, Store};
use ldp_graph::Graph;
use ldp_vocab::{fcrepo, ldp};
use tracing::debug;

use super::access::authorize;
use super::common::{describe, finish, resource_links, LdpRequest};
use crate::error::{Result, ServerError};
use crate::extract::negotiate;
use crate::state::AppState;

const PREFERENCE_APPLIED: &str = "preference-applied";
const MEMENTO_DATETIME: &str = "memento-datetime";
const DIGEST: &str = "digest";

/// GET or HEAD a resource. HEAD sends the same headers without the body.
pub(crate) fn get(state: &AppState, req: &LdpRequest, head: bool) -> Result<Response<Body>> {
    let want_digest = req
        .headers
        .want_digest
        .as_deref()
        .map(resolve_want_digest)
        .transpose()
        .map_err(ServerError::want_digest)?;

    let store = state.store.read();
    let resource = store.get(&req.uri)?;
    authorize(state, &store, &req.uri, AccessMode::Read, &req.agent)?;

    if resource.mode() == Mode::Original {
        if let Some(redirect) = datetime_negotiation(state, &store, req, resource)? {
            return Ok(redirect);
        }
    }

    let (content_type, body, preference_applied) = match resource.as_binary() {
        Some(binary) => (binary.media_type().to_string(), binary.content().clone(), false),
        None => {
            let available = resource.media_types();
            let content_type = negotiate(req.headers.accept.as_deref(), &available)
                .ok_or_else(|| {
                    ServerError::not_acceptable(format!(
                        "{} is available as {}",
                        req.uri,
                        available.join(", ")
                    ))
                })?
                .to_string();
            let prefer = &req.headers.prefer;
            let extra = extra_graph(&store, resource, prefer)?;
            let applied = !prefer.omits.is_empty() || extra.is_some();
            let body = resource.serialize(&content_type, &prefer.omits, extra.as_ref())?;
            (content_type, body, applied)
        }
    };
    debug!(uri = %req.uri, content_type = %content_type, bytes = body.len(), "serving representation");

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type.as_str())
        .header(CONTENT_LENGTH, body.len())
        .header(ETAG, resource.etag());
    builder = describe(builder, state, &store, resource);
    if let Some(want) = &want_digest {
        builder = builder.header(DIGEST, want.header_value(&body));
    }
    if preference_applied {
        builder = builder.header(PREFERENCE_APPLIED, "return=representation");
    }
    if let Some(datetime) = &resource.memento_datetime {
        builder = builder.header(MEMENTO_DATETIME, format_http_date(datetime));
    }
    if resource.mode() == Mode::Original {
        builder = builder.header(VARY, "Accept-Datetime");
    }

    let body = if head { Body::empty() } else { Body::from(body) };
    finish(builder, body)
}

/// Triples requested with `include=` beyond the resource itself
fn extra_graph(
    store: &Store,
    resource: &Resource,
    prefer: &ldp_core::Preference,
) -> Result<Option<Graph>> {
    let mut extra: Option<Graph> = None;
    if prefer.includes(fcrepo::PREFER_INBOUND_REFERENCES) {
        let refs = store.object_references(resource.uri());
        ldp_graph::merge(extra.get_or_insert_with(Graph::new), &refs);
    }
    if prefer.includes(ldp::PREFER_CONTAINED_DESCRIPTIONS) && resource.is_container() {
        let contained = store.contained_graph(resource.uri())?;
        ldp_graph::merge(extra.get_or_insert_with(Graph::new), &contained);
    }
    Ok(extra)
}

/// 302 to the memento selected by `Accept-Datetime`, if any
fn datetime_negotiation(
    state: &AppState,
    store: &Store,
    req: &LdpRequest,
    resource: &Resource,
) -> Result<Option<Response<Body>>> {
    let Some(at) = req.headers.accept_datetime()? else {
        return Ok(None);
    };
    let memento = resource
        .timemap
        .as_deref()
        .and_then(|timemap| store.get(timemap).ok())
        .and_then(Resource::as_version_container)
        .and_then(|vc| vc.memento_at(&at));
    let Some(memento) = memento else {
        debug!(uri = %req.uri, "no memento to negotiate, serving original");
        return Ok(None);
    };
    debug!(uri = %req.uri, memento = %memento, "datetime negotiation");
    let builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, memento)
        .header(VARY, "Accept-Datetime")
        .header(LINK, resource_links(state, store, resource).header_value());
    finish(builder, Body::empty()).map(Some)
}

/// OPTIONS: the `Allow` set and discovery links
pub(crate) fn options(state: &AppState, req: &LdpRequest) -> Result<Response<Body>> {
    let store = state.store.read();
    let resource = store.get(&req.uri)?;
    authorize(state, &store, &req.uri, AccessMode::Read, &req.agent)?;
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_LENGTH, 0);
    finish(describe(builder, state, &store, resource), Body::empty())
}
