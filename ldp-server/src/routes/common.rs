//! Request state and helpers shared by the method handlers

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, ETAG, LINK, LOCATION};
use axum::http::{Response, StatusCode};
use bytes::Bytes;
use ldp_core::{check_digest, InteractionModel, Mode, Resource, Store};
use ldp_graph::{Graph, RdfMediaType};
use ldp_vocab::{media_types, memento};
use tracing::info;

use crate::error::{Result, ServerError};
use crate::extract::{Agent, LdpHeaders, ResponseLinks};
use crate::state::AppState;

pub(crate) const ALLOW: &str = "allow";
pub(crate) const ACCEPT_PATCH: &str = "accept-patch";
pub(crate) const ACCEPT_POST: &str = "accept-post";

/// One LDP request after extraction
pub(crate) struct LdpRequest {
    /// Absolute target URI
    pub uri: String,
    pub headers: LdpHeaders,
    pub agent: Agent,
    pub body: Bytes,
}

/// Fail unless `If-Match` lists `etag` (or `*`). A missing header fails only
/// when `required`.
pub(crate) fn check_if_match(req: &LdpRequest, etag: &str, required: bool) -> Result<()> {
    match &req.headers.if_match {
        None if required => Err(ServerError::PreconditionRequired(format!(
            "If-Match is required to replace {}",
            req.uri
        ))),
        None => Ok(()),
        Some(tags) if tags.iter().any(|t| t == "*" || same_entity_tag(t, etag)) => Ok(()),
        Some(_) => Err(ServerError::PreconditionFailed(format!(
            "{} has ETag {}",
            req.uri, etag
        ))),
    }
}

/// Entity tags compared without their weakness marker
fn same_entity_tag(a: &str, b: &str) -> bool {
    a.trim_start_matches("W/") == b.trim_start_matches("W/")
}

/// Build the resource a POST or PUT body describes, parsed against `uri`.
///
/// `template` is the empty resource used when no `rel="type"` link names a
/// model; without one the model follows the content type. Returns the
/// resource and the containment triples the body asserted.
pub(crate) fn build_resource(
    state: &AppState,
    req: &LdpRequest,
    uri: &str,
    template: Option<Resource>,
) -> Result<(Resource, Graph)> {
    let links = &req.headers.links;
    if links.wants_versioning() && !state.config.versioning_enabled() {
        return Err(ServerError::bad_request("versioning is disabled"));
    }
    let content_type = req.headers.require_content_type()?;
    if let Some(digest) = &req.headers.digest {
        check_digest(digest, &req.body).map_err(ServerError::request_digest)?;
    }

    let resource = match (links.interaction_model()?, template) {
        (Some(model), _) => Resource::for_model(model, content_type),
        (None, Some(template)) => template,
        (None, None) if RdfMediaType::is_rdf(content_type) => Resource::rdf_source(),
        (None, None) => Resource::for_model(InteractionModel::NonRdfSource, content_type),
    };

    if resource.is_binary() {
        return Ok((Resource::non_rdf(req.body.clone(), content_type), Graph::new()));
    }
    if !RdfMediaType::is_rdf(content_type) {
        return Err(ServerError::unsupported_media_type(format!(
            "{content_type} is not an RDF media type"
        )));
    }
    let mut resource = resource;
    let containment = resource.parse(&req.body, content_type, uri)?;
    Ok((resource, containment))
}

/// Add a newly built resource to the store at `uri`, linked into `context`.
///
/// Applies a `rel="acl"` link, creates the describing RDF source of a Non-RDF
/// source and, when requested, the version container.
pub(crate) fn insert_resource(
    state: &AppState,
    store: &mut Store,
    req: &LdpRequest,
    mut resource: Resource,
    uri: &str,
    context: Option<&str>,
) -> Result<String> {
    if state.config.acl_enabled() {
        if let Some(acl) = req.headers.links.acl(|u| store.is_local(u))? {
            resource.acl = Some(acl);
        }
    }
    let binary = resource.is_binary();
    let uri = store.add(resource, Some(uri), context, None)?;

    if binary {
        let mut description = Resource::rdf_source();
        description.describes = Some(uri.clone());
        let description_uri = store.add(description, None, None, None)?;
        store.get_mut(&uri)?.describedby = Some(description_uri);
    }
    if req.headers.links.wants_versioning() {
        let timemap = store.add(Resource::version_container(&uri), None, None, None)?;
        store.get_mut(&uri)?.timemap = Some(timemap);
    }
    info!(uri = %uri, container = ?context, binary, agent = ?req.agent.webid(), "resource created");
    Ok(uri)
}

/// Discovery links of `resource`
pub(crate) fn resource_links(state: &AppState, store: &Store, resource: &Resource) -> ResponseLinks {
    let mut links = ResponseLinks::default();
    for type_iri in resource.rdf_types() {
        links.add(type_iri, "type");
    }
    if state.config.acl_enabled() {
        links.add(&store.individual_acl(resource.uri()), "acl");
    }
    if let Some(description) = &resource.describedby {
        links.add(description, "describedby");
    }
    if let Some(described) = &resource.describes {
        links.add(described, "describes");
    }
    match resource.mode() {
        Mode::Original => {
            links.add(memento::ORIGINAL_RESOURCE, "type");
            links.add(memento::TIME_GATE, "type");
            links.add(resource.uri(), "original timegate");
            if let Some(timemap) = &resource.timemap {
                links.add(timemap, "timemap");
            }
        }
        Mode::VersionContainer => {
            links.add(memento::TIME_MAP, "type");
            if let Some(original) = &resource.original {
                links.add(original, "original timegate");
            }
        }
        Mode::Memento => {
            links.add(memento::MEMENTO, "type");
            if let Some(original) = &resource.original {
                links.add(original, "original timegate");
            }
            if let Some(timemap) = &resource.timemap {
                links.add(timemap, "timemap");
            }
        }
        Mode::Plain => {}
    }
    links
}

/// Methods applicable to `resource` under the current configuration
pub(crate) fn allowed_methods(state: &AppState, resource: &Resource) -> Vec<&'static str> {
    let config = &state.config;
    let mut allow = vec!["GET", "HEAD", "OPTIONS"];
    match resource.mode() {
        Mode::Memento => {}
        Mode::VersionContainer => allow.push("POST"),
        Mode::Original | Mode::Plain => {
            if config.put_enabled() {
                allow.push("PUT");
            }
            if config.patch_enabled() && resource.has_rdf_content() {
                allow.push("PATCH");
            }
            if resource.is_container() {
                allow.push("POST");
            }
        }
    }
    if config.delete_enabled() {
        allow.push("DELETE");
    }
    allow
}

/// Add `Link`, `Allow`, `Accept-Patch` and `Accept-Post` for `resource`
pub(crate) fn describe(
    builder: axum::http::response::Builder,
    state: &AppState,
    store: &Store,
    resource: &Resource,
) -> axum::http::response::Builder {
    let allow = allowed_methods(state, resource);
    let mut builder = builder
        .header(LINK, resource_links(state, store, resource).header_value())
        .header(ALLOW, allow.join(", "));
    if allow.contains(&"PATCH") {
        builder = builder.header(ACCEPT_PATCH, media_types::SPARQL_UPDATE);
    }
    if allow.contains(&"POST") {
        builder = builder.header(ACCEPT_POST, RdfMediaType::media_types().join(", "));
    }
    builder
}

/// 201 response for a created resource
pub(crate) fn created(state: &AppState, store: &Store, uri: &str) -> Result<Response<Body>> {
    let resource = store.get(uri)?;
    let builder = Response::builder()
        .status(StatusCode::CREATED)
        .header(LOCATION, uri)
        .header(ETAG, resource.etag())
        .header(CONTENT_TYPE, media_types::TEXT_PLAIN);
    finish(describe(builder, state, store, resource), Body::from(uri.to_string()))
}

/// Turn a response builder into a response
pub(crate) fn finish(builder: axum::http::response::Builder, body: Body) -> Result<Response<Body>> {
    builder
        .body(body)
        .map_err(|e| ServerError::internal(format!("invalid response header: {e}")))
}
