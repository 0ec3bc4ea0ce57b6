//! Resource model
//!
//! A [`Resource`] carries identity and version links common to every LDP
//! resource, plus a [`ResourceKind`] payload with the variant-specific state.
//! The derived [`Mode`] (original, memento, version container) is computed
//! from the links, never stored.

mod access_control;
mod binary;
mod container;
mod rdf;
mod version;

pub use access_control::{AccessControl, AccessMode};
pub use binary::NonRdfSource;
pub use container::{Container, ContainerType};
pub use rdf::RdfSource;
pub use version::{format_http_date, parse_http_date, VersionContainer};

use std::sync::OnceLock;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use ldp_graph::{canonical_hash, Graph, RdfMediaType};
use ldp_vocab::{ldp, media_types};

use crate::error::ResourceError;
use crate::prefer::{OmitSet, Section};

type Result<T> = std::result::Result<T, ResourceError>;

/// Interaction model a client can request for a new resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionModel {
    RdfSource,
    Container(ContainerType),
    NonRdfSource,
}

impl InteractionModel {
    /// Model named by an LDP type IRI; `ldp:Resource` names none
    pub fn from_type_iri(type_iri: &str) -> Option<Self> {
        match type_iri {
            ldp::RDF_SOURCE => Some(InteractionModel::RdfSource),
            ldp::NON_RDF_SOURCE => Some(InteractionModel::NonRdfSource),
            other => ContainerType::from_type_iri(other).map(InteractionModel::Container),
        }
    }

    pub fn is_rdf(&self) -> bool {
        !matches!(self, InteractionModel::NonRdfSource)
    }
}

/// Version-related mode of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No version links
    Plain,
    /// Has a TimeMap, is not itself a memento
    Original,
    /// Immutable snapshot of an original
    Memento,
    /// Holds the mementos of an original
    VersionContainer,
}

/// Variant payloads
#[derive(Debug, Clone)]
pub enum ResourceKind {
    RdfSource(RdfSource),
    Container(Container),
    VersionContainer(VersionContainer),
    NonRdfSource(NonRdfSource),
    AccessControl(AccessControl),
}

/// An LDP resource
#[derive(Debug, Clone)]
pub struct Resource {
    uri: String,
    /// Individually assigned ACL
    pub acl: Option<String>,
    /// Owning container (back-reference)
    pub contained_in: Option<String>,
    /// Version container of this resource
    pub timemap: Option<String>,
    /// Original resource of a memento or version container
    pub original: Option<String>,
    /// Non-RDF source described by this RDF source
    pub describes: Option<String>,
    /// RDF source describing this Non-RDF source
    pub describedby: Option<String>,
    /// Snapshot instant of a memento
    pub memento_datetime: Option<DateTime<Utc>>,
    kind: ResourceKind,
    etag: OnceLock<String>,
}

impl Resource {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            uri: String::new(),
            acl: None,
            contained_in: None,
            timemap: None,
            original: None,
            describes: None,
            describedby: None,
            memento_datetime: None,
            kind,
            etag: OnceLock::new(),
        }
    }

    pub fn rdf_source() -> Self {
        Self::new(ResourceKind::RdfSource(RdfSource::default()))
    }

    pub fn container(container_type: ContainerType) -> Self {
        Self::new(ResourceKind::Container(Container::new(container_type)))
    }

    pub fn non_rdf(content: Bytes, media_type: impl Into<String>) -> Self {
        Self::new(ResourceKind::NonRdfSource(NonRdfSource::new(content, media_type)))
    }

    /// Version container holding the mementos of `original`
    pub fn version_container(original: &str) -> Self {
        let mut r = Self::new(ResourceKind::VersionContainer(VersionContainer::default()));
        r.original = Some(original.to_string());
        r
    }

    pub fn access_control(acl_for: Option<&str>) -> Self {
        Self::new(ResourceKind::AccessControl(AccessControl::new(
            acl_for.map(str::to_string),
        )))
    }

    /// Empty resource for an interaction model.
    ///
    /// Non-RDF sources start with no content and the given media type.
    pub fn for_model(model: InteractionModel, media_type: &str) -> Self {
        match model {
            InteractionModel::RdfSource => Self::rdf_source(),
            InteractionModel::Container(ct) => Self::container(ct),
            InteractionModel::NonRdfSource => Self::non_rdf(Bytes::new(), media_type),
        }
    }

    /// Empty resource of the same variant, used to stage a replacement.
    pub fn empty_like(&self, media_type: &str) -> Self {
        match &self.kind {
            ResourceKind::AccessControl(a) => Self::access_control(a.acl_for.as_deref()),
            _ => Self::for_model(self.interaction_model(), media_type),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub(crate) fn set_uri(&mut self, uri: &str) {
        self.uri = uri.to_string();
        self.touch();
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Drop the cached ETag after a content change
    fn touch(&mut self) {
        self.etag = OnceLock::new();
    }

    // ---------------------------------------------------------------------
    // Capabilities
    // ---------------------------------------------------------------------

    pub fn has_rdf_content(&self) -> bool {
        !self.is_binary()
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            ResourceKind::Container(_) | ResourceKind::VersionContainer(_)
        )
    }

    pub fn is_version_container(&self) -> bool {
        matches!(self.kind, ResourceKind::VersionContainer(_))
    }

    pub fn is_memento(&self) -> bool {
        self.original.is_some() && !self.is_version_container()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, ResourceKind::NonRdfSource(_))
    }

    pub fn is_access_control(&self) -> bool {
        matches!(self.kind, ResourceKind::AccessControl(_))
    }

    pub fn mode(&self) -> Mode {
        if self.is_version_container() {
            Mode::VersionContainer
        } else if self.original.is_some() {
            Mode::Memento
        } else if self.timemap.is_some() {
            Mode::Original
        } else {
            Mode::Plain
        }
    }

    pub fn interaction_model(&self) -> InteractionModel {
        match &self.kind {
            ResourceKind::RdfSource(_) | ResourceKind::AccessControl(_) => {
                InteractionModel::RdfSource
            }
            ResourceKind::Container(c) => InteractionModel::Container(c.container_type()),
            ResourceKind::VersionContainer(_) => InteractionModel::Container(ContainerType::Basic),
            ResourceKind::NonRdfSource(_) => InteractionModel::NonRdfSource,
        }
    }

    /// LDP types advertised in `rdf:type` triples and `Link` headers
    pub fn rdf_types(&self) -> Vec<&'static str> {
        match &self.kind {
            ResourceKind::RdfSource(_) | ResourceKind::AccessControl(_) => {
                vec![ldp::RDF_SOURCE, ldp::RESOURCE]
            }
            ResourceKind::Container(c) => {
                vec![c.container_type().type_iri(), ldp::RDF_SOURCE, ldp::RESOURCE]
            }
            ResourceKind::VersionContainer(_) => {
                vec![ldp::BASIC_CONTAINER, ldp::RDF_SOURCE, ldp::RESOURCE]
            }
            ResourceKind::NonRdfSource(_) => vec![ldp::NON_RDF_SOURCE, ldp::RESOURCE],
        }
    }

    /// Media types this resource can be served as, default first
    pub fn media_types(&self) -> Vec<&str> {
        match &self.kind {
            ResourceKind::NonRdfSource(b) => vec![b.media_type()],
            ResourceKind::VersionContainer(_) => {
                let mut types = RdfMediaType::media_types();
                types.push(media_types::LINK_FORMAT);
                types
            }
            _ => RdfMediaType::media_types(),
        }
    }

    // ---------------------------------------------------------------------
    // Variant access
    // ---------------------------------------------------------------------

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            ResourceKind::Container(c) => Some(c),
            ResourceKind::VersionContainer(v) => Some(&v.container),
            _ => None,
        }
    }

    fn as_container_mut(&mut self) -> Result<&mut Container> {
        match &mut self.kind {
            ResourceKind::Container(c) => Ok(c),
            ResourceKind::VersionContainer(v) => Ok(&mut v.container),
            _ => Err(ResourceError::WrongVariant {
                uri: self.uri.clone(),
                expected: "container",
            }),
        }
    }

    pub fn as_version_container(&self) -> Option<&VersionContainer> {
        match &self.kind {
            ResourceKind::VersionContainer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_access_control(&self) -> Option<&AccessControl> {
        match &self.kind {
            ResourceKind::AccessControl(a) => Some(a),
            _ => None,
        }
    }

    fn as_access_control_mut(&mut self) -> Result<&mut AccessControl> {
        match &mut self.kind {
            ResourceKind::AccessControl(a) => Ok(a),
            _ => Err(ResourceError::WrongVariant {
                uri: self.uri.clone(),
                expected: "access control resource",
            }),
        }
    }

    pub fn as_binary(&self) -> Option<&NonRdfSource> {
        match &self.kind {
            ResourceKind::NonRdfSource(b) => Some(b),
            _ => None,
        }
    }

    /// Client content graph of RDF-bearing variants
    pub fn content_graph(&self) -> Option<&Graph> {
        match &self.kind {
            ResourceKind::RdfSource(r) => Some(&r.graph),
            ResourceKind::Container(c) => Some(&c.graph),
            ResourceKind::VersionContainer(v) => Some(&v.container.graph),
            ResourceKind::AccessControl(a) => Some(&a.graph),
            ResourceKind::NonRdfSource(_) => None,
        }
    }

    fn content_graph_mut(&mut self) -> Result<&mut Graph> {
        match &mut self.kind {
            ResourceKind::RdfSource(r) => Ok(&mut r.graph),
            ResourceKind::Container(c) => Ok(&mut c.graph),
            ResourceKind::VersionContainer(v) => Ok(&mut v.container.graph),
            ResourceKind::AccessControl(a) => Ok(&mut a.graph),
            ResourceKind::NonRdfSource(_) => Err(ResourceError::NotRdf(self.uri.clone())),
        }
    }

    // ---------------------------------------------------------------------
    // Containment and membership
    // ---------------------------------------------------------------------

    /// URIs this container holds (empty for non-containers)
    pub fn contained(&self) -> Vec<String> {
        self.as_container()
            .map(|c| c.contains().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Add a contained URI; adding twice is a no-op
    pub fn add_contained(&mut self, uri: &str) -> Result<bool> {
        Ok(self.as_container_mut()?.add_contained(uri))
    }

    /// Remove a contained URI; removing an absent URI is an error
    pub fn del_contained(&mut self, uri: &str) -> Result<()> {
        let self_uri = self.uri.clone();
        self.as_container_mut()?.del_contained(&self_uri, uri)?;
        if let ResourceKind::VersionContainer(v) = &mut self.kind {
            v.forget(uri);
        }
        Ok(())
    }

    pub fn add_member(&mut self, member: &str) -> Result<bool> {
        Ok(self.as_container_mut()?.add_member(member))
    }

    pub fn del_member(&mut self, member: &str) -> Result<()> {
        let self_uri = self.uri.clone();
        self.as_container_mut()?.del_member(&self_uri, member)?;
        Ok(())
    }

    /// Record a memento's datetime in a version container
    pub(crate) fn record_memento(&mut self, memento: &str, datetime: DateTime<Utc>) -> Result<()> {
        match &mut self.kind {
            ResourceKind::VersionContainer(v) => {
                v.record(memento, datetime);
                Ok(())
            }
            _ => Err(ResourceError::WrongVariant {
                uri: self.uri.clone(),
                expected: "version container",
            }),
        }
    }

    /// Server-known containment triples
    pub fn containment_graph(&self) -> Graph {
        self.as_container()
            .map(|c| c.containment_graph(&self.uri))
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Access control
    // ---------------------------------------------------------------------

    pub fn add_public_read(&mut self, inherit: bool) -> Result<String> {
        let uri = self.uri.clone();
        let auth = self.as_access_control_mut()?.add_public_read(&uri, inherit);
        self.touch();
        Ok(auth)
    }

    pub fn add_owner(&mut self, agent: &str, inherit: bool) -> Result<String> {
        let uri = self.uri.clone();
        let auth = self.as_access_control_mut()?.add_owner(&uri, agent, inherit);
        self.touch();
        Ok(auth)
    }

    // ---------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------

    /// Parse RDF `data` into this resource's content, resolving against `base`.
    ///
    /// Containment triples are stripped from the content and returned so the
    /// caller can decide whether the client was allowed to state them.
    /// Containers also lift their membership configuration out of the graph.
    pub fn parse(&mut self, data: &[u8], media_type: &str, base: &str) -> Result<Graph> {
        if self.is_binary() {
            return Err(ResourceError::NotRdf(self.uri.clone()));
        }
        let mut graph = ldp_graph::parse(data, media_type, base)?;
        let containment = rdf::extract_containment(&mut graph);
        if let ResourceKind::Container(c) = &mut self.kind {
            c.configure_from(&mut graph, base)?;
        }
        *self.content_graph_mut()? = graph;
        self.touch();
        Ok(containment)
    }

    /// Fail if `containment` asserts anything the server does not already know
    pub fn check_containment(&self, containment: &Graph) -> Result<()> {
        let known = self.containment_graph();
        match containment.iter().find(|t| !known.contains(*t)) {
            Some(t) => Err(ResourceError::ContainmentViolation(t.to_string())),
            None => Ok(()),
        }
    }

    /// Apply a SPARQL Update to the content.
    ///
    /// The update runs on a copy; the resource is only changed when the
    /// result introduces no containment triple absent from the current
    /// containment set.
    pub fn patch(&mut self, update_text: &str, media_type: &str) -> Result<()> {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        if !essence.eq_ignore_ascii_case(media_types::SPARQL_UPDATE) {
            return Err(ResourceError::UnsupportedMediaType(media_type.to_string()));
        }
        let current = self
            .content_graph()
            .ok_or_else(|| ResourceError::NotRdf(self.uri.clone()))?;
        let mut result = ldp_graph::update(current, update_text, &self.uri)
            .map_err(|e| ResourceError::PatchFailed(e.to_string()))?;

        let containment = rdf::extract_containment(&mut result);
        let known = self.containment_graph();
        if let Some(t) = containment.iter().find(|t| !known.contains(*t)) {
            return Err(ResourceError::PatchIllegal(format!(
                "containment triple {t} is server managed"
            )));
        }

        *self.content_graph_mut()? = result;
        self.touch();
        Ok(())
    }

    /// Whether `replacement` may take this resource's content via PUT
    pub fn check_replacement(&self, replacement: &Resource) -> Result<()> {
        let compatible = match (&self.kind, &replacement.kind) {
            (ResourceKind::NonRdfSource(_), ResourceKind::NonRdfSource(_)) => true,
            (ResourceKind::Container(a), ResourceKind::Container(b)) => {
                a.container_type() == b.container_type()
            }
            (
                ResourceKind::RdfSource(_) | ResourceKind::AccessControl(_),
                ResourceKind::RdfSource(_) | ResourceKind::AccessControl(_),
            ) => true,
            _ => false,
        };
        if compatible {
            Ok(())
        } else {
            Err(ResourceError::IncompatibleReplacement(format!(
                "cannot replace {} ({}) with {}",
                self.uri,
                self.rdf_types()[0],
                replacement.rdf_types()[0]
            )))
        }
    }

    /// Swap in the content of `replacement`, keeping identity, links and
    /// server-managed container state.
    pub fn replace_content(&mut self, replacement: Resource) -> Result<()> {
        self.check_replacement(&replacement)?;
        match (&mut self.kind, replacement.kind) {
            (ResourceKind::NonRdfSource(old), ResourceKind::NonRdfSource(new)) => *old = new,
            (ResourceKind::Container(old), ResourceKind::Container(new)) => old.graph = new.graph,
            (ResourceKind::RdfSource(old), ResourceKind::RdfSource(new)) => old.graph = new.graph,
            (ResourceKind::RdfSource(old), ResourceKind::AccessControl(new)) => old.graph = new.graph,
            (ResourceKind::AccessControl(old), ResourceKind::RdfSource(new)) => old.graph = new.graph,
            (ResourceKind::AccessControl(old), ResourceKind::AccessControl(new)) => {
                old.graph = new.graph
            }
            _ => {}
        }
        self.touch();
        Ok(())
    }

    /// Replace the content with a copy of `other`'s content (memento snapshot)
    pub fn copy_content_from(&mut self, other: &Resource) -> Result<()> {
        if self.is_binary() != other.is_binary() {
            return Err(ResourceError::IncompatibleReplacement(format!(
                "cannot snapshot {} into {}",
                other.uri, self.uri
            )));
        }
        if let Some(source) = other.as_binary() {
            if let ResourceKind::NonRdfSource(target) = &mut self.kind {
                *target = source.clone();
            }
        } else {
            let graph = other
                .content_graph()
                .cloned()
                .ok_or_else(|| ResourceError::NotRdf(other.uri.clone()))?;
            *self.content_graph_mut()? = graph;
        }
        self.touch();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Representation
    // ---------------------------------------------------------------------

    /// Client content plus server-managed triples, minus omitted sections,
    /// plus `extra`.
    pub fn graph(&self, omits: &OmitSet, extra: Option<&Graph>) -> Result<Graph> {
        let content = self
            .content_graph()
            .ok_or_else(|| ResourceError::NotRdf(self.uri.clone()))?;
        let minimal = omits.contains(Section::Minimal);

        let mut g = Graph::new();
        if !minimal {
            ldp_graph::merge(&mut g, content);
        }
        if let Some(extra) = extra {
            ldp_graph::merge(&mut g, extra);
        }
        match self.as_container() {
            Some(c) => {
                rdf::add_type_triples(&mut g, &self.uri, &self.rdf_types());
                c.add_server_triples(&mut g, &self.uri, omits);
            }
            None if !minimal => rdf::add_type_triples(&mut g, &self.uri, &self.rdf_types()),
            None => {}
        }
        Ok(g)
    }

    /// Serialize as `media_type`.
    ///
    /// Non-RDF sources return their bytes unchanged. Version containers also
    /// serialize as an `application/link-format` TimeMap.
    pub fn serialize(&self, media_type: &str, omits: &OmitSet, extra: Option<&Graph>) -> Result<Bytes> {
        match &self.kind {
            ResourceKind::NonRdfSource(b) => Ok(b.content.clone()),
            ResourceKind::VersionContainer(v) if is_link_format(media_type) => {
                let original = self
                    .original
                    .as_deref()
                    .ok_or_else(|| ResourceError::MissingOriginal(self.uri.clone()))?;
                Ok(Bytes::from(v.timemap(original, &self.uri)))
            }
            _ => {
                let g = self.graph(omits, extra)?;
                Ok(Bytes::from(ldp_graph::serialize(&g, media_type)?))
            }
        }
    }

    /// Entity tag: weak over the canonical content and type triples for RDF
    /// variants, strong over the bytes for Non-RDF sources. Containment and
    /// membership are left out, so adding or removing a child keeps the tag.
    /// Cached until the content changes.
    pub fn etag(&self) -> &str {
        self.etag.get_or_init(|| match &self.kind {
            ResourceKind::NonRdfSource(b) => format!("\"{}\"", b.content_hash()),
            _ => {
                let content_only: OmitSet =
                    [Section::Containment, Section::Membership].into_iter().collect();
                let g = self.graph(&content_only, None).unwrap_or_default();
                format!("W/\"{}\"", canonical_hash(&g))
            }
        })
    }
}

fn is_link_format(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .is_some_and(|e| e.trim().eq_ignore_ascii_case(media_types::LINK_FORMAT))
}
