//! In-memory resource repository
//!
//! The store owns every live resource, the tombstones of deleted URIs, URI
//! allocation and the containment/membership links between containers and
//! the resources they hold. It is a plain synchronous structure; callers that
//! share it across threads wrap it in a lock.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use ldp_graph::{iri, Graph, NamedNode, NamedNodeRef};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::prefer::OmitSet;
use crate::resource::Resource;

/// Default depth bound for ACL inheritance
pub const DEFAULT_ACL_INHERITANCE_LIMIT: usize = 100;

/// Default suffix of individual ACL URIs
pub const DEFAULT_ACL_SUFFIX: &str = ".acl";

/// Default ACL path used when nothing else applies
pub const DEFAULT_ACL_PATH: &str = "/missing.acl";

/// Outcome of ACL resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveAcl {
    /// URI of the governing ACL resource
    pub uri: String,
    /// True when the ACL was found on an ancestor
    pub inherited: bool,
}

/// Resource repository keyed by absolute URI
#[derive(Debug)]
pub struct Store {
    base_uri: String,
    resources: HashMap<String, Resource>,
    deleted: BTreeSet<String>,
    reserved: BTreeSet<String>,
    acl_inheritance_limit: usize,
    acl_suffix: String,
    acl_default: String,
}

impl Store {
    /// Create an empty store rooted at `base_uri` (trailing `/` ignored)
    pub fn new(base_uri: &str) -> Self {
        let base_uri = base_uri.trim_end_matches('/').to_string();
        let acl_default = format!("{base_uri}{DEFAULT_ACL_PATH}");
        Self {
            base_uri,
            resources: HashMap::new(),
            deleted: BTreeSet::new(),
            reserved: BTreeSet::new(),
            acl_inheritance_limit: DEFAULT_ACL_INHERITANCE_LIMIT,
            acl_suffix: DEFAULT_ACL_SUFFIX.to_string(),
            acl_default,
        }
    }

    /// Set the ACL inheritance depth bound
    pub fn with_acl_inheritance_limit(mut self, limit: usize) -> Self {
        self.acl_inheritance_limit = limit;
        self
    }

    /// Set the ACL returned when no resource on the path has one
    pub fn with_acl_default(mut self, uri: &str) -> Self {
        self.acl_default = self.resolve_uri(uri);
        self
    }

    /// Never allocate `uri`; it is served by something other than the store
    pub fn with_reserved(mut self, uri: &str) -> Self {
        let uri = self.resolve_uri(uri);
        self.reserved.insert(uri);
        self
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn acl_default(&self) -> &str {
        &self.acl_default
    }

    /// Absolute form of `uri`: relative values are joined to the base, and
    /// `base + "/"` collapses to the base.
    pub fn resolve_uri(&self, uri: &str) -> String {
        let absolute = if uri.contains("://") {
            uri.to_string()
        } else if uri.starts_with('/') {
            format!("{}{}", self.base_uri, uri)
        } else {
            format!("{}/{}", self.base_uri, uri)
        };
        if absolute.len() == self.base_uri.len() + 1
            && absolute.starts_with(&self.base_uri)
            && absolute.ends_with('/')
        {
            self.base_uri.clone()
        } else {
            absolute
        }
    }

    /// Whether `uri` is under this store's base
    pub fn is_local(&self, uri: &str) -> bool {
        uri == self.base_uri || uri.starts_with(&format!("{}/", self.base_uri))
    }

    /// Whether `uri` is live
    pub fn contains(&self, uri: &str) -> bool {
        self.resources.contains_key(uri)
    }

    /// Whether `uri` has been deleted
    pub fn is_deleted(&self, uri: &str) -> bool {
        self.deleted.contains(uri)
    }

    fn missing(&self, uri: &str) -> StoreError {
        if self.deleted.contains(uri) {
            StoreError::Deleted(uri.to_string())
        } else {
            StoreError::NotFound(uri.to_string())
        }
    }

    /// Live resource, or `Deleted` / `NotFound`
    pub fn get(&self, uri: &str) -> Result<&Resource> {
        self.resources.get(uri).ok_or_else(|| self.missing(uri))
    }

    pub fn get_mut(&mut self, uri: &str) -> Result<&mut Resource> {
        if !self.resources.contains_key(uri) {
            return Err(self.missing(uri));
        }
        self.resources
            .get_mut(uri)
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))
    }

    fn is_used(&self, uri: &str) -> bool {
        self.resources.contains_key(uri) || self.deleted.contains(uri) || self.reserved.contains(uri)
    }

    /// URI `add` would allocate for `context` and `slug`.
    ///
    /// `context/slug` when both are given and the URI was never used,
    /// otherwise the first unused `base/N`.
    pub fn next_uri(&self, context: Option<&str>, slug: Option<&str>) -> String {
        if let (Some(context), Some(slug)) = (context, slug) {
            let slug = sanitize_slug(slug);
            if !slug.is_empty() {
                let candidate = format!("{}/{}", context.trim_end_matches('/'), slug);
                if !self.is_used(&candidate) {
                    return candidate;
                }
                debug!(candidate = %candidate, "slug already used, allocating numeric uri");
            }
        }
        (1u64..)
            .map(|n| format!("{}/{}", self.base_uri, n))
            .find(|candidate| !self.is_used(candidate))
            .unwrap_or_else(|| format!("{}/{}", self.base_uri, u64::MAX))
    }

    /// Add `resource`, allocating a URI when none is given, and link it into
    /// `context` when given. Returns the final URI.
    pub fn add(
        &mut self,
        mut resource: Resource,
        uri: Option<&str>,
        context: Option<&str>,
        slug: Option<&str>,
    ) -> Result<String> {
        let uri = match uri {
            Some(uri) => self.resolve_uri(uri),
            None => self.next_uri(context, slug),
        };
        NamedNode::new(uri.as_str()).map_err(|e| StoreError::InvalidUri(format!("{uri}: {e}")))?;

        let member = match context {
            Some(ctx) => {
                let parent = self.get(ctx)?;
                let container = parent
                    .as_container()
                    .ok_or_else(|| StoreError::NotContainer(ctx.to_string()))?;
                container.member_for(&uri, resource.content_graph())
            }
            None => None,
        };

        self.deleted.remove(&uri);
        resource.set_uri(&uri);
        resource.contained_in = context.map(str::to_string);
        let memento_datetime = resource.memento_datetime;
        self.resources.insert(uri.clone(), resource);

        if let Some(ctx) = context {
            let parent = self.get_mut(ctx)?;
            parent.add_contained(&uri)?;
            if let Some(member) = member {
                parent.add_member(&member)?;
            }
            if parent.is_version_container() {
                parent.record_memento(&uri, memento_datetime.unwrap_or_else(Utc::now))?;
            }
        }
        debug!(uri = %uri, context = ?context, "resource added");
        Ok(uri)
    }

    /// Replace the resource stored at `resource`'s URI, keeping its
    /// containment link.
    pub fn update(&mut self, mut resource: Resource) -> Result<()> {
        let uri = resource.uri().to_string();
        let current = self.get(&uri)?;
        resource.contained_in = current.contained_in.clone();
        self.resources.insert(uri, resource);
        Ok(())
    }

    /// Delete `uri`, returning the container it was in.
    ///
    /// Contained resources are deleted first, as is the describing RDF source
    /// of a Non-RDF source. Failure to unlink from the parent is logged.
    pub fn delete(&mut self, uri: &str) -> Result<Option<String>> {
        let (children, describedby) = {
            let resource = self.get(uri)?;
            (resource.contained(), resource.describedby.clone())
        };
        for child in children {
            if self.contains(&child) {
                self.delete(&child)?;
            }
        }
        if let Some(description) = describedby {
            if self.contains(&description) {
                self.delete(&description)?;
            }
        }

        let resource = self
            .resources
            .remove(uri)
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        self.deleted.insert(uri.to_string());

        let parent_uri = resource.contained_in.clone();
        if let Some(parent_uri) = &parent_uri {
            self.unlink(parent_uri, &resource);
        }
        debug!(uri = %uri, "resource deleted");
        Ok(parent_uri)
    }

    fn unlink(&mut self, parent_uri: &str, resource: &Resource) {
        let uri = resource.uri();
        let Some(parent) = self.resources.get_mut(parent_uri) else {
            warn!(uri = %uri, parent = %parent_uri, "parent container missing while unlinking");
            return;
        };
        if let Err(e) = parent.del_contained(uri) {
            warn!(error = %e, "failed to remove containment link");
        }
        let member = parent
            .as_container()
            .and_then(|c| c.member_for(uri, resource.content_graph()));
        if let Some(member) = member {
            if let Err(e) = parent.del_member(&member) {
                warn!(error = %e, "failed to remove membership link");
            }
        }
    }

    /// URI of the ACL that governs `uri`
    pub fn acl(&self, uri: &str) -> Result<String> {
        self.resolve_acl(uri).map(|acl| acl.uri)
    }

    /// Effective ACL of `uri`, walking up the containment chain until a
    /// resource with an applicable ACL is found.
    pub fn resolve_acl(&self, uri: &str) -> Result<EffectiveAcl> {
        self.resolve_acl_at(uri, 0)
    }

    fn resolve_acl_at(&self, uri: &str, depth: usize) -> Result<EffectiveAcl> {
        let resource = self.get(uri)?;
        let inherited = depth > 0;
        let parent = match (&resource.acl, &resource.contained_in) {
            (None, None) => {
                return Ok(EffectiveAcl {
                    uri: self.acl_default.clone(),
                    inherited,
                })
            }
            (Some(acl), None) => {
                return Ok(EffectiveAcl {
                    uri: acl.clone(),
                    inherited,
                })
            }
            (Some(acl), Some(_)) if depth == 0 || self.has_heritable_auths(acl) => {
                return Ok(EffectiveAcl {
                    uri: acl.clone(),
                    inherited,
                })
            }
            (_, Some(parent)) => parent,
        };
        if depth >= self.acl_inheritance_limit {
            return Err(StoreError::AclLoop {
                uri: uri.to_string(),
                limit: self.acl_inheritance_limit,
            });
        }
        self.resolve_acl_at(parent, depth + 1)
    }

    fn has_heritable_auths(&self, acl_uri: &str) -> bool {
        self.resources
            .get(acl_uri)
            .and_then(Resource::as_access_control)
            .is_some_and(|a| a.has_heritable_auths())
    }

    /// URI the individual ACL of `uri` has or would have
    pub fn individual_acl(&self, uri: &str) -> String {
        self.resources
            .get(uri)
            .and_then(|r| r.acl.clone())
            .unwrap_or_else(|| format!("{}{}", uri, self.acl_suffix))
    }

    /// Every triple in the store whose object is `uri`, including
    /// containment and membership triples. Full scan.
    pub fn object_references(&self, uri: &str) -> Graph {
        let target = iri(uri);
        let mut refs = Graph::new();
        for resource in self.resources.values().filter(|r| r.has_rdf_content()) {
            let Ok(graph) = resource.graph(&OmitSet::none(), None) else {
                continue;
            };
            for t in graph.triples_for_object(NamedNodeRef::from(&target)) {
                refs.insert(t);
            }
        }
        refs
    }

    /// Merged representations of the RDF resources contained in `uri`
    pub fn contained_graph(&self, uri: &str) -> Result<Graph> {
        let mut merged = Graph::new();
        for child in self.get(uri)?.contained() {
            if let Some(resource) = self.resources.get(&child).filter(|r| r.has_rdf_content()) {
                let graph = resource
                    .graph(&OmitSet::none(), None)
                    .map_err(StoreError::from)?;
                ldp_graph::merge(&mut merged, &graph);
            }
        }
        Ok(merged)
    }

    /// Live URIs, sorted
    pub fn uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        uris.sort_unstable();
        uris
    }

    /// Tombstoned URIs, sorted
    pub fn deleted(&self) -> impl Iterator<Item = &str> {
        self.deleted.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Keep unreserved URI characters of a `Slug`, mapping others to `-`
fn sanitize_slug(slug: &str) -> String {
    slug.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~') {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceError;
    use crate::resource::{ContainerType, Resource};
    use bytes::Bytes;

    const BASE: &str = "http://ex.org";

    fn store_with_root() -> Store {
        let mut store = Store::new(BASE);
        store
            .add(Resource::container(ContainerType::Basic), Some("/"), None, None)
            .unwrap();
        store
    }

    #[test]
    fn test_add_normalizes_base_slash() {
        let store = store_with_root();
        assert!(store.contains("http://ex.org"));
        assert_eq!(store.resolve_uri("http://ex.org/"), "http://ex.org");
        assert_eq!(store.resolve_uri("/a/b"), "http://ex.org/a/b");
        assert_eq!(store.resolve_uri("a"), "http://ex.org/a");
    }

    #[test]
    fn test_add_allocates_numeric_uris() {
        let mut store = Store::new(BASE);
        let a = store.add(Resource::rdf_source(), None, None, None).unwrap();
        let b = store.add(Resource::rdf_source(), None, None, None).unwrap();
        assert_eq!(a, "http://ex.org/1");
        assert_eq!(b, "http://ex.org/2");
    }

    #[test]
    fn test_slug_is_honoured_once() {
        let mut store = store_with_root();
        let a = store
            .add(Resource::rdf_source(), None, Some(BASE), Some("my thing"))
            .unwrap();
        assert_eq!(a, "http://ex.org/my-thing");
        let b = store
            .add(Resource::rdf_source(), None, Some(BASE), Some("my thing"))
            .unwrap();
        assert_eq!(b, "http://ex.org/1");
    }

    #[test]
    fn test_containment_is_paired() {
        let mut store = store_with_root();
        let uri = store.add(Resource::rdf_source(), None, Some(BASE), None).unwrap();
        assert!(store.get(BASE).unwrap().contained().contains(&uri));
        assert_eq!(store.get(&uri).unwrap().contained_in.as_deref(), Some(BASE));

        assert_eq!(store.delete(&uri).unwrap().as_deref(), Some(BASE));
        assert!(!store.get(BASE).unwrap().contained().contains(&uri));
        assert!(matches!(
            store.get_mut(BASE).unwrap().del_contained(&uri),
            Err(ResourceError::NotContained { .. })
        ));
    }

    #[test]
    fn test_deleted_is_not_not_found() {
        let mut store = store_with_root();
        let uri = store.add(Resource::rdf_source(), None, Some(BASE), None).unwrap();
        store.delete(&uri).unwrap();
        assert!(matches!(store.get(&uri), Err(StoreError::Deleted(_))));
        assert!(matches!(store.delete(&uri), Err(StoreError::Deleted(_))));
        assert!(matches!(
            store.get("http://ex.org/never"),
            Err(StoreError::NotFound(_))
        ));
        // deleted URIs are not reallocated
        let next = store.add(Resource::rdf_source(), None, None, None).unwrap();
        assert_ne!(next, uri);
    }

    #[test]
    fn test_reserved_uri_is_never_allocated() {
        let mut store = store_with_root().with_reserved("/status");
        let uri = store
            .add(Resource::rdf_source(), None, Some(BASE), Some("status"))
            .unwrap();
        assert_eq!(uri, "http://ex.org/1");
    }

    #[test]
    fn test_update_keeps_containment() {
        let mut store = store_with_root();
        let uri = store.add(Resource::rdf_source(), None, Some(BASE), None).unwrap();
        let mut replacement = store.get(&uri).unwrap().clone();
        replacement.contained_in = None;
        store.update(replacement).unwrap();
        assert_eq!(store.get(&uri).unwrap().contained_in.as_deref(), Some(BASE));

        store.delete(&uri).unwrap();
        let mut gone = Resource::rdf_source();
        gone.set_uri(&uri);
        assert!(matches!(store.update(gone), Err(StoreError::Deleted(_))));
    }

    #[test]
    fn test_add_into_non_container_fails() {
        let mut store = store_with_root();
        let uri = store.add(Resource::rdf_source(), None, Some(BASE), None).unwrap();
        assert!(matches!(
            store.add(Resource::rdf_source(), None, Some(&uri), None),
            Err(StoreError::NotContainer(_))
        ));
    }

    #[test]
    fn test_container_delete_is_recursive() {
        let mut store = store_with_root();
        let c = store
            .add(Resource::container(ContainerType::Basic), None, Some(BASE), None)
            .unwrap();
        let child = store.add(Resource::rdf_source(), None, Some(&c), None).unwrap();
        store.delete(&c).unwrap();
        assert!(store.is_deleted(&child));
    }

    #[test]
    fn test_direct_container_membership() {
        let mut store = store_with_root();
        let c = store
            .add(Resource::container(ContainerType::Direct), None, Some(BASE), None)
            .unwrap();
        let child = store.add(Resource::rdf_source(), None, Some(&c), None).unwrap();
        let container = store.get(&c).unwrap().as_container().unwrap();
        assert!(container.members().contains(&child));
        store.delete(&child).unwrap();
        let container = store.get(&c).unwrap().as_container().unwrap();
        assert!(container.members().is_empty());
    }

    #[test]
    fn test_object_references() {
        let mut store = store_with_root();
        let target = store.add(Resource::rdf_source(), None, Some(BASE), None).unwrap();
        let mut referrer = Resource::rdf_source();
        let ttl = format!("<> <http://ex.org/p> <{target}> .");
        referrer
            .parse(ttl.as_bytes(), "text/turtle", "http://ex.org/ref")
            .unwrap();
        store.add(referrer, Some("/ref"), None, None).unwrap();

        let refs = store.object_references(&target);
        // the referrer's triple plus the root's ldp:contains
        assert_eq!(refs.len(), 2);
    }

    fn chain(limit: usize) -> (Store, String) {
        let mut store = Store::new(BASE).with_acl_inheritance_limit(limit);
        let mut root = Resource::container(ContainerType::Basic);
        root.acl = Some("http://ex.org/an_acl".to_string());
        let uri1 = store.add(root, Some("/1"), None, None).unwrap();
        let uri2 = store
            .add(Resource::container(ContainerType::Basic), Some("/1/2"), Some(&uri1), None)
            .unwrap();
        let uri3 = store
            .add(Resource::rdf_source(), Some("/1/2/3"), Some(&uri2), None)
            .unwrap();
        (store, uri3)
    }

    #[test]
    fn test_acl_inherits_from_root() {
        let (store, leaf) = chain(2);
        let acl = store.resolve_acl(&leaf).unwrap();
        assert_eq!(acl.uri, "http://ex.org/an_acl");
        assert!(acl.inherited);
    }

    #[test]
    fn test_acl_depth_limit() {
        let (store, leaf) = chain(1);
        assert!(matches!(
            store.acl(&leaf),
            Err(StoreError::AclLoop { limit: 1, .. })
        ));
    }

    #[test]
    fn test_acl_default_and_individual() {
        let mut store = Store::new(BASE).with_acl_default("/default.acl");
        let uri = store.add(Resource::rdf_source(), Some("/x"), None, None).unwrap();
        assert_eq!(store.acl(&uri).unwrap(), "http://ex.org/default.acl");
        assert_eq!(store.individual_acl(&uri), "http://ex.org/x.acl");
    }

    #[test]
    fn test_non_heritable_acl_is_skipped_below_depth_zero() {
        let mut store = store_with_root();
        let mut root_acl = Resource::access_control(Some(BASE));
        root_acl.set_uri("http://ex.org/.acl");
        root_acl.add_public_read(true).unwrap();
        store.add(root_acl, Some("/.acl"), None, None).unwrap();
        store.get_mut(BASE).unwrap().acl = Some("http://ex.org/.acl".to_string());

        let c = store
            .add(Resource::container(ContainerType::Basic), Some("/c"), Some(BASE), None)
            .unwrap();
        let mut c_acl = Resource::access_control(Some(&c));
        c_acl.set_uri("http://ex.org/c.acl");
        c_acl.add_public_read(false).unwrap();
        store.add(c_acl, Some("/c.acl"), None, None).unwrap();
        store.get_mut(&c).unwrap().acl = Some("http://ex.org/c.acl".to_string());

        let leaf = store.add(Resource::rdf_source(), None, Some(&c), None).unwrap();
        assert_eq!(store.acl(&c).unwrap(), "http://ex.org/c.acl");
        assert_eq!(store.acl(&leaf).unwrap(), "http://ex.org/.acl");
    }

    #[test]
    fn test_version_container_records_datetimes() {
        let mut store = store_with_root();
        let original = store.add(Resource::rdf_source(), None, Some(BASE), None).unwrap();
        let vc = store
            .add(Resource::version_container(&original), None, None, None)
            .unwrap();
        let mut memento = Resource::non_rdf(Bytes::from_static(b"v1"), "text/plain");
        memento.original = Some(original.clone());
        let m = store.add(memento, None, Some(&vc), None).unwrap();
        let listed = store.get(&vc).unwrap().as_version_container().unwrap().mementos();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, m);
    }
}
