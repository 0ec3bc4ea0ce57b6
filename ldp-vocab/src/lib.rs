//! RDF Vocabulary Constants for the LDP server
//!
//! This crate provides a centralized location for the vocabulary IRIs used by
//! the resource model, the store and the HTTP layer.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `ldp` - Linked Data Platform (http://www.w3.org/ns/ldp#)
//! - `acl` - Web Access Control (http://www.w3.org/ns/auth/acl#)
//! - `foaf` - FOAF agent classes (http://xmlns.com/foaf/0.1/)
//! - `memento` - Memento versioning (http://mementoweb.org/ns#)
//! - `fcrepo` - Fedora repository extensions (http://fedora.info/definitions/fcrepo#)
//! - `media_types` - media types understood by the protocol layer
//! - `errors` - Error type compact IRIs for API responses

pub mod errors;

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// Linked Data Platform vocabulary
pub mod ldp {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/ldp#";

    pub const RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
    pub const RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";
    pub const NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";
    pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
    pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
    pub const DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
    pub const INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";

    /// Containment predicate, always server managed
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
    /// Default membership predicate
    pub const MEMBER: &str = "http://www.w3.org/ns/ldp#member";
    pub const MEMBERSHIP_RESOURCE: &str = "http://www.w3.org/ns/ldp#membershipResource";
    pub const HAS_MEMBER_RELATION: &str = "http://www.w3.org/ns/ldp#hasMemberRelation";
    pub const INSERTED_CONTENT_RELATION: &str =
        "http://www.w3.org/ns/ldp#insertedContentRelation";
    /// Default inserted content relation: the member is the new resource itself
    pub const MEMBER_SUBJECT: &str = "http://www.w3.org/ns/ldp#MemberSubject";

    pub const CONSTRAINED_BY: &str = "http://www.w3.org/ns/ldp#constrainedBy";

    // Prefer header include/omit targets
    pub const PREFER_CONTAINMENT: &str = "http://www.w3.org/ns/ldp#PreferContainment";
    pub const PREFER_MEMBERSHIP: &str = "http://www.w3.org/ns/ldp#PreferMembership";
    pub const PREFER_MINIMAL_CONTAINER: &str = "http://www.w3.org/ns/ldp#PreferMinimalContainer";
    /// Pre-recommendation alias of `PREFER_MINIMAL_CONTAINER`
    pub const PREFER_EMPTY_CONTAINER: &str = "http://www.w3.org/ns/ldp#PreferEmptyContainer";
    pub const PREFER_CONTAINED_DESCRIPTIONS: &str =
        "http://www.w3.org/ns/ldp#PreferContainedDescriptions";
}

/// Web Access Control vocabulary
pub mod acl {
    pub const NS: &str = "http://www.w3.org/ns/auth/acl#";

    pub const AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";
    pub const AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
    pub const AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
    pub const AUTHENTICATED_AGENT: &str = "http://www.w3.org/ns/auth/acl#AuthenticatedAgent";
    pub const ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
    /// Marks an authorization as inherited by descendants
    pub const DEFAULT: &str = "http://www.w3.org/ns/auth/acl#default";
    pub const MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
    pub const READ: &str = "http://www.w3.org/ns/auth/acl#Read";
    pub const WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
    pub const APPEND: &str = "http://www.w3.org/ns/auth/acl#Append";
    pub const CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";
}

/// FOAF vocabulary (agent classes)
pub mod foaf {
    /// foaf:Agent, the class of all agents (public access)
    pub const AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";
}

/// Memento vocabulary (RFC 7089 resource types)
pub mod memento {
    pub const ORIGINAL_RESOURCE: &str = "http://mementoweb.org/ns#OriginalResource";
    pub const TIME_GATE: &str = "http://mementoweb.org/ns#TimeGate";
    pub const TIME_MAP: &str = "http://mementoweb.org/ns#TimeMap";
    pub const MEMENTO: &str = "http://mementoweb.org/ns#Memento";
}

/// Fedora repository extensions
pub mod fcrepo {
    /// Prefer include target requesting triples that reference the resource
    pub const PREFER_INBOUND_REFERENCES: &str =
        "http://fedora.info/definitions/fcrepo#PreferInboundReferences";
}

/// Media types used on the wire
pub mod media_types {
    pub const TURTLE: &str = "text/turtle";
    pub const N_TRIPLES: &str = "application/n-triples";
    pub const RDF_XML: &str = "application/rdf+xml";
    pub const SPARQL_UPDATE: &str = "application/sparql-update";
    pub const LINK_FORMAT: &str = "application/link-format";
    pub const TEXT_PLAIN: &str = "text/plain";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}
