//! Error types for ldp-core

use ldp_graph::GraphError;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Fixity errors raised by the digest codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// The client named an algorithm the server cannot compute
    #[error("Unsupported digest: {0}")]
    Unsupported(String),

    /// Malformed header, out-of-range weight, or content mismatch
    #[error("Bad digest: {0}")]
    Bad(String),
}

/// Errors raised by resource model operations
#[derive(Error, Debug)]
pub enum ResourceError {
    /// RDF body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Media type cannot be parsed, serialized, or applied as a patch
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Operation requires RDF content
    #[error("Resource {0} has no RDF content")]
    NotRdf(String),

    /// Operation requires a different resource variant
    #[error("Resource {uri} is not a {expected}")]
    WrongVariant { uri: String, expected: &'static str },

    /// Patch would introduce containment triples
    #[error("Illegal patch: {0}")]
    PatchIllegal(String),

    /// Patch text could not be parsed or applied
    #[error("Patch failed: {0}")]
    PatchFailed(String),

    /// Replacement content asserts containment the server does not know about
    #[error("Containment triples are server managed: {0}")]
    ContainmentViolation(String),

    /// Client-supplied configuration triples contradict each other
    #[error("Data conflict: {0}")]
    DataConflict(String),

    /// Unknown container type IRI
    #[error("Unsupported container type: {0}")]
    UnsupportedContainerType(String),

    /// Replacement would change the resource variant
    #[error("Incompatible replacement: {0}")]
    IncompatibleReplacement(String),

    /// Removal of a contained URI the container does not hold
    #[error("{uri} is not contained in {container}")]
    NotContained { container: String, uri: String },

    /// Removal of a member the container does not hold
    #[error("{member} is not a member of {container}")]
    NotMember { container: String, member: String },

    /// Version container without an original resource
    #[error("Version container {0} has no original resource")]
    MissingOriginal(String),

    /// Serializer failure
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Graph engine failure unrelated to client input
    #[error("Graph engine error: {0}")]
    Engine(String),
}

impl From<GraphError> for ResourceError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::Parse(msg) | GraphError::InvalidIri(msg) => ResourceError::Parse(msg),
            GraphError::UnsupportedMediaType(mt) => ResourceError::UnsupportedMediaType(mt),
            GraphError::Serialize(msg) => ResourceError::Serialize(msg),
            GraphError::UpdateSyntax(msg) | GraphError::UpdateEvaluation(msg) => {
                ResourceError::PatchFailed(msg)
            }
            GraphError::Engine(msg) => ResourceError::Engine(msg),
        }
    }
}

/// Errors raised by the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// URI never existed
    #[error("Not found: {0}")]
    NotFound(String),

    /// URI existed and has been deleted
    #[error("Deleted: {0}")]
    Deleted(String),

    /// ACL inheritance did not terminate within the configured depth
    #[error("ACL inheritance for {uri} exceeded depth limit {limit}")]
    AclLoop { uri: String, limit: usize },

    /// Context URI is not a live container
    #[error("Not a container: {0}")]
    NotContainer(String),

    /// URI is not a valid absolute IRI
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Resource model error
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
