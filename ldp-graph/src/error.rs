//! Error types for ldp-graph

use thiserror::Error;

/// Result type alias using our GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Graph engine errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// Media type has no RDF parser/serializer
    #[error("Unsupported RDF media type: {0}")]
    UnsupportedMediaType(String),

    /// Malformed RDF input
    #[error("RDF parse error: {0}")]
    Parse(String),

    /// Serializer failure
    #[error("RDF serialization error: {0}")]
    Serialize(String),

    /// Base or prefix IRI rejected
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// SPARQL Update text did not parse
    #[error("SPARQL Update syntax error: {0}")]
    UpdateSyntax(String),

    /// SPARQL Update parsed but could not be applied
    #[error("SPARQL Update evaluation error: {0}")]
    UpdateEvaluation(String),

    /// Scratch store failure
    #[error("Graph engine error: {0}")]
    Engine(String),
}

impl GraphError {
    /// Create an unsupported media type error
    pub fn unsupported(media_type: impl Into<String>) -> Self {
        GraphError::UnsupportedMediaType(media_type.into())
    }

    /// True for errors caused by the client's update text rather than the engine
    pub fn is_update_failure(&self) -> bool {
        matches!(
            self,
            GraphError::UpdateSyntax(_) | GraphError::UpdateEvaluation(_)
        )
    }
}
