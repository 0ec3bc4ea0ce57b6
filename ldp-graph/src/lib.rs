//! RDF graph engine adapter for the LDP server
//!
//! The resource model never talks to `oxigraph` directly. It goes through the
//! small surface exported here:
//!
//! - [`RdfMediaType`] - the registry of RDF media types the server speaks
//! - [`parse`] / [`serialize`] - media-type driven IO against an in-memory [`Graph`]
//! - [`update`] - SPARQL 1.1 Update evaluated against a scratch copy of a graph
//! - [`canonical_hash`] - order-independent content hash used for weak ETags
//!
//! # Blank nodes
//!
//! Graphs keep the blank node labels produced by the parser. The canonical
//! hash collapses every blank node to one placeholder, so two graphs that only
//! differ in blank node structure may hash the same. Callers rely on that
//! equivalence for ETag stability across re-parses.

mod error;
mod format;
mod hash;
mod io;
mod terms;
mod update;

pub use error::{GraphError, Result};
pub use format::RdfMediaType;
pub use hash::canonical_hash;
pub use io::{parse, serialize};
pub use terms::{iri, merge, subject_iri, term_iri, triple};
pub use update::update;

pub use oxigraph::model::{
    BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Subject, SubjectRef, Term, TermRef,
    Triple, TripleRef,
};
