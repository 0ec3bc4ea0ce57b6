//! Term construction and inspection helpers

use oxigraph::model::{Graph, NamedNode, SubjectRef, TermRef, Triple};

/// Named node for an IRI the caller has already validated.
///
/// Resource URIs are checked by the store before they are admitted, so the
/// server-managed triples built from them skip re-validation.
pub fn iri(value: &str) -> NamedNode {
    NamedNode::new_unchecked(value)
}

/// Triple whose three positions are all IRIs
pub fn triple(subject: &str, predicate: &str, object: &str) -> Triple {
    Triple::new(iri(subject), iri(predicate), iri(object))
}

/// IRI of a subject, if it is a named node
pub fn subject_iri(subject: SubjectRef<'_>) -> Option<&str> {
    match subject {
        SubjectRef::NamedNode(node) => Some(node.as_str()),
        _ => None,
    }
}

/// IRI of an object term, if it is a named node
pub fn term_iri(term: TermRef<'_>) -> Option<&str> {
    match term {
        TermRef::NamedNode(node) => Some(node.as_str()),
        _ => None,
    }
}

/// Add every triple of `from` to `into`
pub fn merge(into: &mut Graph, from: &Graph) {
    for t in from.iter() {
        into.insert(t);
    }
}
