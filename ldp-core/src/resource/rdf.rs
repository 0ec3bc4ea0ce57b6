//! Plain RDF sources and helpers shared by every RDF-bearing variant

use ldp_graph::{iri, Graph, NamedNodeRef, Triple};
use ldp_vocab::{ldp, rdf};

/// RDF Source payload: the client-supplied graph
#[derive(Debug, Clone, Default)]
pub struct RdfSource {
    pub(crate) graph: Graph,
}

impl RdfSource {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Remove every `ldp:contains` triple from `graph` and return them.
pub(crate) fn extract_containment(graph: &mut Graph) -> Graph {
    let contains = NamedNodeRef::new_unchecked(ldp::CONTAINS);
    let found: Vec<Triple> = graph
        .triples_for_predicate(contains)
        .map(|t| t.into_owned())
        .collect();
    let mut extracted = Graph::new();
    for t in &found {
        graph.remove(t);
        extracted.insert(t);
    }
    extracted
}

/// Add `rdf:type` triples for `types` about `subject`
pub(crate) fn add_type_triples(graph: &mut Graph, subject: &str, types: &[&str]) {
    let subject = iri(subject);
    let predicate = iri(rdf::TYPE);
    for t in types {
        graph.insert(&Triple::new(subject.clone(), predicate.clone(), iri(t)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_containment_removes_triples() {
        let mut g = ldp_graph::parse(
            b"<> <http://www.w3.org/ns/ldp#contains> <http://ex.org/a> ; <http://ex.org/p> 1 .",
            "text/turtle",
            "http://ex.org/c",
        )
        .unwrap();
        let extracted = extract_containment(&mut g);
        assert_eq!(extracted.len(), 1);
        assert_eq!(g.len(), 1);
    }
}
