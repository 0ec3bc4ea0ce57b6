//! Canonical content hash

use md5::{Digest, Md5};
use oxigraph::model::{Graph, SubjectRef, TermRef};

const BNODE_PLACEHOLDER: &str = "_:BNODE";

/// Hex MD5 of the graph's sorted N-Triples-style lines.
///
/// Blank nodes are replaced with a single placeholder before sorting, so the
/// hash is independent of blank node labels (and of blank node structure).
pub fn canonical_hash(graph: &Graph) -> String {
    let mut lines: Vec<String> = graph
        .iter()
        .map(|t| {
            let subject = match t.subject {
                SubjectRef::BlankNode(_) => BNODE_PLACEHOLDER.to_string(),
                other => other.to_string(),
            };
            let object = match t.object {
                TermRef::BlankNode(_) => BNODE_PLACEHOLDER.to_string(),
                other => other.to_string(),
            };
            format!("{} {} {}", subject, t.predicate, object)
        })
        .collect();
    lines.sort();
    hex::encode(Md5::digest(lines.join("\n").as_bytes()))
}
