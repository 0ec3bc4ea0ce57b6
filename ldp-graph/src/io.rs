//! Parsing and serialization

use oxigraph::io::{RdfParser, RdfSerializer};
use oxigraph::model::{Graph, Triple, TripleRef};

use crate::error::{GraphError, Result};
use crate::format::RdfMediaType;
use ldp_vocab::ldp;

/// Parse `data` as `media_type`, resolving relative IRIs against `base`.
///
/// Quads in named graphs are folded into the default graph.
pub fn parse(data: &[u8], media_type: &str, base: &str) -> Result<Graph> {
    let format =
        RdfMediaType::from_media_type(media_type).ok_or_else(|| GraphError::unsupported(media_type))?;
    let parser = RdfParser::from_format(format.rdf_format())
        .with_base_iri(base)
        .map_err(|e| GraphError::InvalidIri(e.to_string()))?;

    let mut graph = Graph::new();
    for quad in parser.for_reader(data) {
        let quad = quad.map_err(|e| GraphError::Parse(e.to_string()))?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(graph)
}

/// Serialize `graph` as `media_type`.
///
/// Triples are written in sorted order so that equal graphs produce equal
/// bytes. The `ldp:` prefix is declared for formats that support prefixes.
pub fn serialize(graph: &Graph, media_type: &str) -> Result<Vec<u8>> {
    let format =
        RdfMediaType::from_media_type(media_type).ok_or_else(|| GraphError::unsupported(media_type))?;
    let mut serializer = RdfSerializer::from_format(format.rdf_format());
    if format != RdfMediaType::NTriples {
        serializer = serializer
            .with_prefix("ldp", ldp::NS)
            .map_err(|e| GraphError::InvalidIri(e.to_string()))?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for t in sorted(graph) {
        writer
            .serialize_triple(t)
            .map_err(|e| GraphError::Serialize(e.to_string()))?;
    }
    writer
        .finish()
        .map_err(|e| GraphError::Serialize(e.to_string()))
}

fn sorted(graph: &Graph) -> Vec<TripleRef<'_>> {
    let mut triples: Vec<TripleRef<'_>> = graph.iter().collect();
    triples.sort_by_cached_key(|t| {
        (
            t.subject.to_string(),
            t.predicate.to_string(),
            t.object.to_string(),
        )
    });
    triples
}
