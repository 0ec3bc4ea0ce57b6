//! Bounded SPARQL Update

use oxigraph::model::{Graph, GraphNameRef, Triple};
use oxigraph::sparql::Update;
use oxigraph::store::Store;

use crate::error::{GraphError, Result};

/// Apply a SPARQL 1.1 Update to a copy of `graph` and return the result.
///
/// The update runs against a throwaway in-memory store seeded with the
/// graph's triples in the default graph. Only the default graph is read back,
/// so writes to named graphs are discarded. `graph` itself is never modified.
pub fn update(graph: &Graph, text: &str, base: &str) -> Result<Graph> {
    let parsed =
        Update::parse(text, Some(base)).map_err(|e| GraphError::UpdateSyntax(e.to_string()))?;

    let store = Store::new().map_err(|e| GraphError::Engine(e.to_string()))?;
    for t in graph.iter() {
        store
            .insert(t.in_graph(GraphNameRef::DefaultGraph))
            .map_err(|e| GraphError::Engine(e.to_string()))?;
    }

    store
        .update(parsed)
        .map_err(|e| GraphError::UpdateEvaluation(e.to_string()))?;

    let mut result = Graph::new();
    for quad in store.quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph)) {
        let quad = quad.map_err(|e| GraphError::Engine(e.to_string()))?;
        result.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(result)
}
