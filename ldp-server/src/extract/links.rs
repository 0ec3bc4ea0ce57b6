//! `Link` header parsing and formatting

use ldp_core::InteractionModel;
use ldp_vocab::memento;

use crate::error::{Result, ServerError};

/// One `<uri>; rel="..."` link value with its rel tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub uri: String,
    pub rels: Vec<String>,
}

/// Links sent by the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLinks {
    links: Vec<Link>,
}

impl RequestLinks {
    /// Parse every `Link` header value of a request
    pub fn parse<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut links = Vec::new();
        for value in values {
            for item in split_link_values(value) {
                links.push(parse_link(item)?);
            }
        }
        Ok(Self { links })
    }

    /// URIs of links carrying `rel`
    pub fn rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.links
            .iter()
            .filter(move |l| l.rels.iter().any(|r| r == rel))
            .map(|l| l.uri.as_str())
    }

    /// Interaction model requested with `rel="type"` links.
    ///
    /// Container types are more specific than `ldp:RDFSource` and the last
    /// one wins. Asking for a Non-RDF source together with any RDF type is
    /// rejected.
    pub fn interaction_model(&self) -> Result<Option<InteractionModel>> {
        let mut model = None;
        let mut non_rdf = false;
        let mut rdf = false;
        for type_iri in self.rel("type") {
            match InteractionModel::from_type_iri(type_iri) {
                Some(InteractionModel::NonRdfSource) => non_rdf = true,
                Some(container @ InteractionModel::Container(_)) => {
                    rdf = true;
                    model = Some(container);
                }
                Some(InteractionModel::RdfSource) => {
                    rdf = true;
                    if !matches!(model, Some(InteractionModel::Container(_))) {
                        model = Some(InteractionModel::RdfSource);
                    }
                }
                None => {}
            }
        }
        if non_rdf && rdf {
            return Err(ServerError::bad_request(
                "a Non-RDF source cannot also be an RDF source or container",
            ));
        }
        Ok(if non_rdf {
            Some(InteractionModel::NonRdfSource)
        } else {
            model
        })
    }

    /// Whether the client asked for Memento versioning
    pub fn wants_versioning(&self) -> bool {
        self.rel("type").any(|t| t == memento::ORIGINAL_RESOURCE)
    }

    /// ACL assigned with `rel="acl"`. At most one is allowed and it must
    /// satisfy `is_local`.
    pub fn acl(&self, is_local: impl Fn(&str) -> bool) -> Result<Option<String>> {
        let mut acls = self.rel("acl");
        let Some(acl) = acls.next() else {
            return Ok(None);
        };
        if acls.next().is_some() {
            return Err(ServerError::bad_request("more than one rel=\"acl\" link"));
        }
        if !is_local(acl) {
            return Err(ServerError::bad_request(format!("ACL {acl} is not on this server")));
        }
        Ok(Some(acl.to_string()))
    }
}

/// Split a header value on commas outside `<...>` and quotes
fn split_link_values(value: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_uri = false;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '<' if !in_quote => in_uri = true,
            '>' if !in_quote => in_uri = false,
            '"' if !in_uri => in_quote = !in_quote,
            ',' if !in_uri && !in_quote => {
                items.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start..]);
    items.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn parse_link(item: &str) -> Result<Link> {
    let malformed = || ServerError::invalid_header(format!("malformed Link value: {item}"));
    let rest = item.strip_prefix('<').ok_or_else(malformed)?;
    let (uri, params) = rest.split_once('>').ok_or_else(malformed)?;

    let mut rels = Vec::new();
    for param in params.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("rel") {
            rels.extend(
                value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }
    Ok(Link {
        uri: uri.trim().to_string(),
        rels,
    })
}

/// Links sent back to the client, deduplicated in insertion order
#[derive(Debug, Clone, Default)]
pub struct ResponseLinks {
    links: Vec<(String, String)>,
}

impl ResponseLinks {
    pub fn add(&mut self, uri: &str, rel: &str) -> &mut Self {
        if !self.links.iter().any(|(u, r)| u == uri && r == rel) {
            self.links.push((uri.to_string(), rel.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Single `Link` header value
    pub fn header_value(&self) -> String {
        self.links
            .iter()
            .map(|(uri, rel)| format!("<{uri}>; rel=\"{rel}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
