//! RDF media type registry

use oxigraph::io::RdfFormat;
use std::fmt;

use ldp_vocab::media_types;

/// RDF serializations understood by the server, in preference order.
///
/// The first entry is the default used when a client expresses no preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfMediaType {
    Turtle,
    NTriples,
    RdfXml,
}

impl RdfMediaType {
    /// All supported types, default first
    pub const ALL: [RdfMediaType; 3] = [
        RdfMediaType::Turtle,
        RdfMediaType::NTriples,
        RdfMediaType::RdfXml,
    ];

    /// Look up a media type, ignoring case and any parameters
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            media_types::TURTLE => Some(RdfMediaType::Turtle),
            media_types::N_TRIPLES => Some(RdfMediaType::NTriples),
            media_types::RDF_XML => Some(RdfMediaType::RdfXml),
            _ => None,
        }
    }

    /// Whether the media type names an RDF serialization
    pub fn is_rdf(media_type: &str) -> bool {
        Self::from_media_type(media_type).is_some()
    }

    /// Canonical media type string
    pub fn as_str(&self) -> &'static str {
        match self {
            RdfMediaType::Turtle => media_types::TURTLE,
            RdfMediaType::NTriples => media_types::N_TRIPLES,
            RdfMediaType::RdfXml => media_types::RDF_XML,
        }
    }

    /// Media type strings of every supported serialization, default first
    pub fn media_types() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }

    pub(crate) fn rdf_format(&self) -> RdfFormat {
        match self {
            RdfMediaType::Turtle => RdfFormat::Turtle,
            RdfMediaType::NTriples => RdfFormat::NTriples,
            RdfMediaType::RdfXml => RdfFormat::RdfXml,
        }
    }
}

impl fmt::Display for RdfMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
