//! `Prefer: return=representation` (RFC 7240, LDP section 7.2)
//!
//! The representation of an RDF resource is split into named sections the
//! client can ask the server to leave out. LDP preference URIs map onto those
//! sections; any other URI under `include=` is kept as an extra inclusion hint.

use std::collections::BTreeSet;

use ldp_vocab::ldp;

/// Omittable part of an RDF representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Client content (and type triples of plain RDF sources)
    Minimal,
    /// Membership and membership-configuration triples
    Membership,
    /// `ldp:contains` triples
    Containment,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Minimal, Section::Membership, Section::Containment];

    /// Section named by an LDP preference URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            ldp::PREFER_CONTAINMENT => Some(Section::Containment),
            ldp::PREFER_MEMBERSHIP => Some(Section::Membership),
            ldp::PREFER_MINIMAL_CONTAINER | ldp::PREFER_EMPTY_CONTAINER => Some(Section::Minimal),
            _ => None,
        }
    }
}

/// Set of sections to leave out of a representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OmitSet(BTreeSet<Section>);

impl OmitSet {
    /// Omit nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, section: Section) -> bool {
        self.0.contains(&section)
    }

    pub fn insert(&mut self, section: Section) {
        self.0.insert(section);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Section> for OmitSet {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        OmitSet(iter.into_iter().collect())
    }
}

/// Parsed representation preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preference {
    /// Sections to leave out
    pub omits: OmitSet,
    /// Non-LDP URIs requested under `include=`
    pub includes: BTreeSet<String>,
}

impl Preference {
    /// Parse every `Prefer` header value of a request.
    ///
    /// Values other than `return=representation` and unknown parameters are
    /// ignored. Including any LDP section omits every section not included.
    pub fn parse<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut pref = Preference::default();
        let mut included: BTreeSet<Section> = BTreeSet::new();

        for value in values {
            let mut parts = value.split(';');
            let Some(first) = parts.next() else { continue };
            let (key, val) = split_param(first);
            if !key.eq_ignore_ascii_case("return") || !val.eq_ignore_ascii_case("representation") {
                continue;
            }
            for param in parts {
                let (key, val) = split_param(param);
                let uris = val.split_whitespace();
                if key.eq_ignore_ascii_case("include") {
                    for uri in uris {
                        match Section::from_uri(uri) {
                            Some(section) => {
                                included.insert(section);
                            }
                            None => {
                                pref.includes.insert(uri.to_string());
                            }
                        }
                    }
                } else if key.eq_ignore_ascii_case("omit") {
                    for section in uris.filter_map(Section::from_uri) {
                        pref.omits.insert(section);
                    }
                }
            }
        }

        if !included.is_empty() {
            for section in Section::ALL.into_iter().filter(|s| !included.contains(s)) {
                pref.omits.insert(section);
            }
        }
        pref
    }

    /// Whether a requested extra inclusion is present
    pub fn includes(&self, uri: &str) -> bool {
        self.includes.contains(uri)
    }
}

/// Split `key = "value"` into trimmed key and unquoted value
fn split_param(param: &str) -> (&str, &str) {
    match param.split_once('=') {
        Some((k, v)) => (k.trim(), v.trim().trim_matches('"')),
        None => (param.trim(), ""),
    }
}
