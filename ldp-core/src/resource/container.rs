//! Containers: containment and membership bookkeeping

use std::collections::BTreeSet;

use ldp_graph::{iri, term_iri, Graph, NamedNodeRef, Triple};
use ldp_vocab::ldp;

use crate::error::ResourceError;
use crate::prefer::{OmitSet, Section};

/// LDP container flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerType {
    #[default]
    Basic,
    Direct,
    Indirect,
}

impl ContainerType {
    pub fn type_iri(&self) -> &'static str {
        match self {
            ContainerType::Basic => ldp::BASIC_CONTAINER,
            ContainerType::Direct => ldp::DIRECT_CONTAINER,
            ContainerType::Indirect => ldp::INDIRECT_CONTAINER,
        }
    }

    /// Container type for a type IRI. Generic `ldp:Container` means Basic.
    pub fn from_type_iri(type_iri: &str) -> Option<Self> {
        match type_iri {
            ldp::BASIC_CONTAINER | ldp::CONTAINER => Some(ContainerType::Basic),
            ldp::DIRECT_CONTAINER => Some(ContainerType::Direct),
            ldp::INDIRECT_CONTAINER => Some(ContainerType::Indirect),
            _ => None,
        }
    }

    /// Parse a container type IRI, rejecting anything else
    pub fn parse(type_iri: &str) -> Result<Self, ResourceError> {
        Self::from_type_iri(type_iri)
            .ok_or_else(|| ResourceError::UnsupportedContainerType(type_iri.to_string()))
    }

    fn has_membership(&self) -> bool {
        !matches!(self, ContainerType::Basic)
    }
}

/// Container payload.
///
/// `contains` and `members` are server managed; the membership configuration
/// is extracted from client content on parse and regenerated on output.
#[derive(Debug, Clone)]
pub struct Container {
    pub(crate) graph: Graph,
    container_type: ContainerType,
    contains: BTreeSet<String>,
    members: BTreeSet<String>,
    membership_predicate: String,
    membership_resource: Option<String>,
    inserted_content_relation: String,
}

impl Container {
    pub fn new(container_type: ContainerType) -> Self {
        Self {
            graph: Graph::new(),
            container_type,
            contains: BTreeSet::new(),
            members: BTreeSet::new(),
            membership_predicate: ldp::MEMBER.to_string(),
            membership_resource: None,
            inserted_content_relation: ldp::MEMBER_SUBJECT.to_string(),
        }
    }

    pub fn container_type(&self) -> ContainerType {
        self.container_type
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn contains(&self) -> &BTreeSet<String> {
        &self.contains
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn membership_predicate(&self) -> &str {
        &self.membership_predicate
    }

    /// Subject of membership triples; the container itself unless configured
    pub fn membership_resource<'a>(&'a self, self_uri: &'a str) -> &'a str {
        self.membership_resource.as_deref().unwrap_or(self_uri)
    }

    pub fn inserted_content_relation(&self) -> &str {
        &self.inserted_content_relation
    }

    pub(crate) fn add_contained(&mut self, uri: &str) -> bool {
        self.contains.insert(uri.to_string())
    }

    pub(crate) fn del_contained(&mut self, self_uri: &str, uri: &str) -> Result<(), ResourceError> {
        if self.contains.remove(uri) {
            Ok(())
        } else {
            Err(ResourceError::NotContained {
                container: self_uri.to_string(),
                uri: uri.to_string(),
            })
        }
    }

    pub(crate) fn add_member(&mut self, member: &str) -> bool {
        self.members.insert(member.to_string())
    }

    pub(crate) fn del_member(&mut self, self_uri: &str, member: &str) -> Result<(), ResourceError> {
        if self.members.remove(member) {
            Ok(())
        } else {
            Err(ResourceError::NotMember {
                container: self_uri.to_string(),
                member: member.to_string(),
            })
        }
    }

    /// Member URI contributed by a newly contained resource.
    ///
    /// Basic containers have no membership. Direct containers use the new
    /// resource itself, as do Indirect containers whose inserted content
    /// relation is `ldp:MemberSubject`; otherwise the first IRI object of that
    /// relation in the new resource's content is the member.
    pub fn member_for(&self, new_uri: &str, content: Option<&Graph>) -> Option<String> {
        match self.container_type {
            ContainerType::Basic => None,
            ContainerType::Direct => Some(new_uri.to_string()),
            ContainerType::Indirect if self.inserted_content_relation == ldp::MEMBER_SUBJECT => {
                Some(new_uri.to_string())
            }
            ContainerType::Indirect => {
                let subject = iri(new_uri);
                let relation = NamedNodeRef::new_unchecked(&self.inserted_content_relation);
                content?
                    .objects_for_subject_predicate(subject.as_ref(), relation)
                    .find_map(|o| term_iri(o).map(str::to_string))
            }
        }
    }

    /// Pull membership configuration triples about `subject` out of `graph`.
    pub(crate) fn configure_from(&mut self, graph: &mut Graph, subject: &str) -> Result<(), ResourceError> {
        if !self.container_type.has_membership() {
            return Ok(());
        }

        if let Some(predicate) = take_single(graph, subject, ldp::HAS_MEMBER_RELATION)? {
            if predicate == ldp::CONTAINS {
                return Err(ResourceError::DataConflict(
                    "ldp:contains cannot be used as the membership predicate".to_string(),
                ));
            }
            self.membership_predicate = predicate;
        }
        if let Some(resource) = take_single(graph, subject, ldp::MEMBERSHIP_RESOURCE)? {
            self.membership_resource = Some(resource);
        }
        if self.container_type == ContainerType::Indirect {
            if let Some(relation) = take_single(graph, subject, ldp::INSERTED_CONTENT_RELATION)? {
                self.inserted_content_relation = relation;
            }
        }
        Ok(())
    }

    /// Server-managed containment triples
    pub(crate) fn containment_graph(&self, self_uri: &str) -> Graph {
        let mut g = Graph::new();
        for uri in &self.contains {
            g.insert(&ldp_graph::triple(self_uri, ldp::CONTAINS, uri));
        }
        g
    }

    /// Add containment or membership triples, honouring `omits`
    pub(crate) fn add_server_triples(&self, graph: &mut Graph, self_uri: &str, omits: &OmitSet) {
        if !self.container_type.has_membership() {
            if !omits.contains(Section::Containment) {
                ldp_graph::merge(graph, &self.containment_graph(self_uri));
            }
            return;
        }
        if omits.contains(Section::Membership) {
            return;
        }

        let membership_resource = self.membership_resource(self_uri);
        for member in &self.members {
            graph.insert(&ldp_graph::triple(
                membership_resource,
                &self.membership_predicate,
                member,
            ));
        }
        graph.insert(&ldp_graph::triple(self_uri, ldp::MEMBERSHIP_RESOURCE, membership_resource));
        graph.insert(&ldp_graph::triple(
            self_uri,
            ldp::HAS_MEMBER_RELATION,
            &self.membership_predicate,
        ));
        graph.insert(&ldp_graph::triple(
            self_uri,
            ldp::INSERTED_CONTENT_RELATION,
            &self.inserted_content_relation,
        ));
    }
}

/// Remove and return the single IRI object of `(subject, predicate, ?)`.
fn take_single(graph: &mut Graph, subject: &str, predicate: &str) -> Result<Option<String>, ResourceError> {
    let s = iri(subject);
    let p = iri(predicate);
    let found: Vec<Triple> = graph
        .triples_for_subject(s.as_ref())
        .filter(|t| t.predicate == p.as_ref())
        .map(|t| t.into_owned())
        .collect();

    let value = match found.as_slice() {
        [] => return Ok(None),
        [t] => term_iri(t.object.as_ref())
            .map(str::to_string)
            .ok_or_else(|| ResourceError::DataConflict(format!("<{predicate}> must be an IRI")))?,
        _ => {
            return Err(ResourceError::DataConflict(format!(
                "more than one value for <{predicate}>"
            )))
        }
    };
    for t in &found {
        graph.remove(t);
    }
    Ok(Some(value))
}
