//! Web Access Control resources

use ldp_graph::{iri, subject_iri, term_iri, Graph, NamedNodeRef, SubjectRef, Triple};
use ldp_vocab::{acl, foaf, rdf};

/// Access mode requested by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    Append,
    Control,
}

impl AccessMode {
    fn iri(&self) -> &'static str {
        match self {
            AccessMode::Read => acl::READ,
            AccessMode::Write => acl::WRITE,
            AccessMode::Append => acl::APPEND,
            AccessMode::Control => acl::CONTROL,
        }
    }
}

/// ACL payload: an RDF graph of `acl:Authorization` statements
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    pub(crate) graph: Graph,
    pub acl_for: Option<String>,
}

impl AccessControl {
    pub fn new(acl_for: Option<String>) -> Self {
        Self {
            graph: Graph::new(),
            acl_for,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn authorization_subjects(&self) -> impl Iterator<Item = SubjectRef<'_>> {
        self.graph.subjects_for_predicate_object(
            NamedNodeRef::new_unchecked(rdf::TYPE),
            NamedNodeRef::new_unchecked(acl::AUTHORIZATION),
        )
    }

    /// Subjects typed `acl:Authorization`, as IRIs or blank node labels
    pub fn authorizations(&self) -> Vec<String> {
        let mut auths: Vec<String> = self
            .authorization_subjects()
            .map(|s| subject_iri(s).map_or_else(|| s.to_string(), str::to_string))
            .collect();
        auths.sort();
        auths
    }

    fn is_heritable(&self, auth: SubjectRef<'_>) -> bool {
        self.graph
            .objects_for_subject_predicate(auth, NamedNodeRef::new_unchecked(acl::DEFAULT))
            .next()
            .is_some()
    }

    /// Whether any authorization propagates to descendants (`acl:default`)
    pub fn has_heritable_auths(&self) -> bool {
        self.authorization_subjects().any(|a| self.is_heritable(a))
    }

    fn objects<'a>(&'a self, auth: SubjectRef<'a>, predicate: &'static str) -> impl Iterator<Item = &'a str> + 'a {
        self.graph
            .objects_for_subject_predicate(auth, NamedNodeRef::new_unchecked(predicate))
            .filter_map(term_iri)
    }

    /// Whether `agent` (None for anonymous) is granted `mode`.
    ///
    /// When `inherited` is set only heritable authorizations count. `acl:Write`
    /// implies `acl:Append`.
    pub fn grants(&self, agent: Option<&str>, mode: AccessMode, inherited: bool) -> bool {
        self.authorization_subjects().any(|auth| {
            if inherited && !self.is_heritable(auth) {
                return false;
            }
            let mode_ok = self.objects(auth, acl::MODE).any(|m| {
                m == mode.iri() || (mode == AccessMode::Append && m == acl::WRITE)
            });
            if !mode_ok {
                return false;
            }
            let agent_match = agent.is_some_and(|a| self.objects(auth, acl::AGENT).any(|o| o == a));
            agent_match
                || self.objects(auth, acl::AGENT_CLASS).any(|class| {
                    class == foaf::AGENT || (class == acl::AUTHENTICATED_AGENT && agent.is_some())
                })
        })
    }

    /// Mint the next unused `<acl>#authorizationN` subject
    fn next_authorization(&self, acl_uri: &str) -> String {
        let existing = self.authorizations();
        (1..)
            .map(|n| format!("{acl_uri}#authorization{n}"))
            .find(|candidate| !existing.contains(candidate))
            .unwrap_or_else(|| format!("{acl_uri}#authorization"))
    }

    fn add_authorization(
        &mut self,
        acl_uri: &str,
        modes: &[&str],
        agent_predicate: &str,
        agent: &str,
        inherit: bool,
    ) -> String {
        let auth = self.next_authorization(acl_uri);
        let mut add = |p: &str, o: &str| {
            self.graph.insert(&Triple::new(iri(&auth), iri(p), iri(o)));
        };
        add(rdf::TYPE, acl::AUTHORIZATION);
        add(agent_predicate, agent);
        for mode in modes {
            add(acl::MODE, mode);
        }
        if let Some(target) = self.acl_for.clone() {
            add(acl::ACCESS_TO, &target);
            if inherit {
                add(acl::DEFAULT, &target);
            }
        }
        auth
    }

    /// Grant everyone read access to the protected resource
    pub fn add_public_read(&mut self, acl_uri: &str, inherit: bool) -> String {
        self.add_authorization(acl_uri, &[acl::READ], acl::AGENT_CLASS, foaf::AGENT, inherit)
    }

    /// Grant `agent` full control of the protected resource
    pub fn add_owner(&mut self, acl_uri: &str, agent: &str, inherit: bool) -> String {
        self.add_authorization(
            acl_uri,
            &[acl::READ, acl::WRITE, acl::CONTROL],
            acl::AGENT,
            agent,
            inherit,
        )
    }
}
