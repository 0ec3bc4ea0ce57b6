//! Core of the LDP server: resource model, repository and fixity
//!
//! This crate has no HTTP dependencies. It defines:
//!
//! - [`resource`] - the resource variants and their server-managed triples
//! - [`store`] - URI allocation, containment, tombstones and ACL resolution
//! - [`digest`] - `Digest` / `Want-Digest` fixity handling
//! - [`prefer`] - representation sections selectable with `Prefer`

pub mod digest;
pub mod error;
pub mod prefer;
pub mod resource;
pub mod store;

pub use digest::{check_digest, resolve_want_digest, DigestAlgorithm, WantDigest};
pub use error::{DigestError, ResourceError, Result, StoreError};
pub use prefer::{OmitSet, Preference, Section};
pub use resource::{
    format_http_date, parse_http_date, AccessControl, AccessMode, Container, ContainerType,
    InteractionModel, Mode, NonRdfSource, RdfSource, Resource, ResourceKind, VersionContainer,
};
pub use store::{EffectiveAcl, Store};
