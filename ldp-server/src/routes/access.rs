//! Web Access Control enforcement

use ldp_core::{AccessMode, Resource, Store};
use tracing::debug;

use crate::error::{Result, ServerError};
use crate::extract::Agent;
use crate::state::AppState;

/// Fail unless `agent` may perform `mode` on `uri`.
///
/// The root identity may do anything. With ACLs disabled any authenticated
/// agent may do anything. Otherwise the effective ACL of the target decides;
/// an ACL resource itself is governed by `acl:Control` on the resource it
/// protects.
pub(crate) fn authorize(
    state: &AppState,
    store: &Store,
    uri: &str,
    mode: AccessMode,
    agent: &Agent,
) -> Result<()> {
    if !state.config.auth_enabled() || state.is_root(agent.webid()) {
        return Ok(());
    }
    if !state.config.acl_enabled() {
        return match agent.webid() {
            Some(_) => Ok(()),
            None => Err(ServerError::unauthorized("authentication required")),
        };
    }

    let protected = store
        .get(uri)
        .ok()
        .and_then(Resource::as_access_control)
        .and_then(|a| a.acl_for.as_deref())
        .filter(|target| store.contains(target));
    let (target, mode) = match protected {
        Some(target) => (target, AccessMode::Control),
        None => (uri, mode),
    };

    let effective = store.resolve_acl(target)?;
    let granted = store
        .get(&effective.uri)
        .ok()
        .and_then(Resource::as_access_control)
        .is_some_and(|acl| acl.grants(agent.webid(), mode, effective.inherited));
    debug!(
        uri = %target,
        acl = %effective.uri,
        inherited = effective.inherited,
        ?mode,
        granted,
        "access check"
    );

    match (granted, agent.webid()) {
        (true, _) => Ok(()),
        (false, None) => Err(ServerError::unauthorized(format!(
            "authentication required for {mode:?} access to {target}"
        ))),
        (false, Some(webid)) => Err(ServerError::forbidden(format!(
            "{webid} has no {mode:?} access to {target}"
        ))),
    }
}
