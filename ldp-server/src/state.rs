//! Application state management
//!
//! The whole repository sits behind one `RwLock`. Each handler takes the lock
//! once and performs its read-modify-write under it, so a request sees a
//! consistent view of every resource it touches.

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::extract::UserTable;
use crate::routes::{CONSTRAINTS_PATH, STATUS_PATH};
use ldp_core::{Resource, Store};
use parking_lot::RwLock;
use std::time::Instant;
use tracing::info;

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The repository
    pub store: RwLock<Store>,
    /// Basic-auth user table
    pub users: UserTable,
    /// WebID with full control
    pub root_webid: Option<String>,
    /// Base URI without trailing slash
    pub base_uri: String,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create the state and bootstrap the root container and its ACLs
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate().map_err(ServerError::bad_request)?;

        let base_uri = config.base_uri();
        let users = UserTable::from_config(&config).map_err(ServerError::bad_request)?;
        let root_webid = config.root_webid();

        let mut store = Store::new(&base_uri)
            .with_acl_inheritance_limit(config.acl_inheritance_limit)
            .with_acl_default(&format!("{}{}", base_uri, config.default_acl))
            .with_reserved(STATUS_PATH)
            .with_reserved(CONSTRAINTS_PATH);
        bootstrap(&mut store, &config, root_webid.as_deref())?;

        Ok(Self {
            config,
            store: RwLock::new(store),
            users,
            root_webid,
            base_uri,
            start_time: Instant::now(),
        })
    }

    /// Absolute URI of a request path
    pub fn resource_uri(&self, path: &str) -> String {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            self.base_uri.clone()
        } else {
            format!("{}{}", self.base_uri, path)
        }
    }

    /// URI of the constraints document
    pub fn constraints_uri(&self) -> String {
        format!("{}{}", self.base_uri, CONSTRAINTS_PATH)
    }

    /// Whether `agent` is the root identity
    pub fn is_root(&self, agent: Option<&str>) -> bool {
        agent.is_some() && agent == self.root_webid.as_deref()
    }
}

/// Create the root container and, with ACLs enabled, the root and default ACLs
fn bootstrap(store: &mut Store, config: &ServerConfig, root_webid: Option<&str>) -> Result<()> {
    let root = store.add(
        Resource::container(config.container_type.into()),
        Some(&config.root_container),
        None,
        None,
    )?;

    if !config.acl_enabled() {
        info!(root = %root, "repository bootstrapped without ACLs");
        return Ok(());
    }

    let root_acl = store.add(Resource::access_control(Some(&root)), Some(&config.root_acl), None, None)?;
    {
        let acl = store.get_mut(&root_acl)?;
        acl.add_public_read(true)?;
        if let Some(webid) = root_webid {
            acl.add_owner(webid, true)?;
        }
    }
    store.get_mut(&root)?.acl = Some(root_acl.clone());

    let default_acl = store.acl_default().to_string();
    let default_acl = store.add(Resource::access_control(Some(&root)), Some(&default_acl), None, None)?;
    store.get_mut(&default_acl)?.add_public_read(true)?;

    info!(root = %root, root_acl = %root_acl, default_acl = %default_acl, "repository bootstrapped");
    Ok(())
}
