//! Server configuration

use clap::{Parser, ValueEnum};
use ldp_core::ContainerType;
use std::net::SocketAddr;

/// Interaction model of the root container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RootContainerType {
    #[default]
    Basic,
    Direct,
    Indirect,
}

impl From<RootContainerType> for ContainerType {
    fn from(value: RootContainerType) -> Self {
        match value {
            RootContainerType::Basic => ContainerType::Basic,
            RootContainerType::Direct => ContainerType::Direct,
            RootContainerType::Indirect => ContainerType::Indirect,
        }
    }
}

/// A `webid=user:pass` entry of the user table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub webid: String,
    pub username: String,
    pub password: String,
}

impl UserEntry {
    /// Parse `webid=user:pass`. The WebID may itself contain `=`.
    pub fn parse(entry: &str) -> Result<Self, String> {
        let (webid, credentials) = entry
            .rsplit_once('=')
            .ok_or_else(|| format!("user entry '{entry}' must look like webid=user:pass"))?;
        let (username, password) = credentials
            .split_once(':')
            .ok_or_else(|| format!("user entry '{entry}' is missing ':' between user and password"))?;
        if webid.is_empty() || username.is_empty() {
            return Err(format!("user entry '{entry}' has an empty webid or user name"));
        }
        Ok(Self {
            webid: webid.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// LDP server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "ldp-server")]
#[command(about = "Linked Data Platform compliance server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "LDP_LISTEN_ADDR", default_value = "127.0.0.1:9999")]
    pub listen_addr: SocketAddr,

    /// Public base URI of the repository (default: http://<listen-addr>)
    #[arg(long, env = "LDP_BASE_URI")]
    pub base_uri: Option<String>,

    /// Path of the root container
    #[arg(long, env = "LDP_ROOT_CONTAINER", default_value = "/")]
    pub root_container: String,

    /// Interaction model of the root container
    #[arg(long, env = "LDP_CONTAINER_TYPE", value_enum, default_value = "basic")]
    pub container_type: RootContainerType,

    /// Disable PUT
    #[arg(long, env = "LDP_NO_PUT")]
    pub no_put: bool,

    /// Disable DELETE
    #[arg(long, env = "LDP_NO_DELETE")]
    pub no_delete: bool,

    /// Disable PATCH
    #[arg(long, env = "LDP_NO_PATCH")]
    pub no_patch: bool,

    /// Disable Memento versioning
    #[arg(long, env = "LDP_NO_VERSIONING")]
    pub no_versioning: bool,

    /// Disable Web Access Control
    #[arg(long, env = "LDP_NO_ACL")]
    pub no_acl: bool,

    /// Disable authentication; every request acts as the root WebID
    #[arg(long, env = "LDP_NO_AUTH")]
    pub no_auth: bool,

    /// Allow PUT replacement without an If-Match header
    #[arg(long, env = "LDP_OPTIONAL_IF_MATCH_ETAG")]
    pub optional_if_match_etag: bool,

    /// User table entry `webid=user:pass` (repeatable)
    #[arg(
        long = "user",
        env = "LDP_USERS",
        value_delimiter = ',',
        default_value = "http://example.org/rootuser#i=root:secret"
    )]
    pub users: Vec<String>,

    /// WebID with full control (default: first user)
    #[arg(long, env = "LDP_ROOT_WEBID")]
    pub root_webid: Option<String>,

    /// Path of the root container's ACL
    #[arg(long, env = "LDP_ROOT_ACL", default_value = "/.acl")]
    pub root_acl: String,

    /// Path of the ACL used when no resource on the path has one
    #[arg(long, env = "LDP_DEFAULT_ACL", default_value = "/default.acl")]
    pub default_acl: String,

    /// Maximum containment depth walked when resolving inherited ACLs
    #[arg(long, env = "LDP_ACL_INHERITANCE_LIMIT", default_value = "100")]
    pub acl_inheritance_limit: usize,

    /// Request body size limit in bytes (default 50MB)
    #[arg(long, env = "LDP_BODY_LIMIT", default_value = "52428800")]
    pub body_limit: usize,

    /// Enable CORS (Cross-Origin Resource Sharing)
    #[arg(long = "cors", env = "LDP_CORS_ENABLED")]
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LDP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 9999)),
            base_uri: None,
            root_container: "/".to_string(),
            container_type: RootContainerType::Basic,
            no_put: false,
            no_delete: false,
            no_patch: false,
            no_versioning: false,
            no_acl: false,
            no_auth: false,
            optional_if_match_etag: false,
            users: vec!["http://example.org/rootuser#i=root:secret".to_string()],
            root_webid: None,
            root_acl: "/.acl".to_string(),
            default_acl: "/default.acl".to_string(),
            acl_inheritance_limit: 100,
            body_limit: 52_428_800,
            cors_enabled: false,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Base URI without a trailing slash
    pub fn base_uri(&self) -> String {
        match &self.base_uri {
            Some(uri) => uri.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.listen_addr),
        }
    }

    pub fn put_enabled(&self) -> bool {
        !self.no_put
    }

    pub fn delete_enabled(&self) -> bool {
        !self.no_delete
    }

    pub fn patch_enabled(&self) -> bool {
        !self.no_patch
    }

    pub fn versioning_enabled(&self) -> bool {
        !self.no_versioning
    }

    pub fn acl_enabled(&self) -> bool {
        !self.no_acl
    }

    pub fn auth_enabled(&self) -> bool {
        !self.no_auth
    }

    /// Whether PUT replacement must carry If-Match
    pub fn require_if_match(&self) -> bool {
        !self.optional_if_match_etag
    }

    /// Parsed user table entries
    pub fn user_entries(&self) -> Result<Vec<UserEntry>, String> {
        self.users.iter().map(|u| UserEntry::parse(u)).collect()
    }

    /// WebID allowed to do anything
    pub fn root_webid(&self) -> Option<String> {
        self.root_webid.clone().or_else(|| {
            self.users
                .first()
                .and_then(|u| UserEntry::parse(u).ok())
                .map(|u| u.webid)
        })
    }

    /// Validate configuration at startup
    pub fn validate(&self) -> Result<(), String> {
        let base = self.base_uri();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(format!("base URI '{base}' must be an absolute http(s) URI"));
        }
        if !self.root_container.starts_with('/') {
            return Err(format!(
                "root container '{}' must be an absolute path",
                self.root_container
            ));
        }
        for path in [&self.root_acl, &self.default_acl] {
            if !path.starts_with('/') {
                return Err(format!("ACL path '{path}' must be an absolute path"));
            }
        }
        if self.acl_inheritance_limit == 0 {
            return Err("acl-inheritance-limit must be at least 1".to_string());
        }
        self.user_entries()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_uri(), "http://127.0.0.1:9999");
        assert_eq!(
            config.root_webid().as_deref(),
            Some("http://example.org/rootuser#i")
        );
        assert!(config.require_if_match());
    }

    #[test]
    fn test_user_entry_parse() {
        let u = UserEntry::parse("http://example.org/rootuser#i=root:secret").unwrap();
        assert_eq!(u.webid, "http://example.org/rootuser#i");
        assert_eq!(u.username, "root");
        assert_eq!(u.password, "secret");
        assert!(UserEntry::parse("nouser").is_err());
        assert!(UserEntry::parse("http://x=nopassword").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base() {
        let config = ServerConfig {
            base_uri: Some("ftp://example.org".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let config = ServerConfig::parse_from([
            "ldp-server",
            "--base-uri",
            "http://example.org/",
            "--container-type",
            "direct",
            "--no-delete",
            "--user",
            "http://a.example/#me=alice:pw",
        ]);
        assert_eq!(config.base_uri(), "http://example.org");
        assert_eq!(config.container_type, RootContainerType::Direct);
        assert!(!config.delete_enabled());
        assert_eq!(config.root_webid().as_deref(), Some("http://a.example/#me"));
    }
}
