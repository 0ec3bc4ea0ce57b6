//! HTTP Basic authentication
//!
//! Credentials are checked against a fixed user table built from
//! `webid=user:pass` configuration entries. A request with no
//! `Authorization` header is anonymous; a request with an unknown or
//! malformed one is rejected outright.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{HeaderMap, AUTHORIZATION};
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::state::AppState;

/// Username → (password, WebID)
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    users: HashMap<String, (String, String)>,
}

impl UserTable {
    pub fn from_config(config: &ServerConfig) -> Result<Self, String> {
        let users = config
            .user_entries()?
            .into_iter()
            .map(|u| (u.username, (u.password, u.webid)))
            .collect();
        Ok(Self { users })
    }

    /// WebID of `username` when `password` matches
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&str> {
        self.users
            .get(username)
            .filter(|(expected, _)| expected == password)
            .map(|(_, webid)| webid.as_str())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Authenticated identity of the request, `None` when anonymous
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agent(pub Option<String>);

impl Agent {
    pub fn webid(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// `user:pass` from a Basic `Authorization` header
fn extract_basic_credentials(
    headers: &HeaderMap,
) -> Option<Result<(String, String), ServerError>> {
    let auth = headers.get(AUTHORIZATION)?;
    Some(decode_basic(auth.to_str().unwrap_or_default()))
}

fn decode_basic(value: &str) -> Result<(String, String), ServerError> {
    let value = value.trim();
    let (scheme, encoded) = value
        .split_once(' ')
        .ok_or_else(|| ServerError::unauthorized("malformed Authorization header"))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(ServerError::unauthorized(format!(
            "unsupported authorization scheme: {scheme}"
        )));
    }
    let decoded = STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| ServerError::unauthorized("invalid Basic credentials encoding"))?;
    let (user, pass) = decoded
        .split_once(':')
        .ok_or_else(|| ServerError::unauthorized("Basic credentials must be user:password"))?;
    Ok((user.to_string(), pass.to_string()))
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Agent {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.auth_enabled() {
            return Ok(Agent(state.root_webid.clone()));
        }
        let Some(credentials) = extract_basic_credentials(&parts.headers) else {
            return Ok(Agent(None));
        };
        let (user, pass) = credentials?;
        match state.users.authenticate(&user, &pass) {
            Some(webid) => {
                tracing::debug!(user = %user, webid = %webid, "authenticated");
                Ok(Agent(Some(webid.to_string())))
            }
            None => Err(ServerError::unauthorized("invalid user name or password")),
        }
    }
}
