//! LDP request headers extractor

use axum::extract::FromRequestParts;
use axum::http::header::{HeaderMap, ACCEPT, CONTENT_TYPE, IF_MATCH, LINK};
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use ldp_core::{parse_http_date, Preference};

use super::links::RequestLinks;
use crate::error::{Result, ServerError};

/// Headers that drive the LDP protocol state machine
#[derive(Debug, Clone, Default)]
pub struct LdpHeaders {
    /// Raw HTTP headers (for telemetry/tracing)
    pub raw: HeaderMap,

    /// Content-Type essence, lowercased, parameters stripped
    pub content_type: Option<String>,

    /// `Link` headers
    pub links: RequestLinks,

    /// `Prefer: return=representation` preferences
    pub prefer: Preference,

    /// Suggested last path segment for POST
    pub slug: Option<String>,

    /// `If-Match` entity tags (`*` kept as is)
    pub if_match: Option<Vec<String>>,

    /// Request body fixity (`Digest`)
    pub digest: Option<String>,

    /// Requested response fixity (`Want-Digest`)
    pub want_digest: Option<String>,

    /// `Accept` header value
    pub accept: Option<String>,

    memento_datetime: Option<String>,
    accept_datetime: Option<String>,
}

impl LdpHeaders {
    /// Header names
    pub const SLUG: &'static str = "slug";
    pub const PREFER: &'static str = "prefer";
    pub const DIGEST: &'static str = "digest";
    pub const WANT_DIGEST: &'static str = "want-digest";
    pub const MEMENTO_DATETIME: &'static str = "memento-datetime";
    pub const ACCEPT_DATETIME: &'static str = "accept-datetime";

    /// Parse headers from a HeaderMap
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let mut ldp_headers = Self {
            raw: headers.clone(),
            ..Default::default()
        };

        // Content-Type: at most one
        let mut content_types = headers.get_all(CONTENT_TYPE).iter();
        if let Some(ct) = content_types.next() {
            if content_types.next().is_some() {
                return Err(ServerError::invalid_header("more than one Content-Type"));
            }
            let ct = ct
                .to_str()
                .map_err(|_| ServerError::invalid_header("Content-Type is not ASCII"))?;
            let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
            if !essence.is_empty() {
                ldp_headers.content_type = Some(essence);
            }
        }

        let link_values = get_all_str(headers, LINK.as_str())?;
        ldp_headers.links = RequestLinks::parse(link_values.iter().copied())?;

        ldp_headers.prefer = Preference::parse(get_all_str(headers, Self::PREFER)?);

        ldp_headers.if_match = joined(headers, IF_MATCH.as_str())?.map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        });

        ldp_headers.slug = get_header_str(headers, Self::SLUG)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        ldp_headers.digest = joined(headers, Self::DIGEST)?;
        ldp_headers.want_digest = joined(headers, Self::WANT_DIGEST)?;
        ldp_headers.accept = joined(headers, ACCEPT.as_str())?;
        ldp_headers.memento_datetime = get_header_str(headers, Self::MEMENTO_DATETIME).map(str::to_string);
        ldp_headers.accept_datetime = get_header_str(headers, Self::ACCEPT_DATETIME).map(str::to_string);

        Ok(ldp_headers)
    }

    /// Content-Type, required when the body is interpreted
    pub fn require_content_type(&self) -> Result<&str> {
        self.content_type
            .as_deref()
            .ok_or_else(|| ServerError::bad_request("Content-Type header is required"))
    }

    /// `Memento-Datetime` as an instant
    pub fn memento_datetime(&self) -> Result<Option<DateTime<Utc>>> {
        parse_datetime(self.memento_datetime.as_deref(), Self::MEMENTO_DATETIME)
    }

    /// `Accept-Datetime` as an instant
    pub fn accept_datetime(&self) -> Result<Option<DateTime<Utc>>> {
        parse_datetime(self.accept_datetime.as_deref(), Self::ACCEPT_DATETIME)
    }
}

fn parse_datetime(value: Option<&str>, name: &str) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|v| {
            parse_http_date(v)
                .ok_or_else(|| ServerError::invalid_header(format!("{name} is not an HTTP date: {v}")))
        })
        .transpose()
}

/// Get a header value as a string slice
fn get_header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Every value of a repeated header
fn get_all_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Vec<&'a str>> {
    headers
        .get_all(name)
        .iter()
        .map(|v| {
            v.to_str()
                .map_err(|_| ServerError::invalid_header(format!("{name} is not ASCII")))
        })
        .collect()
}

/// Repeated header values joined as one comma-separated list
fn joined(headers: &HeaderMap, name: &str) -> Result<Option<String>> {
    let values = get_all_str(headers, name)?;
    Ok((!values.is_empty()).then(|| values.join(", ")))
}

/// Axum extractor implementation
#[axum::async_trait]
impl<S> FromRequestParts<S> for LdpHeaders
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        LdpHeaders::from_headers(&parts.headers)
    }
}
