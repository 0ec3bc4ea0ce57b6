//! Server error types with HTTP status code mapping

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use ldp_core::{DigestError, ResourceError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// `WWW-Authenticate` challenge sent with 401 responses
pub const AUTH_CHALLENGE: &str = "Basic realm=\"ldp\"";

/// Server error type that wraps repository errors and provides HTTP status mapping
#[derive(Error, Debug)]
pub enum ServerError {
    /// Store error (lookup, allocation, ACL resolution)
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Resource model error (parse, patch, replacement rules)
    #[error("{0}")]
    Resource(#[from] ResourceError),

    /// Fixity error with the status chosen by the header that raised it
    #[error("{source}")]
    Digest {
        source: DigestError,
        status: StatusCode,
    },

    /// Generic bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Invalid header value
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Method disabled or not applicable to the resource
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// If-Match did not match
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// If-Match required and missing
    #[error("Precondition required: {0}")]
    PreconditionRequired(String),

    /// Request body media type not accepted
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Not Acceptable (406) - content negotiation failure
    #[error("{0}")]
    NotAcceptable(String),

    /// Unauthorized (no or invalid credentials)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted
    #[error("{0}")]
    Forbidden(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Map error to error type IRI (compact form)
    pub fn error_type(&self) -> &'static str {
        use ldp_vocab::errors;

        match self {
            ServerError::Store(e) => store_error_type(e),
            ServerError::Resource(e) => resource_error_type(e),
            ServerError::Digest {
                source: DigestError::Unsupported(_),
                ..
            } => errors::UNSUPPORTED_DIGEST,
            ServerError::Digest {
                source: DigestError::Bad(_),
                ..
            } => errors::BAD_DIGEST,
            ServerError::BadRequest(_) => errors::BAD_REQUEST,
            ServerError::InvalidHeader(_) => errors::INVALID_HEADER,
            ServerError::MethodNotAllowed(_) => errors::METHOD_NOT_ALLOWED,
            ServerError::PreconditionFailed(_) => errors::PRECONDITION_FAILED,
            ServerError::PreconditionRequired(_) => errors::PRECONDITION_REQUIRED,
            ServerError::UnsupportedMediaType(_) => errors::UNSUPPORTED_MEDIA_TYPE,
            ServerError::NotAcceptable(_) => errors::NOT_ACCEPTABLE,
            ServerError::Unauthorized(_) => errors::UNAUTHORIZED,
            ServerError::Forbidden(_) => errors::FORBIDDEN,
            ServerError::Internal(_) => errors::INTERNAL,
        }
    }

    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Store(e) => store_status(e),
            ServerError::Resource(e) => resource_status(e),
            ServerError::Digest { status, .. } => *status,

            // 400 - Bad Request (client errors)
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidHeader(_) => StatusCode::BAD_REQUEST,

            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ServerError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            ServerError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServerError::PreconditionRequired(_) => StatusCode::PRECONDITION_REQUIRED,

            // 500 - Internal Server Error
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Failure of a request `Digest` check.
    ///
    /// An algorithm the server cannot check is the client's fault (400); a
    /// value mismatch means the content is corrupt (409).
    pub fn request_digest(source: DigestError) -> Self {
        let status = match source {
            DigestError::Unsupported(_) => StatusCode::BAD_REQUEST,
            DigestError::Bad(_) => StatusCode::CONFLICT,
        };
        ServerError::Digest { source, status }
    }

    /// Failure to honour `Want-Digest`
    pub fn want_digest(source: DigestError) -> Self {
        let status = match source {
            DigestError::Bad(_) => StatusCode::BAD_REQUEST,
            DigestError::Unsupported(_) => StatusCode::CONFLICT,
        };
        ServerError::Digest { source, status }
    }

    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ServerError::BadRequest(msg.into())
    }

    /// Create an invalid header error
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        ServerError::InvalidHeader(msg.into())
    }

    /// Create a method-not-allowed error
    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        ServerError::MethodNotAllowed(msg.into())
    }

    /// Create an unsupported media type error
    pub fn unsupported_media_type(msg: impl Into<String>) -> Self {
        ServerError::UnsupportedMediaType(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ServerError::Internal(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ServerError::Unauthorized(msg.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServerError::Forbidden(msg.into())
    }

    /// Create a not acceptable error
    pub fn not_acceptable(msg: impl Into<String>) -> Self {
        ServerError::NotAcceptable(msg.into())
    }
}

fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Deleted(_) => StatusCode::GONE,
        StoreError::NotContainer(_) => StatusCode::METHOD_NOT_ALLOWED,
        StoreError::InvalidUri(_) => StatusCode::BAD_REQUEST,
        StoreError::AclLoop { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Resource(e) => resource_status(e),
    }
}

fn store_error_type(e: &StoreError) -> &'static str {
    use ldp_vocab::errors;

    match e {
        StoreError::NotFound(_) => errors::NOT_FOUND,
        StoreError::Deleted(_) => errors::GONE,
        StoreError::NotContainer(_) => errors::METHOD_NOT_ALLOWED,
        StoreError::InvalidUri(_) => errors::BAD_REQUEST,
        StoreError::AclLoop { .. } => errors::ACL_LOOP,
        StoreError::Resource(e) => resource_error_type(e),
    }
}

fn resource_status(e: &ResourceError) -> StatusCode {
    match e {
        ResourceError::Parse(_)
        | ResourceError::PatchFailed(_)
        | ResourceError::UnsupportedContainerType(_) => StatusCode::BAD_REQUEST,
        ResourceError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ResourceError::NotRdf(_) => StatusCode::METHOD_NOT_ALLOWED,
        ResourceError::PatchIllegal(_)
        | ResourceError::ContainmentViolation(_)
        | ResourceError::DataConflict(_)
        | ResourceError::IncompatibleReplacement(_)
        | ResourceError::WrongVariant { .. } => StatusCode::CONFLICT,
        ResourceError::NotContained { .. }
        | ResourceError::NotMember { .. }
        | ResourceError::MissingOriginal(_)
        | ResourceError::Serialize(_)
        | ResourceError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn resource_error_type(e: &ResourceError) -> &'static str {
    use ldp_vocab::errors;

    match e {
        ResourceError::Parse(_) => errors::RDF_PARSE,
        ResourceError::PatchFailed(_) => errors::PATCH_FAILED,
        ResourceError::UnsupportedContainerType(_) | ResourceError::IncompatibleReplacement(_) => {
            errors::INTERACTION_MODEL
        }
        ResourceError::UnsupportedMediaType(_) => errors::UNSUPPORTED_MEDIA_TYPE,
        ResourceError::NotRdf(_) => errors::METHOD_NOT_ALLOWED,
        ResourceError::PatchIllegal(_) | ResourceError::ContainmentViolation(_) => {
            errors::CONTAINMENT_VIOLATION
        }
        ResourceError::DataConflict(_) | ResourceError::WrongVariant { .. } => errors::CONFLICT,
        ResourceError::NotContained { .. }
        | ResourceError::NotMember { .. }
        | ResourceError::MissingOriginal(_)
        | ResourceError::Serialize(_)
        | ResourceError::Engine(_) => errors::INTERNAL,
    }
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// HTTP status code
    pub status: u16,
    /// Error type (compact IRI, e.g., "err:ldp/Gone")
    #[serde(rename = "@type")]
    pub error_type: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
            error_type: error_type.to_string(),
        };

        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"{}","status":{},"@type":"{}"}}"#,
                self,
                status.as_u16(),
                error_type
            )
        });

        let mut response = (status, [(header::CONTENT_TYPE, "application/json")], json).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static(AUTH_CHALLENGE),
            );
        }
        response
    }
}

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
