//! Error type compact IRIs
//!
//! These compact IRI strings identify error types in API responses.
//! They follow the pattern: `err:category/ErrorName`
//!
//! # Example Usage
//!
//! ```json
//! {
//!   "error": "Precondition failed: ETag mismatch",
//!   "status": 412,
//!   "@type": "err:ldp/PreconditionFailed"
//! }
//! ```

/// Error namespace prefix
pub const ERR_PREFIX: &str = "err:";

// =============================================================================
// Resource lookup (ldp)
// =============================================================================

/// URI never existed
pub const NOT_FOUND: &str = "err:ldp/NotFound";

/// URI existed and was deleted
pub const GONE: &str = "err:ldp/Gone";

/// Method not allowed for this resource or disabled by configuration
pub const METHOD_NOT_ALLOWED: &str = "err:ldp/MethodNotAllowed";

/// Interaction model request cannot be honoured
pub const INTERACTION_MODEL: &str = "err:ldp/InteractionModel";

/// Request conflicts with current resource state
pub const CONFLICT: &str = "err:ldp/Conflict";

/// Client tried to assert server-managed containment
pub const CONTAINMENT_VIOLATION: &str = "err:ldp/ContainmentViolation";

/// If-Match did not match the current ETag
pub const PRECONDITION_FAILED: &str = "err:ldp/PreconditionFailed";

/// If-Match required but absent
pub const PRECONDITION_REQUIRED: &str = "err:ldp/PreconditionRequired";

// =============================================================================
// Content (content)
// =============================================================================

/// RDF body could not be parsed
pub const RDF_PARSE: &str = "err:content/RdfParse";

/// Unsupported request media type
pub const UNSUPPORTED_MEDIA_TYPE: &str = "err:content/UnsupportedMediaType";

/// Content negotiation failure
pub const NOT_ACCEPTABLE: &str = "err:content/NotAcceptable";

/// SPARQL Update could not be applied
pub const PATCH_FAILED: &str = "err:content/PatchFailed";

// =============================================================================
// Fixity (fixity)
// =============================================================================

/// Digest algorithm not supported
pub const UNSUPPORTED_DIGEST: &str = "err:fixity/UnsupportedDigest";

/// Digest malformed or content does not match
pub const BAD_DIGEST: &str = "err:fixity/BadDigest";

// =============================================================================
// Request (request)
// =============================================================================

/// Generic bad request
pub const BAD_REQUEST: &str = "err:request/BadRequest";

/// Invalid header value
pub const INVALID_HEADER: &str = "err:request/InvalidHeader";

// =============================================================================
// Auth (auth)
// =============================================================================

/// Authentication required or credentials invalid
pub const UNAUTHORIZED: &str = "err:auth/Unauthorized";

/// Authenticated agent lacks the required access mode
pub const FORBIDDEN: &str = "err:auth/Forbidden";

// =============================================================================
// System (system)
// =============================================================================

/// ACL inheritance exceeded the configured depth
pub const ACL_LOOP: &str = "err:system/AclLoop";

/// Internal server error
pub const INTERNAL: &str = "err:system/Internal";
