//! Non-RDF sources

use bytes::Bytes;
use md5::{Digest, Md5};

/// Opaque content with its media type
#[derive(Debug, Clone)]
pub struct NonRdfSource {
    pub(crate) content: Bytes,
    pub(crate) media_type: String,
}

impl NonRdfSource {
    pub fn new(content: Bytes, media_type: impl Into<String>) -> Self {
        Self {
            content,
            media_type: media_type.into(),
        }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Hex MD5 of the raw bytes, used for the strong ETag
    pub fn content_hash(&self) -> String {
        hex::encode(Md5::digest(&self.content))
    }
}
