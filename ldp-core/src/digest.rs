//! Fixity: `Digest` and `Want-Digest` handling (RFC 3230)
//!
//! Digest values are the base64 encoding of the raw hash bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};

use crate::error::DigestError;

/// Hash algorithms accepted in `Digest` and `Want-Digest`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Look up an algorithm token, case-insensitively.
    ///
    /// `sha` and `sha1` both name SHA-1.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "md5" => Some(DigestAlgorithm::Md5),
            "sha" | "sha1" => Some(DigestAlgorithm::Sha1),
            "sha-256" => Some(DigestAlgorithm::Sha256),
            "sha-512" => Some(DigestAlgorithm::Sha512),
            _ => None,
        }
    }

    /// Base64 digest of `data`
    pub fn compute(&self, data: &[u8]) -> String {
        match self {
            DigestAlgorithm::Md5 => STANDARD.encode(Md5::digest(data)),
            DigestAlgorithm::Sha1 => STANDARD.encode(Sha1::digest(data)),
            DigestAlgorithm::Sha256 => STANDARD.encode(Sha256::digest(data)),
            DigestAlgorithm::Sha512 => STANDARD.encode(Sha512::digest(data)),
        }
    }
}

/// Algorithm selected from a `Want-Digest` header.
///
/// Keeps the token as the client spelled it (lowercased) so the response
/// `Digest` header echoes the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WantDigest {
    pub name: String,
    pub algorithm: DigestAlgorithm,
}

impl WantDigest {
    /// `Digest` response header value for `body`
    pub fn header_value(&self, body: &[u8]) -> String {
        format!("{}={}", self.name, self.algorithm.compute(body))
    }
}

/// Parse a `Digest` header into `(algorithm, name, value)` entries.
fn parse_digest(header: &str) -> Result<Vec<(DigestAlgorithm, String, String)>, DigestError> {
    let mut digests = Vec::new();
    for item in header.split(',') {
        let (name, value) = item
            .split_once('=')
            .ok_or_else(|| DigestError::Bad(format!("bad digest header item '{}'", item.trim())))?;
        let name = name.trim().to_ascii_lowercase();
        let algorithm = DigestAlgorithm::from_name(&name)
            .ok_or_else(|| DigestError::Unsupported(format!("unsupported digest type '{name}'")))?;
        digests.push((algorithm, name, value.trim().to_string()));
    }
    Ok(digests)
}

/// Check every digest named in a `Digest` header against `body`.
pub fn check_digest(header: &str, body: &[u8]) -> Result<(), DigestError> {
    for (algorithm, name, expected) in parse_digest(header)? {
        if algorithm.compute(body) != expected {
            return Err(DigestError::Bad(format!("{name} digest does not match content")));
        }
    }
    Ok(())
}

/// Pick the digest algorithm to honour from a `Want-Digest` header.
///
/// Entries have the form `alg` or `alg;q=value` (default weight 1.0). Among
/// all entries at the highest positive weight, the first one the server
/// supports wins, in header order.
pub fn resolve_want_digest(header: &str) -> Result<WantDigest, DigestError> {
    let mut weighted: Vec<(String, f64)> = Vec::new();
    for item in header.split(',') {
        let item = item.trim_start();
        let (name, q) = match item.split_once(';') {
            Some((name, param)) => (name, parse_weight(param, item)?),
            None => (item, 1.0),
        };
        let name = name.trim_end();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DigestError::Bad(format!("bad Want-Digest item '{item}'")));
        }
        if q > 0.0 {
            weighted.push((name.to_ascii_lowercase(), q));
        }
    }

    let max_q = weighted.iter().map(|(_, q)| *q).fold(0.0_f64, f64::max);
    if weighted.is_empty() {
        return Err(DigestError::Bad(
            "no acceptable digest with weight above zero".to_string(),
        ));
    }
    weighted
        .into_iter()
        .filter(|(_, q)| *q == max_q)
        .find_map(|(name, _)| {
            DigestAlgorithm::from_name(&name).map(|algorithm| WantDigest { name, algorithm })
        })
        .ok_or_else(|| DigestError::Unsupported(format!("no supported digest in '{header}'")))
}

fn parse_weight(param: &str, item: &str) -> Result<f64, DigestError> {
    let bad = || DigestError::Bad(format!("bad Want-Digest weight in '{item}'"));
    let value = param.trim().strip_prefix("q=").ok_or_else(bad)?;
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(bad());
    }
    let q: f64 = value.parse().map_err(|_| bad())?;
    if !(0.0..=1.0).contains(&q) {
        return Err(bad());
    }
    Ok(q)
}
