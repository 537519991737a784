//! Match key normalization.
//!
//! A registration and a live request meet on a `MatchKey`: the upper-cased
//! HTTP method plus the canonical serialization of the request URI. Keys are
//! computed the same way on both sides, so two differently-assembled but
//! equivalent URIs collapse to the same entry.

use url::Url;

use crate::error::Error;

/// Normalized `(method, uri)` lookup key.
///
/// URI canonicalization follows the WHATWG URL standard as implemented by the
/// `url` crate: scheme and host are lowercased, default ports are elided
/// (`http://x.com:80` and `http://x.com` are the same key), an empty path is
/// rendered as `/`, and percent-encoding is normalized. The query string is
/// preserved byte-for-byte, so parameter order and case are significant.
/// Fragments are never sent on the wire, so they are stripped before the key
/// is serialized: `http://x.com/page#top` and `http://x.com/page` are the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    method: String,
    uri: String,
}

impl MatchKey {
    /// Build a key from an already-normalized method and a parsed URL.
    pub(crate) fn new(method: String, url: &Url) -> Self {
        Self {
            method,
            uri: url.to_string(),
        }
    }

    /// Normalize a raw `(method, uri)` pair into a key.
    ///
    /// Fails if the method token is empty or the URI does not parse as an
    /// absolute URL.
    pub fn parse(method: &str, uri: &str) -> Result<Self, Error> {
        let method = normalize_method(method)?;
        let mut url = Url::parse(uri).map_err(|source| Error::InvalidUri {
            parameter: "uri",
            source,
        })?;
        url.set_fragment(None);
        Ok(Self::new(method, &url))
    }

    /// The upper-cased HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The canonical URI string.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Upper-case a method token, rejecting empty input.
pub(crate) fn normalize_method(method: &str) -> Result<String, Error> {
    let token = method.trim();
    if token.is_empty() {
        return Err(Error::invalid_argument(
            "method",
            "HTTP method cannot be empty",
        ));
    }
    Ok(token.to_uppercase())
}
