//! Canonical serialization of a URI and its query parameters.
//!
//! The canonical string is the exact payload that gets signed, so it must be reproduced
//! byte-for-byte by the validating side. The rules are:
//! * `scheme://authority` followed by the path. Scheme and authority are omitted for origin-form
//!   URIs (`/path?query`). Parsing a string with [`str::parse`] keeps this prefix exactly as
//!   written (scheme case, a missing `/` path). [`CanonicalUri::from_uri`] sees the normalized form
//!   `http::Uri` exposes instead: a lowercase `http`/`https` scheme and `/` for an empty path.
//! * Fragments are not part of the canonical form.
//! * Query parameters are kept as an ordered multi-map. Keys appear in the order they were first
//!   seen; all values for a key are emitted together, in the order they were added.
//! * Parameters parsed from an existing URI keep their raw, already-encoded bytes. Parameters
//!   appended through [`CanonicalUri::append`] are percent-encoded with [`encode_query_element`].
//! * A parameter without `=` is emitted as a bare key. Empty `&&` segments are dropped.
//!
//! **Stability of the helper functions in this module is not guaranteed.** They are exposed with
//! the `unstable` feature for testing purposes only.

use {
    crate::SignerError,
    http::uri::Uri,
    qualifier_attr::qualifiers,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Uppercase hex digits.
const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// A URI split into its signed prefix and an ordered multi-map of query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CanonicalUri {
    /// `scheme://authority/path`, or just the path for origin-form URIs.
    prefix: String,

    /// Raw query parameters, grouped by key in order of first appearance. `None` marks a key that
    /// appeared without an `=`.
    parameters: Vec<(String, Vec<Option<String>>)>,
}

impl CanonicalUri {
    /// Split a parsed [`Uri`] into its canonical parts.
    pub fn from_uri(uri: &Uri) -> Self {
        let mut prefix = String::new();
        if let Some(scheme) = uri.scheme_str() {
            prefix.push_str(scheme);
            prefix.push_str("://");
        }
        if let Some(authority) = uri.authority() {
            prefix.push_str(authority.as_str());
        }
        prefix.push_str(uri.path());

        Self::from_parts(prefix, uri.query())
    }

    fn from_parts(prefix: String, query: Option<&str>) -> Self {
        let mut result = Self {
            prefix,
            parameters: Vec::new(),
        };

        for segment in query.unwrap_or("").split('&') {
            if segment.is_empty() {
                continue;
            }

            match segment.split_once('=') {
                Some((key, value)) => result.push_raw(key, Some(value.to_string())),
                None => result.push_raw(segment, None),
            }
        }

        result
    }

    /// The `scheme://authority/path` part of the URI.
    #[inline(always)]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of distinct query parameter keys.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Indicates whether the URI has no query parameters.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Indicates whether a parameter with the given raw key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.parameters.iter().any(|(k, _)| k == key)
    }

    /// Retrieve the first raw value for `key`.
    ///
    /// This returns `None` if the key is absent or if its first occurrence had no `=`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.parameters.iter().find(|(k, _)| k == key).and_then(|(_, values)| values.first()?.as_deref())
    }

    /// Append a parameter, percent-encoding both the key and the value.
    pub fn append(&mut self, key: &str, value: &str) {
        self.push_raw(&encode_query_element(key), Some(encode_query_element(value)));
    }

    /// Remove every value for `key`. Returns `true` if anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let len = self.parameters.len();
        self.parameters.retain(|(k, _)| k != key);
        self.parameters.len() != len
    }

    /// Return a copy of this URI with every value for `key` removed.
    pub fn without(&self, key: &str) -> Self {
        let mut result = self.clone();
        result.remove(key);
        result
    }

    /// Render the canonical query string (without the leading `?`).
    pub fn query_string(&self) -> String {
        let mut results = Vec::new();

        for (key, values) in self.parameters.iter() {
            for value in values.iter() {
                match value {
                    Some(value) => results.push(format!("{}={}", key, value)),
                    None => results.push(key.clone()),
                }
            }
        }

        results.join("&")
    }

    /// Convert back into a [`Uri`].
    pub fn to_uri(&self) -> Result<Uri, SignerError> {
        Ok(Uri::from_str(&self.to_string())?)
    }

    fn push_raw(&mut self, key: &str, value: Option<String>) {
        match self.parameters.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.parameters.push((key.to_string(), vec![value])),
        }
    }
}

impl Display for CanonicalUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.prefix)?;
        if !self.parameters.is_empty() {
            f.write_str("?")?;
            f.write_str(&self.query_string())?;
        }
        Ok(())
    }
}

impl From<&Uri> for CanonicalUri {
    fn from(uri: &Uri) -> Self {
        Self::from_uri(uri)
    }
}

impl FromStr for CanonicalUri {
    type Err = SignerError;

    /// Parse a URI string, keeping the text before `?` verbatim. The string must still be a valid
    /// [`Uri`].
    fn from_str(s: &str) -> Result<Self, SignerError> {
        Uri::from_str(s)?;

        let without_fragment = s.split_once('#').map_or(s, |(head, _)| head);
        let (prefix, query) = match without_fragment.split_once('?') {
            Some((prefix, query)) => (prefix, Some(query)),
            None => (without_fragment, None),
        };

        Ok(Self::from_parts(prefix.to_string(), query))
    }
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Percent-encode a query parameter key or value. Unreserved characters are left alone; every other
/// byte of the UTF-8 encoding becomes an uppercase `%XX` escape.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn encode_query_element(element: &str) -> String {
    let mut result = String::with_capacity(element.len());

    for c in element.bytes() {
        if is_rfc3986_unreserved(c) {
            result.push(c as char);
        } else {
            let hex = u8_to_upper_hex(c);
            result.push('%');
            result.push(hex[0] as char);
            result.push(hex[1] as char);
        }
    }

    result
}

/// Decode a percent-encoded query parameter key or value.
///
/// Returns `None` if an escape is incomplete or not hex, or if the decoded bytes are not UTF-8.
/// `+` is left alone.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn decode_query_element(element: &str) -> Option<String> {
    let bytes = element.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex_digits = bytes.get(i + 1..i + 3)?;
            let value = hex::decode(hex_digits).ok()?;
            result.extend(value);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(result).ok()
}

/// Convert a byte into two uppercase hex digits.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]]
}
