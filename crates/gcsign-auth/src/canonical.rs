//! Canonical request construction for V4 signed URLs.
//!
//! The canonical request has the form:
//!
//! ```text
//! HTTP_VERB\n
//! PATH_TO_RESOURCE\n
//! CANONICAL_QUERY_STRING\n
//! CANONICAL_HEADERS\n\n
//! SIGNED_HEADERS\n
//! PAYLOAD
//! ```
//!
//! Headers and query parameters are kept in [`BTreeMap`]s so that rendering
//! always happens in lexicographic key order, whatever order the caller
//! supplied them in.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in query parameter values.
///
/// Alphanumerics and `-`, `_`, `.`, `*` pass through; everything else,
/// including space, is percent-encoded (space becomes `%20`, never `+`).
const QUERY_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

/// Build the full canonical request string from its components.
///
/// # Examples
///
/// ```
/// use gcsign_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/bucket/object.txt",
///     "X-Goog-Algorithm=GOOG4-RSA-SHA256",
///     "host:storage.googleapis.com",
///     "host",
///     "UNSIGNED-PAYLOAD",
/// );
/// assert_eq!(
///     canonical,
///     "GET\n/bucket/object.txt\nX-Goog-Algorithm=GOOG4-RSA-SHA256\nhost:storage.googleapis.com\n\nhost\nUNSIGNED-PAYLOAD"
/// );
/// ```
#[must_use]
pub fn build_canonical_request(
    verb: &str,
    path: &str,
    canonical_query: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload: &str,
) -> String {
    format!("{verb}\n{path}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload}")
}

/// Render headers as `name:value` lines joined by newlines.
///
/// The result does not include a trailing newline.
#[must_use]
pub fn build_canonical_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The header names joined by `;`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use gcsign_auth::canonical::build_signed_headers_string;
///
/// let headers = BTreeMap::from([
///     ("x-goog-meta-a".to_owned(), "1".to_owned()),
///     ("host".to_owned(), "storage.googleapis.com".to_owned()),
/// ]);
/// assert_eq!(build_signed_headers_string(&headers), "host;x-goog-meta-a");
/// ```
#[must_use]
pub fn build_signed_headers_string(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// Render query parameters as `key=value` pairs joined by `&`.
///
/// Keys are emitted verbatim; values are percent-encoded.
#[must_use]
pub fn build_canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", encode_query_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode a query parameter value.
///
/// # Examples
///
/// ```
/// use gcsign_auth::canonical::encode_query_value;
///
/// assert_eq!(encode_query_value("a b/c@d"), "a%20b%2Fc%40d");
/// assert_eq!(encode_query_value("x-y_z.w*"), "x-y_z.w*");
/// ```
#[must_use]
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE_ENCODE_SET).to_string()
}

/// Parse a `|`-delimited list of `name:value` header entries.
///
/// Each entry is split on its first colon. Names are lowercased, names and
/// values are trimmed, and entries left with an empty name or value are
/// dropped. Input order is preserved, duplicates included.
#[must_use]
pub fn parse_header_list(list: &str) -> Vec<(String, String)> {
    list.split('|')
        .filter_map(|entry| entry.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_owned()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .collect()
}

/// Parse an `&`-delimited list of `key=value` query entries.
///
/// Each entry is split on its first `=`; entries with an empty key or value
/// are dropped. Input order is preserved, duplicates included.
#[must_use]
pub fn parse_query_list(list: &str) -> Vec<(String, String)> {
    list.split('&')
        .filter_map(|entry| entry.split_once('='))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}
