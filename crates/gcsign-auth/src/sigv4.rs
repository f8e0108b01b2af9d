//! V4 signed URLs.
//!
//! The V4 string to sign is:
//!
//! ```text
//! GOOG4-RSA-SHA256\n
//! CURRENT_DATETIME\n
//! CREDENTIAL_SCOPE\n
//! HASHED_CANONICAL_REQUEST
//! ```
//!
//! where the credential scope is `DATE/us/storage/goog4_request` and the hashed
//! canonical request is the lowercase hex SHA-256 of the canonical request
//! built in [`crate::canonical`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::canonical::{
    build_canonical_headers, build_canonical_query_string, build_canonical_request,
    build_signed_headers_string,
};
use crate::presigned::STORAGE_HOST;
use crate::request::SigningRequest;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "GOOG4-RSA-SHA256";

/// Payload line used when no payload is configured.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Credential scope suffix following the date. The region is always `us`.
pub const SCOPE_SUFFIX: &str = "us/storage/goog4_request";

/// Query parameters the signer sets itself.
pub const RESERVED_QUERY_PARAMS: [&str; 5] = [
    "X-Goog-Algorithm",
    "X-Goog-Credential",
    "X-Goog-Date",
    "X-Goog-Expires",
    "X-Goog-SignedHeaders",
];

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Every intermediate value of a V4 canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V4CanonicalForm {
    /// `yyyyMMddTHHmmssZ` timestamp of the reference instant.
    pub timestamp: String,
    /// `DATE/us/storage/goog4_request`.
    pub credential_scope: String,
    /// `name:value` lines, sorted by name.
    pub canonical_headers: String,
    /// Sorted header names joined by `;`.
    pub signed_headers: String,
    /// Sorted, value-encoded query parameters.
    pub canonical_query_string: String,
    /// The full canonical request.
    pub canonical_request: String,
    /// Lowercase hex SHA-256 of the canonical request.
    pub hashed_canonical_request: String,
    /// The string to sign.
    pub string_to_sign: String,
}

/// Format `now` as a V4 timestamp.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use gcsign_auth::sigv4::format_timestamp;
///
/// let now = DateTime::from_timestamp(1_768_472_430, 0).unwrap();
/// assert_eq!(format_timestamp(now), "20260115T102030Z");
/// ```
#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// The credential scope for a signature made at `now`.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use gcsign_auth::sigv4::credential_scope;
///
/// let now = DateTime::from_timestamp(1_768_472_430, 0).unwrap();
/// assert_eq!(credential_scope(now), "20260115/us/storage/goog4_request");
/// ```
#[must_use]
pub fn credential_scope(now: DateTime<Utc>) -> String {
    format!("{}/{SCOPE_SUFFIX}", now.format(DATE_FORMAT))
}

/// Build the string to sign from a timestamp, scope, and hashed canonical request.
#[must_use]
pub fn build_string_to_sign(timestamp: &str, scope: &str, hashed_canonical_request: &str) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{scope}\n{hashed_canonical_request}")
}

/// Canonicalize `request` for signing by `identity` at `now`, valid for
/// `duration` seconds.
#[must_use]
pub fn canonicalize(
    request: &SigningRequest,
    identity: &str,
    now: DateTime<Utc>,
    duration: i64,
) -> V4CanonicalForm {
    let timestamp = format_timestamp(now);
    let scope = credential_scope(now);

    let headers = collect_headers(&request.headers);
    let canonical_headers = build_canonical_headers(&headers);
    let signed_headers = build_signed_headers_string(&headers);

    let mut params = BTreeMap::from([
        ("X-Goog-Algorithm".to_owned(), ALGORITHM.to_owned()),
        ("X-Goog-Credential".to_owned(), format!("{identity}/{scope}")),
        ("X-Goog-Date".to_owned(), timestamp.clone()),
        ("X-Goog-Expires".to_owned(), duration.to_string()),
        ("X-Goog-SignedHeaders".to_owned(), signed_headers.clone()),
    ]);
    for (key, value) in &request.query {
        if RESERVED_QUERY_PARAMS.contains(&key.as_str()) {
            warn!(param = %key, "ignoring additional query parameter that overrides a signing parameter");
            continue;
        }
        if params.insert(key.clone(), value.clone()).is_some() {
            warn!(param = %key, "duplicate additional query parameter, keeping the last value");
        }
    }
    let canonical_query_string = build_canonical_query_string(&params);

    let canonical_request = build_canonical_request(
        &request.verb,
        &request.resource,
        &canonical_query_string,
        &canonical_headers,
        &signed_headers,
        request.payload.as_deref().unwrap_or(UNSIGNED_PAYLOAD),
    );
    let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let string_to_sign = build_string_to_sign(&timestamp, &scope, &hashed_canonical_request);

    V4CanonicalForm {
        timestamp,
        credential_scope: scope,
        canonical_headers,
        signed_headers,
        canonical_query_string,
        canonical_request,
        hashed_canonical_request,
        string_to_sign,
    }
}

/// The `host` header plus the additional headers; a repeated name keeps its
/// last value.
fn collect_headers(additional: &[(String, String)]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::from([("host".to_owned(), STORAGE_HOST.to_owned())]);
    for (name, value) in additional {
        if let Some(previous) = headers.insert(name.clone(), value.clone()) {
            warn!(header = %name, %previous, "duplicate additional header, keeping the last value");
        }
    }
    headers
}
