//! V2 (legacy) signed URLs.
//!
//! The V2 string to sign is:
//!
//! ```text
//! HTTP_Verb\n
//! Content_MD5\n
//! Content_Type\n
//! Expiration\n
//! Canonicalized_Extension_Headers Canonicalized_Resource
//! ```
//!
//! Extension headers are not supported, so that part is always empty. Missing
//! optional fields still contribute their line, so the newline count is fixed.

use crate::request::SigningRequest;

/// Build the V2 string to sign from its parts.
///
/// # Examples
///
/// ```
/// use gcsign_auth::sigv2::build_string_to_sign;
///
/// assert_eq!(
///     build_string_to_sign("GET", "", "", 1_700_000_000, "/foo/bar/bam"),
///     "GET\n\n\n1700000000\n/foo/bar/bam"
/// );
/// ```
#[must_use]
pub fn build_string_to_sign(
    verb: &str,
    content_md5: &str,
    content_type: &str,
    expiry_epoch: i64,
    resource: &str,
) -> String {
    format!("{verb}\n{content_md5}\n{content_type}\n{expiry_epoch}\n{resource}")
}

/// Build the string to sign for `request` expiring at `expiry_epoch`.
#[must_use]
pub fn canonicalize(request: &SigningRequest, expiry_epoch: i64) -> String {
    build_string_to_sign(
        &request.verb,
        request.content_md5.as_deref().unwrap_or_default(),
        request.content_type.as_deref().unwrap_or_default(),
        expiry_epoch,
        &request.resource,
    )
}
