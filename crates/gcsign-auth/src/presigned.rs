//! Signed URL assembly.
//!
//! The final URL is produced by filling a per-scheme template with the
//! result's own variables:
//!
//! - V2: `https://storage.googleapis.com{resource}?GoogleAccessId={accessid}&Expires={expiration}&Signature={signature}`
//! - V4: `https://storage.googleapis.com{resource}?{canonical_query_string}&X-Goog-Signature={signature}`
//!
//! V2 signatures are base64, then form-encoded for the query string. V4
//! signatures are lowercase hex and need no further escaping.

use std::collections::BTreeMap;

use base64::Engine;
use gcsign_core::template::resolve_template;

use crate::expiry::ResolvedExpiry;
use crate::request::SigningRequest;
use crate::scheme::{CanonicalForm, SigningScheme};

/// The Cloud Storage endpoint every URL points at.
pub const STORAGE_HOST: &str = "storage.googleapis.com";

/// V2 URL template.
pub const V2_URL_TEMPLATE: &str = "https://storage.googleapis.com{resource}?GoogleAccessId={accessid}&Expires={expiration}&Signature={signature}";

/// V4 URL template.
pub const V4_URL_TEMPLATE: &str = "https://storage.googleapis.com{resource}?{canonical_query_string}&X-Goog-Signature={signature}";

/// A completed signing operation.
#[derive(Debug, Clone)]
pub struct SigningResult {
    /// HTTP verb the URL is valid for.
    pub verb: String,
    /// Resource path.
    pub resource: String,
    /// Identity embedded in the URL.
    pub access_id: String,
    /// Resolved lifetime.
    pub expiry: ResolvedExpiry,
    /// The canonical form that was signed.
    pub canonical: CanonicalForm,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
    /// The signature as embedded in the URL.
    pub encoded_signature: String,
    /// Base64 signature before URL encoding (V2 only).
    pub signature_unencoded: Option<String>,
    /// The assembled signed URL.
    pub signed_url: String,
}

impl SigningResult {
    /// Assemble the result for `request` from its canonical form and signature.
    #[must_use]
    pub fn assemble(
        request: &SigningRequest,
        expiry: ResolvedExpiry,
        canonical: CanonicalForm,
        signature: Vec<u8>,
    ) -> Self {
        let (encoded_signature, signature_unencoded) = match canonical.scheme() {
            SigningScheme::V2 => {
                let (encoded, unencoded) = encode_v2_signature(&signature);
                (encoded, Some(unencoded))
            }
            SigningScheme::V4 => (hex::encode(&signature), None),
        };

        let mut result = Self {
            verb: request.verb.clone(),
            resource: request.resource.clone(),
            access_id: request.identity.clone(),
            expiry,
            canonical,
            signature,
            encoded_signature,
            signature_unencoded,
            signed_url: String::new(),
        };

        let template = match result.canonical.scheme() {
            SigningScheme::V2 => V2_URL_TEMPLATE,
            SigningScheme::V4 => V4_URL_TEMPLATE,
        };
        let values: BTreeMap<&str, String> = result.variables().into_iter().collect();
        result.signed_url = resolve_template(template, |name| values.get(name).cloned());
        result
    }

    /// The scheme the URL was signed with.
    #[must_use]
    pub fn scheme(&self) -> SigningScheme {
        self.canonical.scheme()
    }

    /// Result variables as `(suffix, value)` pairs, without any prefix.
    #[must_use]
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            ("verb", self.verb.clone()),
            ("resource", self.resource.clone()),
            ("duration", self.expiry.duration.to_string()),
            ("expiration", self.expiry.expiry_epoch.to_string()),
            ("expiration_ISO", self.expiry.expiration_iso()),
            ("accessid", self.access_id.clone()),
            ("signature", self.encoded_signature.clone()),
        ];

        match &self.canonical {
            CanonicalForm::V2 { string_to_sign } => {
                vars.push(("signing_string", string_to_sign.clone()));
                if let Some(unencoded) = &self.signature_unencoded {
                    vars.push(("signature_unencoded", unencoded.clone()));
                }
            }
            CanonicalForm::V4(form) => {
                vars.push(("canonical_request", form.canonical_request.clone()));
                vars.push(("canonical_query_string", form.canonical_query_string.clone()));
                vars.push(("string_to_sign", form.string_to_sign.clone()));
            }
        }

        if !self.signed_url.is_empty() {
            vars.push(("signedurl", self.signed_url.clone()));
        }
        vars
    }
}

/// Encode a V2 signature, returning `(url_encoded, base64)`.
///
/// # Examples
///
/// ```
/// use gcsign_auth::presigned::encode_v2_signature;
///
/// let (encoded, plain) = encode_v2_signature(&[0xfb, 0xff, 0xfe]);
/// assert_eq!(plain, "+//+");
/// assert_eq!(encoded, "%2B%2F%2F%2B");
/// ```
#[must_use]
pub fn encode_v2_signature(signature: &[u8]) -> (String, String) {
    let plain = base64::engine::general_purpose::STANDARD.encode(signature);
    let encoded = form_urlencoded::byte_serialize(plain.as_bytes()).collect();
    (encoded, plain)
}
