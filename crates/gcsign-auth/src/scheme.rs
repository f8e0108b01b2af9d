//! Signing schemes and their canonical forms.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use gcsign_core::SignError;

use crate::expiry::{ResolvedExpiry, V4_MAX_LIFETIME_SECS};
use crate::request::SigningRequest;
use crate::sigv4::V4CanonicalForm;
use crate::{sigv2, sigv4};

/// The query-string authentication scheme a URL is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    /// Legacy `GoogleAccessId`/`Expires`/`Signature` URLs.
    V2,
    /// `X-Goog-*` URLs with a credential scope.
    V4,
}

impl SigningScheme {
    /// Lower-case scheme name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V4 => "v4",
        }
    }

    /// Longest lifetime, in seconds, the scheme permits.
    #[must_use]
    pub fn max_lifetime(&self) -> Option<i64> {
        match self {
            Self::V2 => None,
            Self::V4 => Some(V4_MAX_LIFETIME_SECS),
        }
    }

    /// Build the canonical form of `request`.
    #[must_use]
    pub fn canonicalize(
        &self,
        request: &SigningRequest,
        expiry: &ResolvedExpiry,
        now: DateTime<Utc>,
    ) -> CanonicalForm {
        match self {
            Self::V2 => CanonicalForm::V2 {
                string_to_sign: sigv2::canonicalize(request, expiry.expiry_epoch),
            },
            Self::V4 => CanonicalForm::V4(sigv4::canonicalize(
                request,
                &request.identity,
                now,
                expiry.duration,
            )),
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningScheme {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v2" => Ok(Self::V2),
            "v4" => Ok(Self::V4),
            _ => Err(SignError::configuration(format!(
                "unknown signing scheme '{s}', expected v2 or v4"
            ))),
        }
    }
}

/// The scheme-specific string to sign, with its intermediate values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalForm {
    /// V2 has no structure beyond the string to sign.
    V2 {
        /// The V2 string to sign.
        string_to_sign: String,
    },
    /// V4 canonical request and string to sign.
    V4(V4CanonicalForm),
}

impl CanonicalForm {
    /// The scheme this form belongs to.
    #[must_use]
    pub fn scheme(&self) -> SigningScheme {
        match self {
            Self::V2 { .. } => SigningScheme::V2,
            Self::V4(_) => SigningScheme::V4,
        }
    }

    /// The exact string that gets signed.
    #[must_use]
    pub fn string_to_sign(&self) -> &str {
        match self {
            Self::V2 { string_to_sign } => string_to_sign,
            Self::V4(form) => &form.string_to_sign,
        }
    }
}
