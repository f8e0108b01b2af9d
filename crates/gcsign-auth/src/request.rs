//! Signing requests assembled from configured properties.

use std::sync::LazyLock;

use gcsign_core::{PropertySource, SignError, SignResult};
use regex::Regex;

use crate::canonical::{parse_header_list, parse_query_list};
use crate::expiry::ExpirySpec;
use crate::key::{ExponentPolicy, KeyMaterial, decode_private_key};
use crate::scheme::SigningScheme;
use crate::service_account::ServiceAccountKey;

/// A line break followed by indentation, as left behind by pasted PEM text.
static INDENTED_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*").expect("line break regex is valid"));

/// Where the signing key comes from.
#[derive(Clone)]
pub enum KeySource {
    /// A validated service-account key document.
    ServiceAccount(ServiceAccountKey),
    /// Raw PEM text with an optional password.
    Pem {
        /// The PEM text.
        pem: String,
        /// Password for encrypted keys.
        password: Option<String>,
    },
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
            Self::Pem { password, .. } => f
                .debug_struct("Pem")
                .field("pem", &"<redacted>")
                .field("password", &password.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

impl KeySource {
    /// Decode the key material.
    ///
    /// Keys from a service-account document use the exponent they carry; raw
    /// PEM keys in PKCS#8 form are given the conventional exponent 65537.
    pub fn decode(&self) -> SignResult<KeyMaterial> {
        match self {
            Self::ServiceAccount(key) => {
                decode_private_key(&key.private_key, None, ExponentPolicy::Embedded)
            }
            Self::Pem { pem, password } => {
                decode_private_key(pem, password.as_deref(), ExponentPolicy::AssumeDefault)
            }
        }
    }

    /// The service account email, when the key came from a service account.
    #[must_use]
    pub fn client_email(&self) -> Option<&str> {
        match self {
            Self::ServiceAccount(key) => Some(&key.client_email),
            Self::Pem { .. } => None,
        }
    }
}

/// Everything needed to sign one URL.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP verb the URL is valid for.
    pub verb: String,
    /// Resource path, e.g. `/bucket/object`.
    pub resource: String,
    /// Optional `Content-MD5` the client must send (V2).
    pub content_md5: Option<String>,
    /// Optional `Content-Type` the client must send (V2).
    pub content_type: Option<String>,
    /// Requested lifetime.
    pub expiry: ExpirySpec,
    /// Additional signed headers, in configured order (V4).
    pub headers: Vec<(String, String)>,
    /// Additional query parameters, in configured order (V4).
    pub query: Vec<(String, String)>,
    /// Payload line of the canonical request (V4).
    pub payload: Option<String>,
    /// The identity placed in the URL: `GoogleAccessId` for V2, the
    /// credential for V4.
    pub identity: String,
    /// The signing key.
    pub key_source: KeySource,
}

impl SigningRequest {
    /// Read a signing request for `scheme` from configured properties.
    ///
    /// Properties are read in a fixed order so that the first missing or
    /// invalid one is the one reported. The service-account document is
    /// validated here, before any key decoding.
    pub fn from_properties(scheme: SigningScheme, props: &dyn PropertySource) -> SignResult<Self> {
        let verb = props.get_required("verb")?;
        let content_md5 = props.get_optional("content-md5");
        let content_type = props.get_optional("content-type");
        let expiry = ExpirySpec::from_properties(props)?;
        let resource = resolve_resource(props)?;

        let (headers, query, payload) = match scheme {
            SigningScheme::V2 => (Vec::new(), Vec::new(), None),
            SigningScheme::V4 => (
                props
                    .get_optional("addl-headers")
                    .map(|list| parse_header_list(&list))
                    .unwrap_or_default(),
                props
                    .get_optional("addl-query")
                    .map(|list| parse_query_list(&list))
                    .unwrap_or_default(),
                props.get_optional("payload"),
            ),
        };

        let access_id = props.get_optional("access-id");
        let key_source = resolve_key_source(props)?;
        let identity = match (scheme, key_source.client_email(), access_id) {
            (SigningScheme::V2, _, Some(access_id)) => access_id,
            (_, Some(email), _) => email.to_owned(),
            (SigningScheme::V4, None, Some(access_id)) => access_id,
            (_, None, None) => {
                return Err(SignError::configuration(
                    "access-id resolves to an empty string",
                ));
            }
        };

        Ok(Self {
            verb,
            resource,
            content_md5,
            content_type,
            expiry,
            headers,
            query,
            payload,
            identity,
            key_source,
        })
    }
}

fn resolve_resource(props: &dyn PropertySource) -> SignResult<String> {
    if let Some(resource) = props.get_optional("resource") {
        return Ok(resource);
    }
    match (props.get_optional("bucket"), props.get_optional("object")) {
        (Some(bucket), Some(object)) => Ok(format!("/{bucket}/{object}")),
        _ => Err(SignError::configuration(
            "specify either resource or bucket + object",
        )),
    }
}

fn resolve_key_source(props: &dyn PropertySource) -> SignResult<KeySource> {
    if let Some(json) = props.get_optional("service-account-key") {
        return ServiceAccountKey::from_json(&json).map(KeySource::ServiceAccount);
    }
    if let Some(pem) = props.get_optional("private-key") {
        return Ok(KeySource::Pem {
            pem: normalize_pem(&pem),
            password: props.get_optional("private-key-password"),
        });
    }
    Err(SignError::configuration(
        "service-account-key resolves to an empty string",
    ))
}

/// Trim PEM text and strip indentation that follows each line break.
fn normalize_pem(text: &str) -> String {
    INDENTED_LINE_BREAK.replace_all(text.trim(), "\n").into_owned()
}
