//! Key material decoding.
//!
//! Turns PEM text into an RSA key pair. Four encodings are recognized, keyed
//! by the type of the first PEM object in the text:
//!
//! | PEM label | Handling |
//! |-----------|----------|
//! | `PRIVATE KEY` | PKCS#8, decoded directly |
//! | `ENCRYPTED PRIVATE KEY` | PKCS#8 PBES2, decrypted with the password |
//! | `RSA PRIVATE KEY` + `Proc-Type: 4,ENCRYPTED` | PKCS#1, OpenSSL traditional encryption |
//! | `RSA PRIVATE KEY` | PKCS#1, decoded directly |
//!
//! For PKCS#8 keys the caller chooses how the public half is rebuilt: from the
//! exponent embedded in the key, or with the conventional exponent 65537
//! regardless of what the key carries. The two produce different public keys
//! for keys with a non-default exponent.

use gcsign_core::{SignError, SignResult};
use pkcs8::DecodePrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use thiserror::Error;
use tracing::debug;

use crate::legacy;

/// Message reported for every key material decoding failure.
pub const UNKNOWN_OBJECT_TYPE: &str = "unknown object type when decoding private key";

/// Public exponent assumed when the exponent policy does not trust the key.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65_537;

/// Why a PEM text could not be turned into a key pair.
#[derive(Debug, Error)]
pub enum KeyDecodeError {
    /// The text is not PEM.
    #[error("malformed PEM: {0}")]
    Pem(#[from] pem::PemError),

    /// The PEM object is not a private key this decoder understands.
    #[error("unsupported PEM object type '{0}'")]
    UnsupportedObjectType(String),

    /// PKCS#8 decoding or decryption failed.
    #[error("invalid PKCS#8 private key: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    /// PKCS#1 decoding failed.
    #[error("invalid PKCS#1 private key: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// An encrypted traditional PEM key was given without a password.
    #[error("the key is encrypted but no password was supplied")]
    MissingPassword,

    /// The `DEK-Info` header is absent or malformed.
    #[error("missing or malformed DEK-Info header")]
    MissingDekInfo,

    /// The `DEK-Info` header names a cipher that is not supported.
    #[error("unsupported PEM encryption cipher '{0}'")]
    UnsupportedCipher(String),

    /// The IV in the `DEK-Info` header does not fit the cipher.
    #[error("invalid initialization vector in DEK-Info header")]
    InvalidIv,

    /// Bad padding after decryption, usually a wrong password.
    #[error("bad decrypt, wrong password or corrupt key")]
    DecryptionFailed,

    /// The public key could not be rebuilt from the private key.
    #[error("invalid RSA public key: {0}")]
    PublicKey(#[from] rsa::Error),
}

/// The kind of PEM object a key was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemObjectKind {
    /// `PRIVATE KEY`
    Pkcs8,
    /// `ENCRYPTED PRIVATE KEY`
    EncryptedPkcs8,
    /// `RSA PRIVATE KEY` with traditional encryption headers.
    EncryptedRsa,
    /// `RSA PRIVATE KEY`
    Rsa,
}

/// How the public half of a PKCS#8 key is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExponentPolicy {
    /// Use the public exponent carried in the key.
    #[default]
    Embedded,
    /// Use [`DEFAULT_PUBLIC_EXPONENT`] regardless of the key's own exponent.
    AssumeDefault,
}

/// Where the public exponent of a [`KeyMaterial`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicExponentSource {
    /// Read from the key.
    Embedded,
    /// Assumed to be [`DEFAULT_PUBLIC_EXPONENT`].
    Assumed,
}

/// A decoded RSA key pair, owned by a single signing call.
pub struct KeyMaterial {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
    object_kind: PemObjectKind,
    exponent_source: PublicExponentSource,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("object_kind", &self.object_kind)
            .field("exponent_source", &self.exponent_source)
            .field("modulus_bits", &(self.public_key.size() * 8))
            .finish_non_exhaustive()
    }
}

impl KeyMaterial {
    /// The private key.
    #[must_use]
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// The reconstructed public key.
    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// The PEM object type the key came from.
    #[must_use]
    pub fn object_kind(&self) -> PemObjectKind {
        self.object_kind
    }

    /// Whether the public exponent was read from the key or assumed.
    #[must_use]
    pub fn exponent_source(&self) -> PublicExponentSource {
        self.exponent_source
    }

    /// Modulus size in bytes, which is also the signature length.
    #[must_use]
    pub fn modulus_len(&self) -> usize {
        self.public_key.size()
    }
}

/// Decode PEM text into RSA key material.
///
/// An empty or absent password is only acceptable for unencrypted keys.
///
/// # Errors
///
/// Every failure is reported as a format error with the message
/// [`UNKNOWN_OBJECT_TYPE`]; the specific [`KeyDecodeError`] is attached as its
/// source.
pub fn decode_private_key(
    pem_text: &str,
    password: Option<&str>,
    policy: ExponentPolicy,
) -> SignResult<KeyMaterial> {
    let password = password.unwrap_or_default().as_bytes();
    let material = decode(pem_text, password, policy)
        .map_err(|e| SignError::format(UNKNOWN_OBJECT_TYPE).with_source(e))?;

    debug!(
        object_kind = ?material.object_kind,
        exponent_source = ?material.exponent_source,
        modulus_bits = material.modulus_len() * 8,
        "decoded private key"
    );
    Ok(material)
}

fn decode(
    pem_text: &str,
    password: &[u8],
    policy: ExponentPolicy,
) -> Result<KeyMaterial, KeyDecodeError> {
    let parsed = pem::parse(pem_text)?;

    match parsed.tag() {
        "PRIVATE KEY" => {
            let key = RsaPrivateKey::from_pkcs8_der(parsed.contents())?;
            from_pkcs8(key, PemObjectKind::Pkcs8, policy)
        }
        "ENCRYPTED PRIVATE KEY" => {
            let key = RsaPrivateKey::from_pkcs8_encrypted_der(parsed.contents(), password)?;
            from_pkcs8(key, PemObjectKind::EncryptedPkcs8, policy)
        }
        "RSA PRIVATE KEY" if legacy::is_encrypted(&parsed) => {
            let der = legacy::decrypt(&parsed, password)?;
            let key = RsaPrivateKey::from_pkcs1_der(&der)?;
            Ok(with_embedded_exponent(key, PemObjectKind::EncryptedRsa))
        }
        "RSA PRIVATE KEY" => {
            let key = RsaPrivateKey::from_pkcs1_der(parsed.contents())?;
            Ok(with_embedded_exponent(key, PemObjectKind::Rsa))
        }
        other => Err(KeyDecodeError::UnsupportedObjectType(other.to_owned())),
    }
}

fn from_pkcs8(
    key: RsaPrivateKey,
    object_kind: PemObjectKind,
    policy: ExponentPolicy,
) -> Result<KeyMaterial, KeyDecodeError> {
    match policy {
        ExponentPolicy::Embedded => Ok(with_embedded_exponent(key, object_kind)),
        ExponentPolicy::AssumeDefault => {
            let public_key =
                RsaPublicKey::new(key.n().clone(), BigUint::from(DEFAULT_PUBLIC_EXPONENT))?;
            Ok(KeyMaterial {
                private_key: key,
                public_key,
                object_kind,
                exponent_source: PublicExponentSource::Assumed,
            })
        }
    }
}

fn with_embedded_exponent(key: RsaPrivateKey, object_kind: PemObjectKind) -> KeyMaterial {
    KeyMaterial {
        public_key: key.to_public_key(),
        private_key: key,
        object_kind,
        exponent_source: PublicExponentSource::Embedded,
    }
}
