//! RSA-SHA256 signatures.
//!
//! PKCS#1 v1.5 signing is deterministic: the same message and key always
//! produce the same signature bytes.

use gcsign_core::{SignError, SignResult};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

/// Sign the UTF-8 bytes of `message` with RSASSA-PKCS1-v1_5 over SHA-256.
///
/// The signature is as long as the key modulus in bytes.
pub fn sign_rsa_sha256(key: &RsaPrivateKey, message: &str) -> SignResult<Vec<u8>> {
    let digest = Sha256::digest(message.as_bytes());
    key.sign(Pkcs1v15Sign::new::<rsa::sha2::Sha256>(), digest.as_ref())
        .map_err(|e| SignError::crypto("failed to compute the RSA-SHA256 signature").with_source(e))
}

/// Check an RSASSA-PKCS1-v1_5 SHA-256 signature over `message`.
#[must_use]
pub fn verify_rsa_sha256(key: &RsaPublicKey, message: &str, signature: &[u8]) -> bool {
    let digest = Sha256::digest(message.as_bytes());
    key.verify(
        Pkcs1v15Sign::new::<rsa::sha2::Sha256>(),
        digest.as_ref(),
        signature,
    )
    .is_ok()
}
