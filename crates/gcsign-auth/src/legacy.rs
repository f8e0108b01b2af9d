//! OpenSSL "traditional" encrypted PEM.
//!
//! Keys written by `openssl rsa -aes128` and friends carry their encryption
//! parameters in RFC 1421 headers:
//!
//! ```text
//! Proc-Type: 4,ENCRYPTED
//! DEK-Info: AES-128-CBC,77ABBF6F0A957803A1344B3628501C20
//! ```
//!
//! The cipher key is derived from the password with OpenSSL's
//! `EVP_BytesToKey` (MD5, one iteration, salt = first 8 bytes of the IV).

use cbc::cipher::{BlockCipher, BlockDecryptMut, KeyInit, KeyIvInit, block_padding::Pkcs7};
use md5::{Digest, Md5};

use crate::key::KeyDecodeError;

/// Ciphers accepted in a `DEK-Info` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LegacyCipher {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
    DesEde3Cbc,
    DesCbc,
}

impl LegacyCipher {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AES-128-CBC" => Some(Self::Aes128Cbc),
            "AES-192-CBC" => Some(Self::Aes192Cbc),
            "AES-256-CBC" => Some(Self::Aes256Cbc),
            "DES-EDE3-CBC" => Some(Self::DesEde3Cbc),
            "DES-CBC" => Some(Self::DesCbc),
            _ => None,
        }
    }

    fn key_len(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc | Self::DesEde3Cbc => 24,
            Self::Aes256Cbc => 32,
            Self::DesCbc => 8,
        }
    }

    fn iv_len(self) -> usize {
        match self {
            Self::Aes128Cbc | Self::Aes192Cbc | Self::Aes256Cbc => 16,
            Self::DesEde3Cbc | Self::DesCbc => 8,
        }
    }

    fn decrypt(self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, KeyDecodeError> {
        match self {
            Self::Aes128Cbc => cbc_decrypt::<aes::Aes128>(key, iv, ciphertext),
            Self::Aes192Cbc => cbc_decrypt::<aes::Aes192>(key, iv, ciphertext),
            Self::Aes256Cbc => cbc_decrypt::<aes::Aes256>(key, iv, ciphertext),
            Self::DesEde3Cbc => cbc_decrypt::<des::TdesEde3>(key, iv, ciphertext),
            Self::DesCbc => cbc_decrypt::<des::Des>(key, iv, ciphertext),
        }
    }
}

/// Whether the PEM headers mark the body as encrypted.
pub(crate) fn is_encrypted(pem: &pem::Pem) -> bool {
    pem.headers()
        .get("Proc-Type")
        .is_some_and(|v| v.split(',').any(|part| part.trim() == "ENCRYPTED"))
}

/// Decrypt the body of a traditional encrypted PEM object.
pub(crate) fn decrypt(pem: &pem::Pem, password: &[u8]) -> Result<Vec<u8>, KeyDecodeError> {
    if password.is_empty() {
        return Err(KeyDecodeError::MissingPassword);
    }

    let dek_info = pem
        .headers()
        .get("DEK-Info")
        .ok_or(KeyDecodeError::MissingDekInfo)?;
    let (name, iv_hex) = dek_info
        .split_once(',')
        .ok_or(KeyDecodeError::MissingDekInfo)?;

    let cipher = LegacyCipher::from_name(name.trim())
        .ok_or_else(|| KeyDecodeError::UnsupportedCipher(name.trim().to_owned()))?;
    let iv = hex::decode(iv_hex.trim()).map_err(|_| KeyDecodeError::InvalidIv)?;
    if iv.len() != cipher.iv_len() {
        return Err(KeyDecodeError::InvalidIv);
    }

    let key = derive_key(password, &iv[..8], cipher.key_len());
    cipher.decrypt(&key, &iv, pem.contents())
}

/// OpenSSL `EVP_BytesToKey` with MD5 and a single iteration.
fn derive_key(password: &[u8], salt: &[u8], len: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(len);
    let mut previous: Vec<u8> = Vec::new();
    while key.len() < len {
        let mut input = Vec::with_capacity(previous.len() + password.len() + salt.len());
        input.extend_from_slice(&previous);
        input.extend_from_slice(password);
        input.extend_from_slice(salt);

        let block = Md5::digest(&input);
        previous.clear();
        previous.extend_from_slice(block.as_ref());
        key.extend_from_slice(&previous);
    }
    key.truncate(len);
    key
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, KeyDecodeError>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| KeyDecodeError::InvalidIv)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| KeyDecodeError::DecryptionFailed)
}
