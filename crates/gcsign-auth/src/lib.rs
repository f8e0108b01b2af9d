//! V2 and V4 signed URLs for Google Cloud Storage.
//!
//! Given an HTTP verb, a resource path, a lifetime, and RSA key material, this
//! crate builds the scheme-specific canonical string, signs it with
//! RSASSA-PKCS1-v1_5 over SHA-256, and assembles a URL that grants temporary
//! access to the object.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gcsign_auth::{Outcome, SigningScheme, UrlSigner};
//! use gcsign_core::{InMemoryContext, MessageContext, Properties};
//!
//! let key_json = std::fs::read_to_string("service-account.json").unwrap();
//! let signer = UrlSigner::new(
//!     SigningScheme::V4,
//!     Properties::new()
//!         .with("verb", "GET")
//!         .with("bucket", "{bucket}")
//!         .with("object", "report.pdf")
//!         .with("expires-in", "10m")
//!         .with("service-account-key", key_json),
//! );
//!
//! let mut ctx: InMemoryContext = [("bucket", "my-bucket")].into_iter().collect();
//! if signer.execute(&mut ctx) == Outcome::Success {
//!     println!("{}", ctx.get_variable("sign_signedurl").unwrap());
//! }
//! ```
//!
//! # Modules
//!
//! - [`callout`] - End-to-end signing step and its outcome
//! - [`canonical`] - V4 canonical request construction
//! - [`expiry`] - Duration parsing and expiry resolution
//! - [`key`] - PEM / PKCS#8 / PKCS#1 key material decoding
//! - [`presigned`] - URL templates and signature encoding
//! - [`request`] - Signing requests read from configured properties
//! - [`scheme`] - The V2/V4 scheme variant and canonical forms
//! - [`service_account`] - Service-account key validation
//! - [`signer`] - The RSA-SHA256 primitive
//! - [`sigv2`] - V2 string to sign
//! - [`sigv4`] - V4 credential scope and string to sign

pub mod callout;
pub mod canonical;
pub mod expiry;
pub mod key;
mod legacy;
pub mod presigned;
pub mod request;
pub mod scheme;
pub mod service_account;
pub mod signer;
pub mod sigv2;
pub mod sigv4;

pub use callout::{Outcome, UrlSigner, sign_url};
pub use key::{KeyDecodeError, KeyMaterial};
pub use presigned::SigningResult;
pub use request::{KeySource, SigningRequest};
pub use scheme::{CanonicalForm, SigningScheme};
pub use service_account::ServiceAccountKey;
