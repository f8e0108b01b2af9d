//! End-to-end tests for gcsign.
//!
//! These tests drive [`UrlSigner`] exactly as a gateway would: configured
//! properties in, result or error variables out through an in-memory message
//! context. They need no network access.
//!
//! Run them with:
//! ```text
//! cargo test -p gcsign-integration
//! ```

use std::sync::Once;

use chrono::{DateTime, Utc};
use gcsign_auth::{Outcome, SigningScheme, UrlSigner};
use gcsign_core::{InMemoryContext, Properties};

static INIT: Once = Once::new();

/// Test key: 2048-bit RSA, PKCS#8, exponent 65537.
pub const PKCS8_KEY: &str = include_str!("../../../crates/gcsign-auth/testdata/pkcs8.pem");

/// The same key as PKCS#1 encrypted with AES-128-CBC.
pub const PKCS1_AES_KEY: &str = include_str!("../../../crates/gcsign-auth/testdata/pkcs1-aes.pem");

/// The same key as PBES2-encrypted PKCS#8.
pub const PKCS8_ENCRYPTED_KEY: &str =
    include_str!("../../../crates/gcsign-auth/testdata/pkcs8-enc.pem");

/// Password of the encrypted test keys.
pub const KEY_PASSWORD: &str = "Secret123";

/// Service account identity used throughout the tests.
pub const CLIENT_EMAIL: &str = "account-223456789@project-apigee.iam.gserviceaccount.com";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A fixed reference instant: 2026-01-15T10:20:30Z.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_768_472_430, 0).expect("fixed instant is valid")
}

/// Service-account JSON for [`CLIENT_EMAIL`] with the given private key.
#[must_use]
pub fn service_account_json(private_key: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "project-apigee",
        "private_key_id": "0123456789abcdef",
        "private_key": private_key,
        "client_email": CLIENT_EMAIL,
        "client_id": "1234567890",
    })
    .to_string()
}

/// Run a signing step at `now` and return its outcome and context.
pub fn run_at(
    scheme: SigningScheme,
    properties: Properties,
    mut ctx: InMemoryContext,
    now: DateTime<Utc>,
) -> (Outcome, InMemoryContext) {
    init_tracing();
    let outcome = UrlSigner::new(scheme, properties).execute_at(&mut ctx, now);
    (outcome, ctx)
}

/// Run a signing step at the current time with an empty context.
pub fn run(scheme: SigningScheme, properties: Properties) -> (Outcome, InMemoryContext) {
    init_tracing();
    let mut ctx = InMemoryContext::new();
    let outcome = UrlSigner::new(scheme, properties).execute(&mut ctx);
    (outcome, ctx)
}

mod test_keys;
mod test_v2;
mod test_v4;
