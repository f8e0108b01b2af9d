//! End-to-end signing driven by configured properties.
//!
//! [`UrlSigner`] is what a gateway step invokes: it reads its properties
//! against the message context, signs, and publishes either the result
//! variables or the error variables back into the context. It never panics or
//! returns an error past its boundary; the [`Outcome`] tells the caller
//! whether to continue.

use std::fmt;

use chrono::{DateTime, Utc};
use gcsign_core::{
    MessageContext, Properties, PropertySource, SignError, SignResult, SignerConfig,
};
use tracing::{debug, info, warn};

use crate::presigned::SigningResult;
use crate::request::SigningRequest;
use crate::scheme::SigningScheme;
use crate::signer::sign_rsa_sha256;

/// Terminal state of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The signed URL was published.
    Success,
    /// The invocation failed; error variables were published.
    Abort,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "SUCCESS",
            Self::Abort => "ABORT",
        })
    }
}

/// Sign one URL for `scheme` at the reference instant `now`.
///
/// Steps run in order and the first failure ends the pipeline: read the
/// request, resolve the expiry, canonicalize, decode the key, sign, assemble.
pub fn sign_url(
    scheme: SigningScheme,
    props: &dyn PropertySource,
    now: DateTime<Utc>,
) -> SignResult<SigningResult> {
    let request = SigningRequest::from_properties(scheme, props)?;
    let expiry = request.expiry.resolve(now, scheme.max_lifetime())?;
    let canonical = scheme.canonicalize(&request, &expiry, now);
    debug!(
        %scheme,
        string_to_sign = canonical.string_to_sign(),
        "built canonical form"
    );

    let key = request.key_source.decode()?;
    let signature = sign_rsa_sha256(key.private_key(), canonical.string_to_sign())?;

    Ok(SigningResult::assemble(&request, expiry, canonical, signature))
}

/// A configured signing step.
///
/// # Examples
///
/// ```
/// use gcsign_auth::{Outcome, SigningScheme, UrlSigner};
/// use gcsign_core::{InMemoryContext, MessageContext, Properties};
///
/// let signer = UrlSigner::new(
///     SigningScheme::V4,
///     Properties::new().with("verb", "GET").with("resource", "/b/o"),
/// );
/// let mut ctx = InMemoryContext::new();
/// assert_eq!(signer.execute(&mut ctx), Outcome::Abort);
/// assert_eq!(
///     ctx.get_variable("sign_error").as_deref(),
///     Some("the configuration must specify one of expiry or expires-in")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct UrlSigner {
    scheme: SigningScheme,
    properties: Properties,
    config: SignerConfig,
}

impl UrlSigner {
    /// Create a signer with the default configuration.
    #[must_use]
    pub fn new(scheme: SigningScheme, properties: Properties) -> Self {
        Self {
            scheme,
            properties,
            config: SignerConfig::default(),
        }
    }

    /// Replace the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: SignerConfig) -> Self {
        self.config = config;
        self
    }

    /// The scheme this signer produces.
    #[must_use]
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Run the step using the current time.
    pub fn execute(&self, ctx: &mut dyn MessageContext) -> Outcome {
        self.execute_at(ctx, Utc::now())
    }

    /// Run the step with `now` as the reference instant.
    pub fn execute_at(&self, ctx: &mut dyn MessageContext, now: DateTime<Utc>) -> Outcome {
        let result = {
            let bound = self.properties.bind(&*ctx);
            sign_url(self.scheme, &bound, now)
        };

        match result {
            Ok(result) => {
                info!(
                    scheme = %self.scheme,
                    resource = %result.resource,
                    duration = result.expiry.duration,
                    "signed URL"
                );
                for (suffix, value) in result.variables() {
                    ctx.set_variable(&self.config.variable_name(suffix), value);
                }
                Outcome::Success
            }
            Err(err) => {
                warn!(scheme = %self.scheme, kind = %err.kind(), message = err.message(), "signing failed");
                self.publish_error(ctx, &err);
                Outcome::Abort
            }
        }
    }

    fn publish_error(&self, ctx: &mut dyn MessageContext, err: &SignError) {
        ctx.set_variable(&self.config.variable_name("error"), err.message().to_owned());
        ctx.set_variable(&self.config.variable_name("exception"), err.exception_text());
        if err.reports_stack_trace() {
            ctx.set_variable(&self.config.variable_name("stacktrace"), err.stack_trace());
        }
    }
}
