//! Error taxonomy for URL signing.
//!
//! Every failure inside the engine is a [`SignError`]: a stable
//! [`SignErrorKind`], a short human-readable message, and optionally the
//! underlying cause. The kind decides how the failure is reported back to the
//! caller: configuration and validation mistakes are reported as a message
//! only, while key-format and cryptographic failures also carry a rendered
//! cause chain (the "stack trace").
//!
//! ```
//! use gcsign_core::{SignError, SignErrorKind};
//!
//! let err = SignError::configuration("verb resolves to an empty string");
//! assert_eq!(err.kind(), SignErrorKind::Configuration);
//! assert_eq!(err.message(), "verb resolves to an empty string");
//! assert_eq!(
//!     err.exception_text(),
//!     "ConfigurationError: verb resolves to an empty string"
//! );
//! assert!(!err.reports_stack_trace());
//! ```

use std::fmt;

/// Stable classification of signing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SignErrorKind {
    /// A required property is missing or mutually-required inputs are unresolved.
    Configuration,
    /// The service-account document is structurally invalid.
    Validation,
    /// Key material (or the document carrying it) could not be parsed.
    Format,
    /// The requested lifetime exceeds the scheme maximum or is not positive.
    Expiry,
    /// The signing primitive failed.
    Crypto,
}

impl SignErrorKind {
    /// Returns the taxonomy name, e.g. `ConfigurationError`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::Validation => "ValidationError",
            Self::Format => "FormatError",
            Self::Expiry => "ExpiryError",
            Self::Crypto => "CryptoError",
        }
    }

    /// Whether failures of this kind are reported together with a stack trace.
    #[must_use]
    pub fn reports_stack_trace(&self) -> bool {
        matches!(self, Self::Format | Self::Crypto)
    }
}

impl fmt::Display for SignErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified signing failure.
#[derive(Debug)]
pub struct SignError {
    kind: SignErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl SignError {
    /// Create a new error of the given kind.
    #[must_use]
    pub fn new(kind: SignErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Missing or unresolvable configuration.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SignErrorKind::Configuration, message)
    }

    /// Structurally invalid service-account document.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(SignErrorKind::Validation, message)
    }

    /// Unparsable key material.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(SignErrorKind::Format, message)
    }

    /// Lifetime out of bounds.
    #[must_use]
    pub fn expiry(message: impl Into<String>) -> Self {
        Self::new(SignErrorKind::Expiry, message)
    }

    /// Signing primitive failure.
    #[must_use]
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::new(SignErrorKind::Crypto, message)
    }

    /// The classification of this error.
    #[must_use]
    pub fn kind(&self) -> SignErrorKind {
        self.kind
    }

    /// The user-facing message, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error should be reported with a stack trace.
    #[must_use]
    pub fn reports_stack_trace(&self) -> bool {
        self.kind.reports_stack_trace()
    }

    /// Single-line `"<Kind>Error: <message>"` rendering.
    #[must_use]
    pub fn exception_text(&self) -> String {
        self.to_string().replace(['\r', '\n'], " ")
    }

    /// Render the error followed by its chain of causes.
    ///
    /// The result is never empty: an error without a source renders as its
    /// own exception text.
    #[must_use]
    pub fn stack_trace(&self) -> String {
        let mut out = self.exception_text();
        let mut cause = std::error::Error::source(self);
        if cause.is_some() {
            out.push_str("\n\nCaused by:");
        }
        let mut depth = 0;
        while let Some(err) = cause {
            out.push_str(&format!("\n    {depth}: {err}"));
            depth += 1;
            cause = err.source();
        }
        out
    }
}

/// Convenience result type for signing operations.
pub type SignResult<T> = Result<T, SignError>;
