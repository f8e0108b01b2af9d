//! `{name}` placeholder substitution.
//!
//! Property values and URL templates may reference variables by wrapping the
//! variable name in curly braces, e.g. `/{bucket}/{object}`. Substitution is a
//! single left-to-right pass: text produced by a substitution is never scanned
//! again, so a variable whose value itself contains `{...}` is inserted
//! verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A placeholder: a non-empty name without braces or spaces, wrapped in braces.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{} ]+)\}").expect("placeholder regex is valid"));

/// Replace every `{name}` placeholder in `template` with `lookup(name)`.
///
/// Names that the lookup does not know are replaced by the empty string.
///
/// # Examples
///
/// ```
/// use gcsign_core::template::resolve_template;
///
/// let resolved = resolve_template("{a}-{b}-{c}", |name| match name {
///     "a" => Some("X".to_owned()),
///     "b" => Some("Y".to_owned()),
///     _ => None,
/// });
/// assert_eq!(resolved, "X-Y-");
/// ```
#[must_use]
pub fn resolve_template<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}
