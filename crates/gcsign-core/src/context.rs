//! Per-invocation variable store.
//!
//! The signing engine reads referenced variables from, and publishes its
//! results into, a [`MessageContext`] owned by the caller. The gateway
//! embedding the engine provides its own implementation; [`InMemoryContext`]
//! is a plain map for tests and the command-line front end.

use std::collections::BTreeMap;

/// Key/value variable store the engine reads from and writes results into.
pub trait MessageContext {
    /// Look up a variable by name.
    fn get_variable(&self, name: &str) -> Option<String>;

    /// Set (or overwrite) a variable.
    fn set_variable(&mut self, name: &str, value: String);
}

/// A [`MessageContext`] backed by an ordered in-memory map.
///
/// # Examples
///
/// ```
/// use gcsign_core::{InMemoryContext, MessageContext};
///
/// let mut ctx = InMemoryContext::new();
/// ctx.set_variable("bucket", "images".to_owned());
/// assert_eq!(ctx.get_variable("bucket").as_deref(), Some("images"));
/// assert_eq!(ctx.get_variable("object"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryContext {
    variables: BTreeMap<String, String>,
}

impl InMemoryContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over all variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume the context, returning the underlying map.
    #[must_use]
    pub fn into_variables(self) -> BTreeMap<String, String> {
        self.variables
    }
}

impl<K, V> FromIterator<(K, V)> for InMemoryContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl MessageContext for InMemoryContext {
    fn get_variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: String) {
        self.variables.insert(name.to_owned(), value);
    }
}
