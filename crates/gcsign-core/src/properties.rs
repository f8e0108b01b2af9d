//! Configured property lookup.
//!
//! A signing step is configured with a flat set of named string properties.
//! Property values may reference context variables with `{name}` placeholders;
//! lookups go through [`PropertySource`], which hands back values that are
//! already trimmed and resolved against the caller's [`MessageContext`].

use std::collections::HashMap;

use crate::context::MessageContext;
use crate::error::{SignError, SignResult};
use crate::template::resolve_template;

/// Capability interface for reading resolved property values.
pub trait PropertySource {
    /// Look up an optional property.
    ///
    /// Returns `None` when the property is absent or resolves to an empty string.
    fn get_optional(&self, name: &str) -> Option<String>;

    /// Look up a required property.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the property is absent or resolves
    /// to an empty string.
    fn get_required(&self, name: &str) -> SignResult<String> {
        self.get_optional(name)
            .ok_or_else(|| SignError::configuration(format!("{name} resolves to an empty string")))
    }
}

/// The raw, unresolved properties configured for a signing step.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a property, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a property.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The raw value as configured, before trimming and resolution.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Bind these properties to a context so they can be resolved.
    #[must_use]
    pub fn bind<'a>(&'a self, context: &'a dyn MessageContext) -> BoundProperties<'a> {
        BoundProperties {
            properties: self,
            context,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// [`Properties`] resolved against a [`MessageContext`].
pub struct BoundProperties<'a> {
    properties: &'a Properties,
    context: &'a dyn MessageContext,
}

impl std::fmt::Debug for BoundProperties<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundProperties")
            .field("properties", &self.properties.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl PropertySource for BoundProperties<'_> {
    fn get_optional(&self, name: &str) -> Option<String> {
        let value = self.properties.raw(name)?.trim();
        if value.is_empty() {
            return None;
        }
        let resolved = resolve_template(value, |var| self.context.get_variable(var));
        (!resolved.is_empty()).then_some(resolved)
    }
}
