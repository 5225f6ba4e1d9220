//! Named secrets served to trusted callers.
//!
//! The store is filled once from configuration and never mutated, so it is
//! shared across requests behind an `Arc` without locking. Values stay
//! wrapped in [`SecretString`] so `Debug` output never shows them.

use std::collections::HashMap;
use std::fmt;

use secrecy::SecretString;

/// Lookup failures, mapped to 400 and 404 by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("Secret name is required")]
    MissingName,

    #[error("Secret {0} not found")]
    NotFound(String),
}

#[derive(Default)]
pub struct SecretStore {
    values: HashMap<String, SecretString>,
}

impl SecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load each of `names` through `lookup`. Names with no (or an empty)
    /// value are skipped and later answer `NotFound`.
    pub fn load<F>(names: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = names
            .iter()
            .filter_map(|name| {
                lookup(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (name.clone(), SecretString::new(value)))
            })
            .collect();
        Self { values }
    }

    /// Add or replace a secret.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), SecretString::new(value.into()));
        self
    }

    /// Resolve `name` to its value.
    ///
    /// # Errors
    ///
    /// [`SecretError::MissingName`] for an empty name, [`SecretError::NotFound`]
    /// when nothing is configured under it.
    pub fn get(&self, name: &str) -> Result<&SecretString, SecretError> {
        if name.is_empty() {
            return Err(SecretError::MissingName);
        }
        self.values.get(name).ok_or_else(|| SecretError::NotFound(name.to_owned()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("SecretStore").field("names", &names).finish()
    }
}

#[cfg(test)]
#[path = "secrets_test.rs"]
mod tests;
