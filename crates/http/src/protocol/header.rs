//! Request header fields.
//!
//! Unlike [`http::HeaderMap`], names are kept exactly as they arrived on the
//! wire and compared byte for byte, so `Accept` and `accept` are two different
//! fields. A repeated name folds its values into one, separated by `", "`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Header name to value mapping of a parsed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    inner: HashMap<String, String>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Default::default()
    }

    /// Stores `value` under `name`, or appends `", value"` if `name` was already seen.
    pub fn append(&mut self, name: impl Into<String>, value: &str) {
        match self.inner.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                let stored = entry.get_mut();
                stored.push_str(", ");
                stored.push_str(value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
            }
        }
    }

    /// Returns the value stored under exactly `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
