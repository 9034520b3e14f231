//! Substitution context and placeholder-preserving formatting.
//!
//! Placeholders have the form `{identifier}`. A placeholder whose key is
//! missing from the context, or mapped to `None`, stays in the output exactly
//! as written. That lets a template be rendered in several passes (structure
//! now, environment later) without any pass knowing about the others.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `{{` is matched first so escaped braces are passed through untouched and
/// never re-enter a later pass as a placeholder.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Values substituted into templates.
///
/// `None` marks a key as known but deliberately left literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, Option<String>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a concrete value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a key whose placeholder must survive rendering.
    pub fn with_literal(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), Some(value.into()));
    }

    /// Insert `value`, or keep the placeholder literal when it is `None`.
    pub fn insert_optional(&mut self, key: impl Into<String>, value: Option<String>) {
        self.values.insert(key.into(), value);
    }

    /// Value substituted for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Option::as_deref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Context
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

/// Replace every `{identifier}` that `context` has a value for.
///
/// Everything else (unknown keys, `None` values, `{{`, `{0}`, `{a.b}`) is
/// copied through unchanged. Never fails.
pub fn substitute(template: &str, context: &Context) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|key| context.get(key.as_str()))
                .map_or_else(|| caps[0].to_string(), str::to_string)
        })
        .into_owned()
}
