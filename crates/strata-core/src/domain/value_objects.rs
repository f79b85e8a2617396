// ============================================================================
// domain/value_objects.rs - RENDER ARGUMENTS
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::error::DomainError;

/// Named values passed to a render function.
///
/// Combination is a shallow, left-to-right merge: keys from a later source
/// replace keys from an earlier one, nested objects are not merged. The empty
/// set is the identity, and combination is associative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderArgs(Map<String, Value>);

impl RenderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::InvalidArgs(format!(
                "expected an object, found `{other}`"
            ))),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merge `later` over `self`.
    pub fn merge(&mut self, later: RenderArgs) {
        self.0.extend(later.0);
    }

    /// Fold sources left to right.
    pub fn combine(sources: impl IntoIterator<Item = RenderArgs>) -> Self {
        sources.into_iter().fold(Self::new(), |mut acc, next| {
            acc.merge(next);
            acc
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl fmt::Display for RenderArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.to_value())
    }
}

impl FromIterator<(String, Value)> for RenderArgs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
