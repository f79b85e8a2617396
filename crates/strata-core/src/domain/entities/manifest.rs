//! `package.json` documents and the merge rules applied to them.

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

pub const MANIFEST_FILE: &str = "package.json";

/// Top-level collections that an extension may extend.
pub const MERGEABLE_COLLECTIONS: [&str; 4] =
    ["scripts", "dependencies", "devDependencies", "peerDependencies"];

/// A package manifest: a JSON object, field order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest(Map<String, Value>);

impl Manifest {
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(DomainError::InvalidManifest(format!(
                "expected an object, found {}",
                kind_of(&other)
            ))),
            Err(e) => Err(DomainError::InvalidManifest(e.to_string())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Two-space indented JSON with a trailing newline.
    pub fn to_pretty_string(&self) -> String {
        format!("{:#}\n", Value::Object(self.0.clone()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow right-biased union of the mergeable collections.
    ///
    /// A collection is merged only when both manifests define it as an
    /// object; collections present only in `source` are not introduced.
    /// Returns the names of the collections that were merged.
    pub fn merge_collections_from(&mut self, source: &Manifest) -> Vec<&'static str> {
        let mut merged = Vec::new();
        for name in MERGEABLE_COLLECTIONS {
            let Some(Value::Object(incoming)) = source.0.get(name) else {
                continue;
            };
            let Some(Value::Object(existing)) = self.0.get_mut(name) else {
                continue;
            };
            for (key, value) in incoming {
                existing.insert(key.clone(), value.clone());
            }
            merged.push(name);
        }
        merged
    }

    /// Recursive merge where `source` wins.
    ///
    /// Objects merge key by key; scalars and arrays from `source` replace
    /// whatever `self` held.
    pub fn deep_merge_from(&mut self, source: &Manifest) {
        deep_merge(&mut self.0, &source.0);
    }

    /// Entries of `workspaces.packages`, or of a bare `workspaces` array.
    pub fn workspace_members(&self) -> Option<Vec<&str>> {
        let list = match self.0.get("workspaces")? {
            Value::Object(ws) => ws.get("packages")?.as_array()?,
            Value::Array(list) => list,
            _ => return None,
        };
        Some(list.iter().filter_map(Value::as_str).collect())
    }

    /// Append `member` to the workspace list.
    ///
    /// Returns `true` only when the manifest changed. No-op without a
    /// workspace list or when the member is already listed.
    pub fn add_workspace_member(&mut self, member: &str) -> bool {
        let list = match self.0.get_mut("workspaces") {
            Some(Value::Object(ws)) => match ws.get_mut("packages") {
                Some(Value::Array(list)) => list,
                _ => return false,
            },
            Some(Value::Array(list)) => list,
            _ => return false,
        };

        if list.iter().any(|v| v.as_str() == Some(member)) {
            return false;
        }
        list.push(Value::String(member.to_string()));
        true
    }
}

fn deep_merge(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, incoming) in source {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
