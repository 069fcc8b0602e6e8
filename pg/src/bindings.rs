//! Template variable bindings
//!
//! Values are kept as YAML values so numbers stay numbers when they reach
//! the template (`range(n)` needs an integer, not the string "5").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

use crate::error::{GenerateError, GenerateResult};

/// Name of the node-count variable
pub const NODE_COUNT_VAR: &str = "n";

/// Node count used when nothing overrides it
pub const DEFAULT_NODE_COUNT: u64 = 5;

/// Name → value map handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Value>);

impl Default for Bindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.set(NODE_COUNT_VAR, Value::from(DEFAULT_NODE_COUNT));
        bindings
    }
}

impl Bindings {
    /// A binding set with no entries
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or overwrite a binding
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        debug!(%name, ?value, "Bindings::set: called");
        self.0.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of this set; entries in `other` win
    pub fn merge(&mut self, other: Bindings) {
        debug!(count = other.len(), "Bindings::merge: called");
        self.0.extend(other.0);
    }

    /// Apply a list of `KEY=VALUE` assignments in order
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> GenerateResult<()> {
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment.as_ref())?;
            self.set(key, value);
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse a `KEY=VALUE` assignment
///
/// VALUE is read as YAML, so `5` is an integer and `true` a bool. Text that
/// is not valid YAML is kept as a plain string.
pub fn parse_assignment(assignment: &str) -> GenerateResult<(String, Value)> {
    debug!(%assignment, "parse_assignment: called");
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| GenerateError::InvalidBinding(assignment.to_string()))?;

    let key = key.trim();
    if !is_identifier(key) {
        return Err(GenerateError::InvalidBinding(assignment.to_string()));
    }

    let value = if raw.is_empty() {
        Value::String(String::new())
    } else {
        serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    };

    Ok((key.to_string(), value))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => chars.all(|c| c == '_' || c.is_ascii_alphanumeric()),
        _ => false,
    }
}
