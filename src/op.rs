//! Wire model: ops, op lists, templates, and host payloads.
//!
//! Ops arrive as JSON pairs `[name, [args...]]`. They are kept undecoded here;
//! [`crate::command`] turns one op at a time into a typed directive so a bad
//! op fails alone instead of failing the whole list.
//!
//! An element of an op list that is not a `[name, args]` pair still decodes.
//! It becomes an [`Op`] carrying the shape error, which the command decoder
//! reports when that one op is reached.

#[cfg(test)]
#[path = "op_test.rs"]
mod op_test;

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::OpError;

/// One drawing instruction: an op name and its positional arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Op {
    /// Command or directive name, e.g. `"fillRect"`, `"set"`, `"__instances"`.
    /// For a malformed element, the JSON text of whatever stood in its place.
    pub name: String,
    /// Positional arguments. A missing element decodes as an empty list.
    pub args: Vec<Value>,
    shape_error: Option<String>,
}

impl Op {
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self { name: name.into(), args, shape_error: None }
    }

    fn malformed(name: String, reason: String) -> Self {
        Self { name, args: Vec::new(), shape_error: Some(reason) }
    }

    /// Whether the element this op was decoded from was a proper pair.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.shape_error.is_none()
    }

    /// Fail with [`OpError::BadArgs`] if this op was not a `[name, args]` pair.
    ///
    /// # Errors
    ///
    /// Returns the shape error recorded at decode time.
    pub fn check_shape(&self) -> Result<(), OpError> {
        match &self.shape_error {
            None => Ok(()),
            Some(reason) => Err(OpError::BadArgs { op: self.name.clone(), reason: reason.clone() }),
        }
    }
}

impl From<Value> for Op {
    fn from(value: Value) -> Self {
        let parts = match value {
            Value::Array(parts) if (1..=2).contains(&parts.len()) => parts,
            other => {
                let text = other.to_string();
                return Self::malformed(text.clone(), format!("expected a [name, args] pair, got {text}"));
            }
        };
        let mut parts = parts.into_iter();
        let name = match parts.next() {
            Some(Value::String(name)) => name,
            other => {
                let text = other.map_or_else(String::new, |v| v.to_string());
                return Self::malformed(text.clone(), format!("op name must be a string, got {text}"));
            }
        };
        match parts.next() {
            None => Self::new(name, Vec::new()),
            Some(Value::Array(args)) => Self::new(name, args),
            Some(other) => Self::malformed(name, format!("arguments must be a list, got {other}")),
        }
    }
}

/// Named, reusable op lists.
///
/// Grows by merging: a later definition replaces an earlier one of the same
/// name, and nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Templates {
    entries: HashMap<String, Vec<Op>>,
}

impl Templates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `other` into this mapping, last write wins per name.
    pub fn merge(&mut self, other: Templates) {
        self.entries.extend(other.entries);
    }

    /// Define or replace a single template.
    pub fn insert(&mut self, name: impl Into<String>, ops: Vec<Op>) {
        self.entries.insert(name.into(), ops);
    }

    /// Look up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Op]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Payload of the host-pushed `draw` event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DrawPayload {
    /// Ops to interpret immediately.
    #[serde(default)]
    pub ops: Vec<Op>,
    /// Templates to merge before interpreting `ops`.
    #[serde(default)]
    pub templates: Option<Templates>,
}
