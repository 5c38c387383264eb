//! Hook configuration read from the canvas element's `data-*` attributes.
//!
//! Missing or empty attributes take their defaults (`[]`, `{}`, `[]`). Present but
//! malformed attributes are an error; there is no fallback.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::de::DeserializeOwned;

use crate::consts::{EVENTS_ATTR, OPS_ATTR, TEMPLATES_ATTR};
use crate::error::HookError;
use crate::op::{Op, Templates};

/// Everything a hook reads from its element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookConfig {
    /// `data-ops`: the op list redrawn on every full redraw.
    pub ops: Vec<Op>,
    /// `data-templates`: templates merged into the hook's mapping.
    pub templates: Templates,
    /// `data-events`: DOM event types to forward to the host.
    pub events: Vec<String>,
}

impl HookConfig {
    /// Read the configuration through `lookup`, which maps a dataset key
    /// (`"ops"`, `"templates"`, `"events"`) to the attribute's raw value.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Attribute`] if any present attribute is not valid
    /// JSON of the expected shape.
    pub fn from_attributes(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HookError> {
        Ok(Self {
            ops: attribute(&lookup, OPS_ATTR)?,
            templates: attribute(&lookup, TEMPLATES_ATTR)?,
            events: attribute(&lookup, EVENTS_ATTR)?,
        })
    }
}

fn attribute<T>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<T, HookError>
where
    T: DeserializeOwned + Default,
{
    match lookup(name) {
        None => Ok(T::default()),
        Some(raw) if raw.trim().is_empty() => Ok(T::default()),
        Some(raw) => serde_json::from_str(&raw).map_err(|source| HookError::Attribute { name, source }),
    }
}
