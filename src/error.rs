//! Error types shared across the crate.
//!
//! Nothing here is ever retried. [`OpError`] and [`DrawError`] are logged and
//! the offending op is skipped; [`HookError`] is the only kind that reaches
//! JavaScript, and only for malformed data attributes at mount or update.

use wasm_bindgen::JsValue;

/// Error returned when an op cannot be decoded into a command.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpError {
    /// No command of that name exists.
    #[error("unknown operation: {0}")]
    UnknownOp(String),
    /// `set` named a context property the command set does not cover.
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    /// The op exists but its arguments have the wrong shape.
    #[error("bad arguments for {op}: {reason}")]
    BadArgs { op: String, reason: String },
}

impl OpError {
    /// Whether this error names something that does not exist, as opposed to
    /// an op that exists but was called wrongly. The former is a warning.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::UnknownOp(_) | Self::UnknownProperty(_))
    }
}

/// A drawing call rejected by the surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DrawError {
    /// The browser threw while executing a canvas call.
    #[error("canvas call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DrawError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe_js(&value))
    }
}

/// Errors raised by the hook binding.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// A `data-*` attribute held malformed JSON.
    #[error("malformed data-{name} attribute: {source}")]
    Attribute {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A host payload could not be encoded or decoded.
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    /// The element did not hand out a 2D rendering context.
    #[error("canvas has no 2d context")]
    NoContext,
    /// A JavaScript call threw.
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for HookError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe_js(&value))
    }
}

impl From<HookError> for JsValue {
    fn from(err: HookError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
