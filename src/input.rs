//! Input model: the payloads forwarded to the host for DOM input events.
//!
//! `keydown` is forwarded as the key identity plus modifier state. Every other
//! configured event type is treated as a pointer event and forwarded as
//! canvas-relative coordinates, rounded to whole CSS pixels.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

use crate::consts::KEYDOWN_EVENT;

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Shift key is held.
    pub shift: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Payload of a forwarded `keydown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPayload {
    /// Key value as reported by the browser (e.g. `"a"`, `"Escape"`).
    pub key: String,
    /// Physical key code (e.g. `"KeyA"`).
    pub code: String,
    #[serde(flatten)]
    pub modifiers: Modifiers,
}

/// Payload of a forwarded pointer event, relative to the canvas's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointerPayload {
    pub x: i64,
    pub y: i64,
}

impl PointerPayload {
    /// Subtract the element origin from the event's client coordinates.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_client(client: Point, origin: Point) -> Self {
        Self {
            x: (client.x - origin.x).round() as i64,
            y: (client.y - origin.y).round() as i64,
        }
    }
}

/// How a configured DOM event type is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    Key,
    Pointer,
}

impl Forward {
    #[must_use]
    pub fn for_event(event_type: &str) -> Self {
        if event_type == KEYDOWN_EVENT { Self::Key } else { Self::Pointer }
    }
}

/// Host event name for a forwarded DOM event: `"<element id>:<event type>"`.
#[must_use]
pub fn event_name(element_id: &str, event_type: &str) -> String {
    format!("{element_id}:{event_type}")
}
