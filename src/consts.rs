//! Shared constants for the easel crate.

// ── Wire names ──────────────────────────────────────────────────

/// Op name for a context property assignment: `["set", [name, value]]`.
pub const SET_OP: &str = "set";

/// Op name for a batched template instantiation.
pub const INSTANCES_OP: &str = "__instances";

/// Prefix of the host event names a hook listens on (`easel:<id>:draw`).
pub const EVENT_NAMESPACE: &str = "easel";

/// DOM event type forwarded as a key payload rather than pointer coordinates.
pub const KEYDOWN_EVENT: &str = "keydown";

// ── Data attributes ─────────────────────────────────────────────

/// `data-ops`: initial op list.
pub const OPS_ATTR: &str = "ops";

/// `data-templates`: initial template mapping.
pub const TEMPLATES_ATTR: &str = "templates";

/// `data-events`: DOM event types to forward.
pub const EVENTS_ATTR: &str = "events";

// ── Instances ───────────────────────────────────────────────────

/// Number of logical fields in an instance row.
pub const INSTANCE_FIELDS: usize = 8;

/// Nesting limit for templates that instantiate other templates.
pub const MAX_TEMPLATE_DEPTH: usize = 8;
