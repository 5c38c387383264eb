//! Batched template instantiation: instance rows, column layouts, palettes.
//!
//! An `__instances` op carries `[template, rows, palette?, layout?]`. Rows come
//! in two encodings, a legacy map of named fields and a positional array read
//! through a column layout. Both are resolved into a [`Placement`] once, when
//! the batch is decoded, so rendering never branches on the encoding.
//!
//! Rendering wraps every placement in `save`/`restore`. The restore is issued
//! whatever happened in between, so one failing instance cannot leak its
//! transform into the next one or into the ops after the batch.

#[cfg(test)]
#[path = "instance_test.rs"]
mod instance_test;

use serde::Deserialize;
use serde_json::Value;

use crate::command::{Command, Property};
use crate::consts::{INSTANCES_OP, INSTANCE_FIELDS, MAX_TEMPLATE_DEPTH};
use crate::error::{DrawError, OpError};
use crate::interp::{Report, execute_nested};
use crate::op::{Op, Templates};
use crate::surface::Surface;

/// A logical instance field, in default column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    X,
    Y,
    Rotate,
    ScaleX,
    ScaleY,
    Fill,
    Stroke,
    Alpha,
}

impl Field {
    fn index(self) -> usize {
        self as usize
    }
}

/// One entry of a column layout list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum LayoutEntry {
    /// At list index `i`: the row position holding logical field `i`.
    Position(usize),
    /// At list index `i`: the field stored at row position `i`.
    Named(Field),
}

/// Where each logical field lives in a positional row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    positions: [Option<usize>; INSTANCE_FIELDS],
}

impl Default for ColumnLayout {
    /// Identity layout: field `i` at row position `i`.
    fn default() -> Self {
        let mut positions = [None; INSTANCE_FIELDS];
        for (i, slot) in positions.iter_mut().enumerate() {
            *slot = Some(i);
        }
        Self { positions }
    }
}

impl ColumnLayout {
    fn from_entries(entries: &[LayoutEntry]) -> Self {
        let mut positions = [None; INSTANCE_FIELDS];
        for (i, entry) in entries.iter().enumerate() {
            match *entry {
                LayoutEntry::Position(pos) => {
                    if let Some(slot) = positions.get_mut(i) {
                        *slot = Some(pos);
                    }
                }
                LayoutEntry::Named(field) => positions[field.index()] = Some(i),
            }
        }
        Self { positions }
    }

    /// Row position of `field`, if the layout maps it.
    #[must_use]
    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions[field.index()]
    }
}

/// A style reference: a palette index, or a literal color (legacy rows only).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorRef {
    Index(f64),
    Literal(String),
}

impl ColorRef {
    /// Resolve against `palette`. Indices outside `[0, len)` resolve to nothing.
    #[must_use]
    pub fn resolve<'a>(&'a self, palette: &'a [String]) -> Option<&'a str> {
        match self {
            Self::Literal(color) => Some(color.as_str()),
            Self::Index(index) => palette_index(*index).and_then(|i| palette.get(i)).map(String::as_str),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn palette_index(raw: f64) -> Option<usize> {
    (raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0).then(|| raw as usize)
}

/// Legacy row: a map of optional named fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldRow {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotate: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub fill: Option<ColorRef>,
    pub stroke: Option<ColorRef>,
    pub alpha: Option<f64>,
}

/// An instance row as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InstanceRow {
    /// Positional row read through the batch's [`ColumnLayout`].
    ByColumn(Vec<Option<f64>>),
    /// Legacy named-field row.
    ByField(FieldRow),
}

impl InstanceRow {
    /// Resolve this row into a placement.
    #[must_use]
    pub fn resolve(self, layout: &ColumnLayout) -> Placement {
        match self {
            Self::ByField(row) => Placement {
                x: row.x,
                y: row.y,
                rotate: row.rotate,
                scale_x: row.scale_x,
                scale_y: row.scale_y,
                fill: row.fill,
                stroke: row.stroke,
                alpha: row.alpha,
            },
            Self::ByColumn(cells) => {
                let cell = |field| layout.position(field).and_then(|pos| cells.get(pos).copied().flatten());
                Placement {
                    x: cell(Field::X),
                    y: cell(Field::Y),
                    rotate: cell(Field::Rotate),
                    scale_x: cell(Field::ScaleX),
                    scale_y: cell(Field::ScaleY),
                    fill: cell(Field::Fill).map(ColorRef::Index),
                    stroke: cell(Field::Stroke).map(ColorRef::Index),
                    alpha: cell(Field::Alpha),
                }
            }
        }
    }
}

/// The resolved transform and style of one instance. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Rotation in radians.
    pub rotate: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub fill: Option<ColorRef>,
    pub stroke: Option<ColorRef>,
    pub alpha: Option<f64>,
}

impl Placement {
    /// Surface commands that move and style the context for this instance.
    #[must_use]
    pub fn commands(&self, palette: &[String]) -> Vec<Command> {
        let mut out = vec![Command::Translate { x: self.x.unwrap_or(0.0), y: self.y.unwrap_or(0.0) }];
        if let Some(angle) = self.rotate {
            out.push(Command::Rotate(angle));
        }
        if self.scale_x.is_some() || self.scale_y.is_some() {
            out.push(Command::Scale { x: self.scale_x.unwrap_or(1.0), y: self.scale_y.unwrap_or(1.0) });
        }
        if let Some(color) = self.fill.as_ref().and_then(|c| c.resolve(palette)) {
            out.push(Command::Set(Property::FillStyle(color.to_owned())));
        }
        if let Some(color) = self.stroke.as_ref().and_then(|c| c.resolve(palette)) {
            out.push(Command::Set(Property::StrokeStyle(color.to_owned())));
        }
        if let Some(alpha) = self.alpha {
            out.push(Command::Set(Property::GlobalAlpha(alpha)));
        }
        out
    }
}

/// A decoded `__instances` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBatch {
    pub template: String,
    pub placements: Vec<Placement>,
    pub palette: Vec<String>,
}

impl InstanceBatch {
    /// Decode `[template, rows, palette?, layout?]`.
    ///
    /// # Errors
    ///
    /// Returns [`OpError::BadArgs`] when any argument has the wrong shape.
    pub fn decode(args: &[Value]) -> Result<Self, OpError> {
        let bad = |reason: String| OpError::BadArgs { op: INSTANCES_OP.to_owned(), reason };

        let template = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| bad("expected template name".to_owned()))?
            .to_owned();
        let rows: Vec<InstanceRow> = decode_arg(args.get(1)).map_err(|e| bad(format!("rows: {e}")))?;
        let palette: Vec<String> = decode_arg(args.get(2)).map_err(|e| bad(format!("palette: {e}")))?;
        let layout = match args.get(3).filter(|v| !v.is_null()) {
            None => ColumnLayout::default(),
            Some(v) => {
                let entries: Vec<LayoutEntry> =
                    serde_json::from_value(v.clone()).map_err(|e| bad(format!("layout: {e}")))?;
                ColumnLayout::from_entries(&entries)
            }
        };

        let placements = rows.into_iter().map(|row| row.resolve(&layout)).collect();
        Ok(Self { template, placements, palette })
    }
}

/// Decode an optional argument; absent or `null` yields the default.
fn decode_arg<T>(value: Option<&Value>) -> Result<T, serde_json::Error>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone()),
    }
}

/// Stamp `batch.template` once per placement.
///
/// `active` holds the templates currently being expanded, outermost first.
/// An unknown template, a template that would instantiate itself again, or
/// nesting past [`MAX_TEMPLATE_DEPTH`] skips the whole batch with a warning
/// and draws nothing.
pub fn render_instances<S: Surface + ?Sized>(
    surface: &mut S,
    templates: &Templates,
    batch: &InstanceBatch,
    active: &mut Vec<String>,
) -> Report {
    let mut report = Report::default();
    let Some(ops) = templates.get(&batch.template) else {
        log::warn!("unknown template: {}", batch.template);
        report.skipped += 1;
        return report;
    };
    if active.contains(&batch.template) {
        log::warn!("template {} instantiates itself via {active:?}; skipping batch", batch.template);
        report.skipped += 1;
        return report;
    }
    if active.len() >= MAX_TEMPLATE_DEPTH {
        log::warn!("template {} nested deeper than {MAX_TEMPLATE_DEPTH}; skipping batch", batch.template);
        report.skipped += 1;
        return report;
    }

    active.push(batch.template.clone());
    for placement in &batch.placements {
        report += place(surface, templates, ops, placement, &batch.palette, active);
    }
    active.pop();
    report.applied += 1;
    report
}

fn place<S: Surface + ?Sized>(
    surface: &mut S,
    templates: &Templates,
    ops: &[Op],
    placement: &Placement,
    palette: &[String],
    active: &mut Vec<String>,
) -> Report {
    let mut report = Report::default();
    if let Err(err) = surface.apply(&Command::Save) {
        log::error!("failed to save state for instance of template: {err}");
        return report;
    }

    match apply_all(surface, &placement.commands(palette)) {
        Ok(()) => report += execute_nested(surface, templates, ops, active),
        Err(err) => log::error!("failed to place instance {placement:?}: {err}"),
    }

    if let Err(err) = surface.apply(&Command::Restore) {
        log::error!("failed to restore state after instance: {err}");
    }
    report
}

fn apply_all<S: Surface + ?Sized>(surface: &mut S, commands: &[Command]) -> Result<(), DrawError> {
    for command in commands {
        surface.apply(command)?;
    }
    Ok(())
}
