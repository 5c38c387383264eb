//! The seam between decoded commands and pixels.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Everything above it speaks [`Command`], so the interpreter, the instance
//! renderer, and the hook core run natively under test against a recording
//! surface instead of a browser.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule};

use crate::command::{Command, FillRule, Property, Rect};
use crate::error::DrawError;

/// Something drawing commands can be applied to.
pub trait Surface {
    /// Apply one command.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError`] if the underlying context rejects the call.
    fn apply(&mut self, command: &Command) -> Result<(), DrawError>;
}

impl Surface for CanvasRenderingContext2d {
    fn apply(&mut self, command: &Command) -> Result<(), DrawError> {
        match command {
            Command::Set(property) => set_property(self, property)?,
            Command::Save => self.save(),
            Command::Restore => self.restore(),
            Command::Translate { x, y } => self.translate(*x, *y)?,
            Command::Rotate(angle) => self.rotate(*angle)?,
            Command::Scale { x, y } => self.scale(*x, *y)?,
            Command::Transform([a, b, c, d, e, f]) => self.transform(*a, *b, *c, *d, *e, *f)?,
            Command::SetTransform([a, b, c, d, e, f]) => self.set_transform(*a, *b, *c, *d, *e, *f)?,
            Command::ResetTransform => self.reset_transform()?,
            Command::BeginPath => self.begin_path(),
            Command::ClosePath => self.close_path(),
            Command::MoveTo { x, y } => self.move_to(*x, *y),
            Command::LineTo { x, y } => self.line_to(*x, *y),
            Command::BezierCurveTo([cp1x, cp1y, cp2x, cp2y, x, y]) => {
                self.bezier_curve_to(*cp1x, *cp1y, *cp2x, *cp2y, *x, *y);
            }
            Command::QuadraticCurveTo([cpx, cpy, x, y]) => self.quadratic_curve_to(*cpx, *cpy, *x, *y),
            Command::Arc { x, y, radius, start, end, anticlockwise } => {
                self.arc_with_anticlockwise(*x, *y, *radius, *start, *end, *anticlockwise)?;
            }
            Command::ArcTo { x1, y1, x2, y2, radius } => self.arc_to(*x1, *y1, *x2, *y2, *radius)?,
            Command::Ellipse { x, y, radius_x, radius_y, rotation, start, end, anticlockwise } => {
                self.ellipse_with_anticlockwise(
                    *x,
                    *y,
                    *radius_x,
                    *radius_y,
                    *rotation,
                    *start,
                    *end,
                    *anticlockwise,
                )?;
            }
            Command::Rect(Rect { x, y, width, height }) => self.rect(*x, *y, *width, *height),
            Command::Fill(rule) => self.fill_with_canvas_winding_rule(winding_rule(*rule)),
            Command::Stroke => self.stroke(),
            Command::Clip(rule) => self.clip_with_canvas_winding_rule(winding_rule(*rule)),
            Command::FillRect(Rect { x, y, width, height }) => self.fill_rect(*x, *y, *width, *height),
            Command::StrokeRect(Rect { x, y, width, height }) => self.stroke_rect(*x, *y, *width, *height),
            Command::ClearRect(Rect { x, y, width, height }) => self.clear_rect(*x, *y, *width, *height),
            Command::FillText { text, x, y, max_width } => match max_width {
                Some(w) => self.fill_text_with_max_width(text, *x, *y, *w)?,
                None => self.fill_text(text, *x, *y)?,
            },
            Command::StrokeText { text, x, y, max_width } => match max_width {
                Some(w) => self.stroke_text_with_max_width(text, *x, *y, *w)?,
                None => self.stroke_text(text, *x, *y)?,
            },
            Command::SetLineDash(segments) => {
                let array: js_sys::Array = segments.iter().map(|s| JsValue::from_f64(*s)).collect();
                self.set_line_dash(&array)?;
            }
        }
        Ok(())
    }
}

fn set_property(ctx: &CanvasRenderingContext2d, property: &Property) -> Result<(), DrawError> {
    match property {
        Property::FillStyle(v) => ctx.set_fill_style_str(v),
        Property::StrokeStyle(v) => ctx.set_stroke_style_str(v),
        Property::LineWidth(v) => ctx.set_line_width(*v),
        Property::LineCap(v) => ctx.set_line_cap(v),
        Property::LineJoin(v) => ctx.set_line_join(v),
        Property::MiterLimit(v) => ctx.set_miter_limit(*v),
        Property::LineDashOffset(v) => ctx.set_line_dash_offset(*v),
        Property::Font(v) => ctx.set_font(v),
        Property::TextAlign(v) => ctx.set_text_align(v),
        Property::TextBaseline(v) => ctx.set_text_baseline(v),
        Property::GlobalAlpha(v) => ctx.set_global_alpha(*v),
        Property::GlobalCompositeOperation(v) => ctx.set_global_composite_operation(v)?,
        Property::ShadowBlur(v) => ctx.set_shadow_blur(*v),
        Property::ShadowColor(v) => ctx.set_shadow_color(v),
        Property::ShadowOffsetX(v) => ctx.set_shadow_offset_x(*v),
        Property::ShadowOffsetY(v) => ctx.set_shadow_offset_y(*v),
        Property::ImageSmoothingEnabled(v) => ctx.set_image_smoothing_enabled(*v),
        Property::Filter(v) => ctx.set_filter(v),
    }
    Ok(())
}

fn winding_rule(rule: FillRule) -> CanvasWindingRule {
    match rule {
        FillRule::NonZero => CanvasWindingRule::Nonzero,
        FillRule::EvenOdd => CanvasWindingRule::Evenodd,
    }
}

/// Test double that records every command it accepts.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<Command>,
    /// Commands for which `apply` fails instead of recording.
    pub fail_on: Vec<Command>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that rejects `command` every time it is applied.
    pub fn failing_on(command: Command) -> Self {
        Self { commands: Vec::new(), fail_on: vec![command] }
    }

    /// Recorded commands excluding `save`/`restore` bookkeeping.
    pub fn drawing(&self) -> Vec<Command> {
        self.commands
            .iter()
            .filter(|c| !matches!(c, Command::Save | Command::Restore))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn apply(&mut self, command: &Command) -> Result<(), DrawError> {
        if self.fail_on.contains(command) {
            return Err(DrawError::Js(format!("rejected {command:?}")));
        }
        self.commands.push(command.clone());
        Ok(())
    }
}
