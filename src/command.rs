//! The drawing command set and the decoder from wire ops.
//!
//! Each variant maps to exactly one `CanvasRenderingContext2d` call. Names the
//! decoder does not recognize fail with [`OpError::UnknownOp`]; names it does
//! recognize but with arguments of the wrong shape fail with
//! [`OpError::BadArgs`]. Neither aborts the op list being interpreted.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde_json::Value;

use crate::consts::{INSTANCES_OP, SET_OP};
use crate::error::OpError;
use crate::instance::InstanceBatch;
use crate::op::Op;

/// An axis-aligned rectangle argument (`x, y, width, height`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Path fill rule for `fill` and `clip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// A context property assignment, from `["set", [name, value]]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    LineCap(String),
    LineJoin(String),
    MiterLimit(f64),
    LineDashOffset(f64),
    Font(String),
    TextAlign(String),
    TextBaseline(String),
    GlobalAlpha(f64),
    GlobalCompositeOperation(String),
    ShadowBlur(f64),
    ShadowColor(String),
    ShadowOffsetX(f64),
    ShadowOffsetY(f64),
    ImageSmoothingEnabled(bool),
    Filter(String),
}

/// A single call against a drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Property),
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    /// Rotation in radians.
    Rotate(f64),
    Scale { x: f64, y: f64 },
    /// Multiply the current transform by `[a, b, c, d, e, f]`.
    Transform([f64; 6]),
    /// Replace the current transform with `[a, b, c, d, e, f]`.
    SetTransform([f64; 6]),
    ResetTransform,
    BeginPath,
    ClosePath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// `cp1x, cp1y, cp2x, cp2y, x, y`.
    BezierCurveTo([f64; 6]),
    /// `cpx, cpy, x, y`.
    QuadraticCurveTo([f64; 4]),
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool },
    ArcTo { x1: f64, y1: f64, x2: f64, y2: f64, radius: f64 },
    Ellipse {
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    Rect(Rect),
    Fill(FillRule),
    Stroke,
    Clip(FillRule),
    FillRect(Rect),
    StrokeRect(Rect),
    ClearRect(Rect),
    FillText { text: String, x: f64, y: f64, max_width: Option<f64> },
    StrokeText { text: String, x: f64, y: f64, max_width: Option<f64> },
    SetLineDash(Vec<f64>),
}

/// What an op decodes into.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// A plain surface call.
    Draw(Command),
    /// Stamp a template once per instance row.
    Instances(InstanceBatch),
}

impl Directive {
    /// Decode a wire op.
    ///
    /// # Errors
    ///
    /// Returns [`OpError`] for an unknown op or property name, or for
    /// arguments that do not fit the command.
    pub fn decode(op: &Op) -> Result<Self, OpError> {
        op.check_shape()?;
        match op.name.as_str() {
            INSTANCES_OP => InstanceBatch::decode(&op.args).map(Self::Instances),
            _ => Command::decode(op).map(Self::Draw),
        }
    }
}

impl Command {
    /// Decode a wire op into a surface command.
    ///
    /// # Errors
    ///
    /// Returns [`OpError`] for an unknown name or malformed arguments.
    pub fn decode(op: &Op) -> Result<Self, OpError> {
        op.check_shape()?;
        let a = Args::new(&op.name, &op.args);
        let command = match op.name.as_str() {
            SET_OP => Self::Set(decode_property(&a)?),
            "save" => Self::Save,
            "restore" => Self::Restore,
            "translate" => Self::Translate { x: a.num(0)?, y: a.num(1)? },
            "rotate" => Self::Rotate(a.num(0)?),
            "scale" => Self::Scale { x: a.num(0)?, y: a.num(1)? },
            "transform" => Self::Transform(a.nums()?),
            "setTransform" => Self::SetTransform(a.nums()?),
            "resetTransform" => Self::ResetTransform,
            "beginPath" => Self::BeginPath,
            "closePath" => Self::ClosePath,
            "moveTo" => Self::MoveTo { x: a.num(0)?, y: a.num(1)? },
            "lineTo" => Self::LineTo { x: a.num(0)?, y: a.num(1)? },
            "bezierCurveTo" => Self::BezierCurveTo(a.nums()?),
            "quadraticCurveTo" => Self::QuadraticCurveTo(a.nums()?),
            "arc" => Self::Arc {
                x: a.num(0)?,
                y: a.num(1)?,
                radius: a.num(2)?,
                start: a.num(3)?,
                end: a.num(4)?,
                anticlockwise: a.opt_bool(5)?.unwrap_or(false),
            },
            "arcTo" => Self::ArcTo {
                x1: a.num(0)?,
                y1: a.num(1)?,
                x2: a.num(2)?,
                y2: a.num(3)?,
                radius: a.num(4)?,
            },
            "ellipse" => Self::Ellipse {
                x: a.num(0)?,
                y: a.num(1)?,
                radius_x: a.num(2)?,
                radius_y: a.num(3)?,
                rotation: a.num(4)?,
                start: a.num(5)?,
                end: a.num(6)?,
                anticlockwise: a.opt_bool(7)?.unwrap_or(false),
            },
            "rect" => Self::Rect(a.rect()?),
            "fill" => Self::Fill(a.fill_rule(0)?),
            "stroke" => Self::Stroke,
            "clip" => Self::Clip(a.fill_rule(0)?),
            "fillRect" => Self::FillRect(a.rect()?),
            "strokeRect" => Self::StrokeRect(a.rect()?),
            "clearRect" => Self::ClearRect(a.rect()?),
            "fillText" => Self::FillText {
                text: a.text(0)?,
                x: a.num(1)?,
                y: a.num(2)?,
                max_width: a.opt_num(3)?,
            },
            "strokeText" => Self::StrokeText {
                text: a.text(0)?,
                x: a.num(1)?,
                y: a.num(2)?,
                max_width: a.opt_num(3)?,
            },
            "setLineDash" => Self::SetLineDash(a.num_list(0)?),
            other => return Err(OpError::UnknownOp(other.to_owned())),
        };
        Ok(command)
    }
}

fn decode_property(a: &Args<'_>) -> Result<Property, OpError> {
    let name = a.string(0)?;
    let property = match name {
        "fillStyle" => Property::FillStyle(a.string(1)?.to_owned()),
        "strokeStyle" => Property::StrokeStyle(a.string(1)?.to_owned()),
        "lineWidth" => Property::LineWidth(a.coerced_num(1)?),
        "lineCap" => Property::LineCap(a.string(1)?.to_owned()),
        "lineJoin" => Property::LineJoin(a.string(1)?.to_owned()),
        "miterLimit" => Property::MiterLimit(a.coerced_num(1)?),
        "lineDashOffset" => Property::LineDashOffset(a.coerced_num(1)?),
        "font" => Property::Font(a.string(1)?.to_owned()),
        "textAlign" => Property::TextAlign(a.string(1)?.to_owned()),
        "textBaseline" => Property::TextBaseline(a.string(1)?.to_owned()),
        "globalAlpha" => Property::GlobalAlpha(a.coerced_num(1)?),
        "globalCompositeOperation" => Property::GlobalCompositeOperation(a.string(1)?.to_owned()),
        "shadowBlur" => Property::ShadowBlur(a.coerced_num(1)?),
        "shadowColor" => Property::ShadowColor(a.string(1)?.to_owned()),
        "shadowOffsetX" => Property::ShadowOffsetX(a.coerced_num(1)?),
        "shadowOffsetY" => Property::ShadowOffsetY(a.coerced_num(1)?),
        "imageSmoothingEnabled" => Property::ImageSmoothingEnabled(a.bool(1)?),
        "filter" => Property::Filter(a.string(1)?.to_owned()),
        other => return Err(OpError::UnknownProperty(other.to_owned())),
    };
    Ok(property)
}

/// Positional argument reader that reports failures against the op name.
struct Args<'a> {
    op: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(op: &'a str, values: &'a [Value]) -> Self {
        Self { op, values }
    }

    fn bad(&self, reason: impl Into<String>) -> OpError {
        OpError::BadArgs { op: self.op.to_owned(), reason: reason.into() }
    }

    fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).filter(|v| !v.is_null())
    }

    fn num(&self, index: usize) -> Result<f64, OpError> {
        self.opt_num(index)?
            .ok_or_else(|| self.bad(format!("missing number at {index}")))
    }

    fn opt_num(&self, index: usize) -> Result<Option<f64>, OpError> {
        match self.get(index) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.bad(format!("expected number at {index}, got {v}"))),
        }
    }

    /// Numeric property values also accept numeric strings, as the canvas
    /// coerces them on assignment.
    fn coerced_num(&self, index: usize) -> Result<f64, OpError> {
        match self.get(index) {
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(self.bad(format!("expected number at {index}, got {s:?}"))),
            },
            _ => self.num(index),
        }
    }

    fn nums<const N: usize>(&self) -> Result<[f64; N], OpError> {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.num(i)?;
        }
        Ok(out)
    }

    fn num_list(&self, index: usize) -> Result<Vec<f64>, OpError> {
        let Some(Value::Array(items)) = self.get(index) else {
            return Err(self.bad(format!("expected number list at {index}")));
        };
        items
            .iter()
            .map(|v| v.as_f64().ok_or_else(|| self.bad(format!("non-numeric dash segment {v}"))))
            .collect()
    }

    fn string(&self, index: usize) -> Result<&'a str, OpError> {
        self.get(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.bad(format!("expected string at {index}")))
    }

    /// Text arguments accept any scalar, the way the canvas stringifies them.
    fn text(&self, index: usize) -> Result<String, OpError> {
        match self.get(index) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
            _ => Err(self.bad(format!("expected text at {index}"))),
        }
    }

    fn bool(&self, index: usize) -> Result<bool, OpError> {
        self.opt_bool(index)?
            .ok_or_else(|| self.bad(format!("missing boolean at {index}")))
    }

    fn opt_bool(&self, index: usize) -> Result<Option<bool>, OpError> {
        match self.get(index) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.bad(format!("expected boolean at {index}, got {v}"))),
        }
    }

    fn rect(&self) -> Result<Rect, OpError> {
        let [x, y, width, height] = self.nums()?;
        Ok(Rect { x, y, width, height })
    }

    fn fill_rule(&self, index: usize) -> Result<FillRule, OpError> {
        match self.get(index) {
            None => Ok(FillRule::NonZero),
            Some(v) => match v.as_str() {
                Some("nonzero") => Ok(FillRule::NonZero),
                Some("evenodd") => Ok(FillRule::EvenOdd),
                _ => Err(self.bad(format!("unknown fill rule {v}"))),
            },
        }
    }
}
