#![allow(clippy::float_cmp)]

use serde_json::{Value, json};

use super::*;

fn decode(name: &str, args: Value) -> Result<Command, OpError> {
    let Value::Array(args) = args else {
        panic!("args must be an array");
    };
    Command::decode(&Op::new(name, args))
}

// --- Plain calls ---

#[test]
fn decodes_fill_rect() {
    assert_eq!(
        decode("fillRect", json!([1, 2, 3, 4])),
        Ok(Command::FillRect(Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 }))
    );
}

#[test]
fn decodes_no_arg_commands() {
    assert_eq!(decode("save", json!([])), Ok(Command::Save));
    assert_eq!(decode("restore", json!([])), Ok(Command::Restore));
    assert_eq!(decode("beginPath", json!([])), Ok(Command::BeginPath));
    assert_eq!(decode("stroke", json!([])), Ok(Command::Stroke));
    assert_eq!(decode("resetTransform", json!([])), Ok(Command::ResetTransform));
}

#[test]
fn decodes_transform_arrays() {
    assert_eq!(
        decode("setTransform", json!([2, 0, 0, 2, 0, 0])),
        Ok(Command::SetTransform([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]))
    );
    assert_eq!(
        decode("quadraticCurveTo", json!([1, 2, 3, 4])),
        Ok(Command::QuadraticCurveTo([1.0, 2.0, 3.0, 4.0]))
    );
}

#[test]
fn arc_anticlockwise_is_optional() {
    let Ok(Command::Arc { anticlockwise, radius, .. }) = decode("arc", json!([0, 0, 5, 0, 3.0])) else {
        panic!("expected arc");
    };
    assert!(!anticlockwise);
    assert_eq!(radius, 5.0);

    let Ok(Command::Arc { anticlockwise, .. }) = decode("arc", json!([0, 0, 5, 0, 3.0, true])) else {
        panic!("expected arc");
    };
    assert!(anticlockwise);
}

#[test]
fn ellipse_takes_seven_numbers() {
    assert!(matches!(
        decode("ellipse", json!([0, 0, 4, 2, 0, 0, 6.0])),
        Ok(Command::Ellipse { radius_x, radius_y, .. }) if radius_x == 4.0 && radius_y == 2.0
    ));
}

#[test]
fn fill_text_with_and_without_max_width() {
    assert_eq!(
        decode("fillText", json!(["hi", 1, 2])),
        Ok(Command::FillText { text: "hi".into(), x: 1.0, y: 2.0, max_width: None })
    );
    assert_eq!(
        decode("strokeText", json!(["hi", 1, 2, 50])),
        Ok(Command::StrokeText { text: "hi".into(), x: 1.0, y: 2.0, max_width: Some(50.0) })
    );
}

#[test]
fn fill_text_stringifies_numbers() {
    assert_eq!(
        decode("fillText", json!([42, 0, 0])),
        Ok(Command::FillText { text: "42".into(), x: 0.0, y: 0.0, max_width: None })
    );
}

#[test]
fn fill_rule_defaults_to_nonzero() {
    assert_eq!(decode("fill", json!([])), Ok(Command::Fill(FillRule::NonZero)));
    assert_eq!(decode("clip", json!(["evenodd"])), Ok(Command::Clip(FillRule::EvenOdd)));
    assert!(decode("fill", json!(["sideways"])).is_err());
}

#[test]
fn decodes_line_dash() {
    assert_eq!(decode("setLineDash", json!([[4, 2]])), Ok(Command::SetLineDash(vec![4.0, 2.0])));
    assert_eq!(decode("setLineDash", json!([[]])), Ok(Command::SetLineDash(vec![])));
}

// --- set ---

#[test]
fn set_string_property() {
    assert_eq!(
        decode("set", json!(["fillStyle", "#f00"])),
        Ok(Command::Set(Property::FillStyle("#f00".into())))
    );
}

#[test]
fn set_numeric_property() {
    assert_eq!(decode("set", json!(["lineWidth", 3])), Ok(Command::Set(Property::LineWidth(3.0))));
    assert_eq!(decode("set", json!(["globalAlpha", 0.5])), Ok(Command::Set(Property::GlobalAlpha(0.5))));
}

#[test]
fn set_bool_property() {
    assert_eq!(
        decode("set", json!(["imageSmoothingEnabled", false])),
        Ok(Command::Set(Property::ImageSmoothingEnabled(false)))
    );
}

#[test]
fn set_unknown_property() {
    let err = decode("set", json!(["wobble", 1])).unwrap_err();
    assert_eq!(err, OpError::UnknownProperty("wobble".into()));
    assert!(err.is_unknown());
}

#[test]
fn set_numeric_property_from_string() {
    assert_eq!(decode("set", json!(["lineWidth", "2"])), Ok(Command::Set(Property::LineWidth(2.0))));
    assert_eq!(decode("set", json!(["globalAlpha", " 0.25 "])), Ok(Command::Set(Property::GlobalAlpha(0.25))));
    assert!(decode("set", json!(["shadowBlur", "Infinity"])).is_err());
}

#[test]
fn set_wrong_value_type() {
    let err = decode("set", json!(["lineWidth", "thick"])).unwrap_err();
    assert!(matches!(err, OpError::BadArgs { ref op, .. } if op == "set"));
    assert!(!err.is_unknown());
}

// --- Errors ---

#[test]
fn malformed_pair_is_bad_args() {
    let op: Op = serde_json::from_value(json!(["stroke", 5])).unwrap();
    let err = Command::decode(&op).unwrap_err();
    assert!(matches!(err, OpError::BadArgs { ref op, .. } if op == "stroke"));
    assert!(Directive::decode(&op).is_err());
}

#[test]
fn unknown_op_name() {
    let err = decode("drawTeapot", json!([])).unwrap_err();
    assert_eq!(err, OpError::UnknownOp("drawTeapot".into()));
    assert!(err.is_unknown());
}

#[test]
fn missing_argument() {
    let err = decode("fillRect", json!([0, 0, 10])).unwrap_err();
    assert!(matches!(err, OpError::BadArgs { ref op, .. } if op == "fillRect"));
}

#[test]
fn null_argument_counts_as_missing() {
    assert!(decode("moveTo", json!([1, null])).is_err());
}

#[test]
fn non_numeric_argument() {
    assert!(decode("translate", json!(["left", 0])).is_err());
}

// --- Directive ---

#[test]
fn directive_routes_instances() {
    let op = Op::new("__instances", vec![json!("dot"), json!([[1, 2]])]);
    assert!(matches!(Directive::decode(&op), Ok(Directive::Instances(batch)) if batch.template == "dot"));
}

#[test]
fn directive_routes_draw_calls() {
    let op = Op::new("closePath", vec![]);
    assert_eq!(Directive::decode(&op), Ok(Directive::Draw(Command::ClosePath)));
}
