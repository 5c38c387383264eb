use serde_json::json;

use super::*;
use crate::command::{Command, FillRule, Property, Rect};
use crate::surface::RecordingSurface;

// =============================================================
// Helpers
// =============================================================

fn ops(value: serde_json::Value) -> Vec<Op> {
    serde_json::from_value(value).unwrap()
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect { x, y, width, height }
}

// =============================================================
// Ordering and isolation
// =============================================================

#[test]
fn applies_ops_in_order() {
    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([
            ["set", ["fillStyle", "red"]],
            ["fillRect", [0, 0, 10, 10]],
            ["strokeRect", [1, 1, 8, 8]],
        ])),
    );

    assert_eq!(report, Report { applied: 3, skipped: 0 });
    assert_eq!(
        surface.commands,
        vec![
            Command::Set(Property::FillStyle("red".into())),
            Command::FillRect(rect(0.0, 0.0, 10.0, 10.0)),
            Command::StrokeRect(rect(1.0, 1.0, 8.0, 8.0)),
        ]
    );
}

#[test]
fn unknown_op_does_not_stop_the_list() {
    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([
            ["beginPath", []],
            ["drawTeapot", [1, 2, 3]],
            ["moveTo", [0, 0]],
            ["lineTo", [5, 5]],
        ])),
    );

    assert_eq!(report, Report { applied: 3, skipped: 1 });
    assert_eq!(
        surface.commands,
        vec![Command::BeginPath, Command::MoveTo { x: 0.0, y: 0.0 }, Command::LineTo { x: 5.0, y: 5.0 }]
    );
}

#[test]
fn malformed_args_do_not_stop_the_list() {
    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([
            ["fillRect", ["wide", 0, 1, 1]],
            ["set", ["lineWidth", 2]],
            ["set", ["notAProperty", 2]],
            ["stroke", []],
        ])),
    );

    assert_eq!(report, Report { applied: 2, skipped: 2 });
    assert_eq!(surface.commands, vec![Command::Set(Property::LineWidth(2.0)), Command::Stroke]);
}

#[test]
fn malformed_pairs_do_not_stop_the_list() {
    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([
            ["save", []],
            ["fillRect", 5],
            ["translate", [1, 2]],
            [7, []],
            ["stroke", []],
            ["save", [], "x"],
            ["restore", []],
        ])),
    );

    assert_eq!(report, Report { applied: 4, skipped: 3 });
    assert_eq!(
        surface.commands,
        vec![Command::Save, Command::Translate { x: 1.0, y: 2.0 }, Command::Stroke, Command::Restore]
    );
}

#[test]
fn failing_call_does_not_stop_the_list() {
    let mut surface = RecordingSurface::failing_on(Command::Rotate(1.0));
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([["save", []], ["rotate", [1]], ["fill", []], ["restore", []]])),
    );

    assert_eq!(report, Report { applied: 3, skipped: 1 });
    assert_eq!(surface.commands, vec![Command::Save, Command::Fill(FillRule::NonZero), Command::Restore]);
}

#[test]
fn empty_list_does_nothing() {
    let mut surface = RecordingSurface::new();
    let report = execute(&mut surface, &Templates::new(), &[]);
    assert_eq!(report, Report::default());
    assert!(surface.commands.is_empty());
}

// =============================================================
// Instances
// =============================================================

#[test]
fn unknown_template_draws_nothing_and_continues() {
    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([
            ["__instances", ["ghost", [[1, 2], [3, 4]]]],
            ["fillRect", [0, 0, 1, 1]],
        ])),
    );

    assert_eq!(report, Report { applied: 1, skipped: 1 });
    assert_eq!(surface.commands, vec![Command::FillRect(rect(0.0, 0.0, 1.0, 1.0))]);
}

#[test]
fn instances_replay_template_per_row() {
    let mut templates = Templates::new();
    templates.insert("dot", ops(json!([["fillRect", [0, 0, 1, 1]]])));

    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &templates,
        &ops(json!([["__instances", ["dot", [[10, 20], [30, 40]]]]])),
    );

    assert_eq!(report, Report { applied: 3, skipped: 0 });
    assert_eq!(
        surface.commands,
        vec![
            Command::Save,
            Command::Translate { x: 10.0, y: 20.0 },
            Command::FillRect(rect(0.0, 0.0, 1.0, 1.0)),
            Command::Restore,
            Command::Save,
            Command::Translate { x: 30.0, y: 40.0 },
            Command::FillRect(rect(0.0, 0.0, 1.0, 1.0)),
            Command::Restore,
        ]
    );
}

#[test]
fn malformed_instances_directive_is_skipped() {
    let mut surface = RecordingSurface::new();
    let report = execute(
        &mut surface,
        &Templates::new(),
        &ops(json!([["__instances", [42]], ["stroke", []]])),
    );

    assert_eq!(report, Report { applied: 1, skipped: 1 });
    assert_eq!(surface.commands, vec![Command::Stroke]);
}

#[test]
fn self_referencing_template_is_expanded_once() {
    let mut templates = Templates::new();
    templates.insert(
        "loop",
        ops(json!([["fill", []], ["__instances", ["loop", [[1, 1], [2, 2], [3, 3]]]]])),
    );

    let mut surface = RecordingSurface::new();
    let report = execute(&mut surface, &templates, &ops(json!([["__instances", ["loop", [[0, 0], [5, 5]]]]])));

    assert_eq!(report, Report { applied: 3, skipped: 2 });
    let saves = surface.commands.iter().filter(|c| **c == Command::Save).count();
    let restores = surface.commands.iter().filter(|c| **c == Command::Restore).count();
    assert_eq!(saves, 2);
    assert_eq!(saves, restores);
}

#[test]
fn mutually_recursive_templates_stop_at_the_cycle() {
    let mut templates = Templates::new();
    templates.insert("a", ops(json!([["__instances", ["b", [[1, 1]]]]])));
    templates.insert("b", ops(json!([["fill", []], ["__instances", ["a", [[1, 1]]]]])));

    let mut surface = RecordingSurface::new();
    let report = execute(&mut surface, &templates, &ops(json!([["__instances", ["a", [[0, 0]]]]])));

    assert_eq!(report, Report { applied: 3, skipped: 1 });
    assert_eq!(surface.drawing(), vec![
        Command::Translate { x: 0.0, y: 0.0 },
        Command::Translate { x: 1.0, y: 1.0 },
        Command::Fill(FillRule::NonZero),
    ]);
}

#[test]
fn nesting_stops_at_depth_limit() {
    let depth = crate::consts::MAX_TEMPLATE_DEPTH;
    let mut templates = Templates::new();
    for level in 0..=depth {
        let next = format!("t{}", level + 1);
        templates.insert(format!("t{level}"), ops(json!([["__instances", [next, [[0, 0]]]]])));
    }

    let mut surface = RecordingSurface::new();
    let report = execute(&mut surface, &templates, &ops(json!([["__instances", ["t0", [[0, 0]]]]])));

    assert_eq!(report.skipped, 1);
    let saves = surface.commands.iter().filter(|c| **c == Command::Save).count();
    assert_eq!(saves, depth);
}

// =============================================================
// Report
// =============================================================

#[test]
fn report_add_assign() {
    let mut a = Report { applied: 1, skipped: 2 };
    a += Report { applied: 3, skipped: 4 };
    assert_eq!(a, Report { applied: 4, skipped: 6 });
}
