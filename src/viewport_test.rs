#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn new_viewport_has_unit_ratio() {
    let v = Viewport::new(100.0, 50.0);
    assert_eq!(v.dpr, 1.0);
    assert_eq!(v.backing_size(), (100, 50));
}

#[test]
fn ratio_two_doubles_the_buffer() {
    let mut v = Viewport::new(100.0, 50.0);
    let resize = v.sync(2.0, (100, 50));
    assert_eq!(
        resize,
        Some(Resize { width: 200, height: 100, css_width: "100px".into(), css_height: "50px".into() })
    );
    assert_eq!(v.backing_size(), (200, 100));
}

#[test]
fn no_resize_when_buffer_already_matches() {
    let mut v = Viewport::new(100.0, 50.0);
    assert_eq!(v.sync(2.0, (200, 100)), None);
    assert_eq!(v.dpr, 2.0);
}

#[test]
fn unit_ratio_on_fresh_canvas_needs_no_resize() {
    let mut v = Viewport::new(300.0, 150.0);
    assert_eq!(v.sync(1.0, (300, 150)), None);
}

#[test]
fn fractional_ratio_rounds_buffer() {
    let mut v = Viewport::new(101.0, 33.0);
    let resize = v.sync(1.5, (101, 33));
    assert_eq!(resize.map(|r| (r.width, r.height)), Some((152, 50)));
}

#[test]
fn invalid_ratio_falls_back_to_one() {
    let mut v = Viewport::new(10.0, 10.0);
    assert_eq!(v.sync(f64::NAN, (10, 10)), None);
    assert_eq!(v.dpr, 1.0);
    assert_eq!(v.sync(0.0, (10, 10)), None);
    assert_eq!(v.dpr, 1.0);
}

#[test]
fn transform_scales_by_ratio() {
    let mut v = Viewport::new(10.0, 10.0);
    v.sync(3.0, (0, 0));
    assert_eq!(v.transform(), [3.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
}
