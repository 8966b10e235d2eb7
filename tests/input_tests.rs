// Host-side tests for pure pointer and canvas-size helpers.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

fn rect() -> CssRect {
    CssRect {
        left: 100.0,
        top: 50.0,
        width: 400.0,
        height: 200.0,
    }
}

#[test]
fn client_point_maps_to_backing_pixels() {
    let px = client_to_canvas_px([300.0, 150.0], rect(), [800, 400]).unwrap();
    assert_eq!(px, [400.0, 200.0]);
    let corner = client_to_canvas_px([100.0, 50.0], rect(), [800, 400]).unwrap();
    assert_eq!(corner, [0.0, 0.0]);
}

#[test]
fn points_outside_the_canvas_are_clamped() {
    let px = client_to_canvas_px([-20.0, 900.0], rect(), [800, 400]).unwrap();
    assert_eq!(px, [0.0, 400.0]);
}

#[test]
fn unlaid_out_canvas_has_no_pointer_position() {
    let empty = CssRect::default();
    assert!(client_to_canvas_px([10.0, 10.0], empty, [800, 400]).is_none());
    assert!(client_to_canvas_px([300.0, 150.0], rect(), [0, 400]).is_none());
}

#[test]
fn backing_size_caps_pixel_ratio() {
    assert_eq!(backing_size(640.0, 360.0, 2.0, 1.0, 4096), [640, 360]);
    assert_eq!(backing_size(640.0, 360.0, 1.5, 2.0, 4096), [960, 540]);
    assert_eq!(backing_size(640.0, 360.0, f64::NAN, 2.0, 4096), [640, 360]);
}

#[test]
fn backing_size_keeps_aspect_under_edge_limit() {
    let [w, h] = backing_size(2560.0, 1440.0, 1.0, 1.0, 1280);
    assert_eq!(w, 1280);
    assert_eq!(h, 720);
}

#[test]
fn zero_css_size_gives_zero_backing() {
    assert_eq!(backing_size(0.0, 300.0, 1.0, 1.0, 1280), [0, 300]);
    assert_eq!(backing_size(-5.0, -5.0, 1.0, 1.0, 1280), [0, 0]);
}
