use web_sys as web;

/// Client rect of the canvas in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CssRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Maps a client-space point to canvas backing-store pixels, clamped to the
/// canvas. `None` while the canvas has no layout size.
#[inline]
pub fn client_to_canvas_px(client: [f32; 2], rect: CssRect, backing: [u32; 2]) -> Option<[f32; 2]> {
    if rect.width <= 0.0 || rect.height <= 0.0 || backing[0] == 0 || backing[1] == 0 {
        return None;
    }
    let u = ((client[0] - rect.left) / rect.width).clamp(0.0, 1.0);
    let v = ((client[1] - rect.top) / rect.height).clamp(0.0, 1.0);
    Some([u * backing[0] as f32, v * backing[1] as f32])
}

/// Backing-store size for a CSS box, scaled by the (capped) pixel ratio and
/// shrunk proportionally so neither edge exceeds `max_edge`.
pub fn backing_size(css_w: f64, css_h: f64, pixel_ratio: f64, max_ratio: f64, max_edge: u32) -> [u32; 2] {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio.min(max_ratio)
    } else {
        1.0
    };
    let mut w = (css_w.max(0.0) * ratio).floor();
    let mut h = (css_h.max(0.0) * ratio).floor();
    let longest = w.max(h);
    if longest > max_edge as f64 {
        let shrink = max_edge as f64 / longest;
        w = (w * shrink).floor();
        h = (h * shrink).floor();
    }
    [w as u32, h as u32]
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Option<[f32; 2]> {
    let r = canvas.get_bounding_client_rect();
    let rect = CssRect {
        left: r.left() as f32,
        top: r.top() as f32,
        width: r.width() as f32,
        height: r.height() as f32,
    };
    client_to_canvas_px(
        [ev.client_x() as f32, ev.client_y() as f32],
        rect,
        [canvas.width(), canvas.height()],
    )
}
