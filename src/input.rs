use glam::{Vec2, Vec3};
use web_sys as web;

// Pointer NDC is mapped to this many world units on the field's XY plane.
pub const POINTER_WORLD_SCALE: f32 = 2.0;

#[derive(Default, Clone, Copy)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    /// False until the first pointermove; no attraction before then.
    pub moved: bool,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width() as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height() as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

/// Pointer position in NDC (-1..1, +y up).
#[inline]
pub fn mouse_ndc(canvas: &web::HtmlCanvasElement, mouse: &MouseState) -> Vec2 {
    let w = canvas.width().max(1) as f32;
    let h = canvas.height().max(1) as f32;
    Vec2::new((mouse.x / w) * 2.0 - 1.0, 1.0 - (mouse.y / h) * 2.0)
}

/// World-space attraction target on the field's XY plane, or None before
/// the pointer has moved.
#[inline]
pub fn pointer_world_target(canvas: &web::HtmlCanvasElement, mouse: &MouseState) -> Option<Vec2> {
    mouse
        .moved
        .then(|| mouse_ndc(canvas, mouse) * POINTER_WORLD_SCALE)
}
