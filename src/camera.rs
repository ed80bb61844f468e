// Picking-ray construction for the fixed +Z camera.
//
// Pure math over the viewport size; callers pass the canvas backing-store
// dimensions in, so the ray path can be exercised without a DOM.

use crate::constants::{CAMERA_FOV_Y, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// World-space ray through the backing-store pixel `px` of a
/// `viewport`-sized canvas. Returns `(origin, direction)` with `direction`
/// normalized. The camera is the app's fixed look-at from `CAMERA_Z` on the
/// +Z axis, so the origin is always the eye point.
pub fn screen_to_world_ray(px: Vec2, viewport: Vec2) -> (Vec3, Vec3) {
    let viewport = viewport.max(Vec2::ONE);
    let ndc = Vec2::new(
        2.0 * px.x / viewport.x - 1.0,
        1.0 - 2.0 * px.y / viewport.y,
    );

    let proj = Mat4::perspective_rh(
        CAMERA_FOV_Y,
        viewport.x / viewport.y,
        CAMERA_ZNEAR,
        CAMERA_ZFAR,
    );
    let eye = Vec3::Z * CAMERA_Z;
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let clip_to_world = (proj * view).inverse();

    // Unproject a far-plane point; the eye itself is the ray origin.
    let far = clip_to_world * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let far = far.truncate() / far.w;
    (eye, (far - eye).normalize())
}
