use glam::Vec2;
use pleat_core::pointer_from_pixels;

/// Canvas-relative pointer position from client coordinates and the canvas'
/// bounding rect, in `[-1, 1]²` with Y up.
#[inline]
pub fn pointer_from_client(client_x: f32, client_y: f32, rect: [f32; 4]) -> Vec2 {
    let [left, top, width, height] = rect;
    pointer_from_pixels(client_x - left, client_y - top, width, height)
}
