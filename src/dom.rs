//! Small DOM helpers shared by startup wiring.

use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attach a leaked click handler to the element with `element_id`, if it
/// exists. Missing elements are ignored; the toggle is optional markup.
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    let Some(el) = document.get_element_by_id(element_id) else {
        return;
    };
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Match the canvas backing store to its CSS size times devicePixelRatio,
/// so the field renders at native resolution on high-dpi screens.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    let dpr = window.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    canvas.set_width(((rect.width() * dpr) as u32).max(1));
    canvas.set_height(((rect.height() * dpr) as u32).max(1));
}
