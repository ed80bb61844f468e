use crate::camera;
use crate::constants::PULSE_PICK_RADIUS;
use crate::core::FieldEngine;
use crate::input;
use glam::{Mat3, Vec2, Vec3};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub engine: Rc<RefCell<FieldEngine>>,
    pub mouse_state: Rc<RefCell<input::MouseState>>,
    pub session_start: Instant,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let mut ms = w.mouse_state.borrow_mut();
        ms.x = pos.x;
        ms.y = pos.y;
        ms.moved = true;
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let viewport = Vec2::new(w.canvas.width() as f32, w.canvas.height() as f32);
        let (ro, rd) = camera::screen_to_world_ray(pos, viewport);

        // Cast onto the mid-shell sphere; clicks that miss the field do
        // nothing.
        if let Some(t) = input::ray_sphere(ro, rd, Vec3::ZERO, PULSE_PICK_RADIUS) {
            let hit_world = ro + rd * t;
            let mut engine = w.engine.borrow_mut();
            // Undo the field rotation so the origin lives in the same space
            // as the point buffers the shaders measure against.
            let hit_local = Mat3::from_rotation_y(-engine.rotation_y()) * hit_world;
            let now = w.session_start.elapsed().as_secs_f32();
            engine.trigger_pulse(hit_local, now);
            log::info!(
                "[click] pulse at ({:.2},{:.2},{:.2})",
                hit_local.x,
                hit_local.y,
                hit_local.z
            );
        }
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}
