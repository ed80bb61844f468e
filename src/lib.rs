#![cfg(target_arch = "wasm32")]
//! Animated neural-network particle background.
//!
//! A point field scattered over a spherical shell, sparsely connected,
//! slowly rotating, attracted toward the pointer, and rippled by
//! click-triggered pulses. Rendering is WebGPU with a bloom/vignette post
//! chain that sheds stages as the device struggles.

use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod constants;
mod core;
mod dom;
mod events;
mod fps;
mod frame;
mod input;
mod motion;
mod probe;
mod render;

use crate::core::{DegradationController, FieldEngine};
use constants::{CANVAS_ID, MOTION_TOGGLE_ID};

// Maintain canvas internal pixel size to match CSS size * devicePixelRatio
fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_motion_toggle(engine: Rc<RefCell<FieldEngine>>) {
    if let Some(doc) = dom::window_document() {
        dom::add_click_listener(&doc, MOTION_TOGGLE_ID, move || {
            let mut e = engine.borrow_mut();
            let reduced = !e.reduced_motion();
            e.set_reduced_motion(reduced);
            if let Some(w) = web::window() {
                motion::store_override(&w, reduced);
            }
            log::info!("[motion] reduced={}", reduced);
        });
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("synaptic starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    wire_canvas_resize(&canvas);

    // One-shot capability probe decides the starting quality level; the
    // frame-rate monitor can only walk it further down from there.
    let reduced = motion::reduced_motion(&window);
    let cap = probe::probe(&window);
    let perf = DegradationController::for_tier(cap.tier);
    let level = perf.level();

    let seed = js_sys::Date::now() as u64;
    let mut engine = FieldEngine::new(
        level.particle_count as usize,
        level.connection_budget() as usize,
        seed,
    );
    engine.set_reduced_motion(reduced);
    log::info!(
        "[field] {} points, {} connections, level {}, reduced_motion={}",
        engine.point_count(),
        engine.connections().len(),
        level.level,
        reduced
    );
    let engine = Rc::new(RefCell::new(engine));

    // GPU buffers are sized for the starting level; degradation only ever
    // shrinks the counts.
    let mut gpu = frame::init_gpu(
        &canvas,
        level,
        level.particle_count,
        level.connection_budget() * 2,
    )
    .await;
    if let Some(g) = gpu.as_mut() {
        g.upload_lines(&engine.borrow().line_positions());
    }

    let mouse_state = Rc::new(RefCell::new(input::MouseState::default()));
    let session_start = Instant::now();

    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        engine: engine.clone(),
        mouse_state: mouse_state.clone(),
        session_start,
    });
    wire_motion_toggle(engine.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        engine,
        perf,
        monitor: fps::FrameRateMonitor::new(),
        canvas,
        mouse: mouse_state,
        gpu,
        start: session_start,
        last_instant: session_start,
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}
