use crate::core::{DegradationController, FieldEngine, PerformanceLevel};
use crate::fps::FrameRateMonitor;
use crate::input;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub engine: Rc<RefCell<FieldEngine>>,
    pub perf: DegradationController,
    pub monitor: FrameRateMonitor,

    pub canvas: web::HtmlCanvasElement,
    pub mouse: Rc<RefCell<input::MouseState>>,

    pub gpu: Option<render::GpuState<'a>>,

    pub start: Instant,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let t = (now - self.start).as_secs_f32();

        // Sustained low fps steps the quality ladder down one level; the
        // field is rebuilt at the smaller particle budget. Once the ladder
        // saturates the trigger no longer changes the level, and rebuilding
        // anyway would visibly re-scatter the field, so skip it.
        if self.monitor.sample(t, dt_sec) {
            let before = self.perf.level();
            let level = self.perf.degrade();
            if level != before {
                let mut engine = self.engine.borrow_mut();
                engine.regenerate(
                    level.particle_count as usize,
                    level.connection_budget() as usize,
                );
                if let Some(g) = &mut self.gpu {
                    g.apply_performance(level);
                    g.upload_lines(&engine.line_positions());
                }
            }
        }

        let pointer = {
            let ms = self.mouse.borrow();
            input::pointer_world_target(&self.canvas, &ms)
        };

        let mut engine = self.engine.borrow_mut();
        engine.tick(pointer, dt_sec, t);
        let pulses = engine.pulse_uniforms(t);

        // Reduced motion holds the shader clock still as well, so the node
        // shimmer freezes along with the simulation.
        let render_dt = if engine.reduced_motion() { 0.0 } else { dt_sec };

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(render_dt, engine.positions(), engine.rotation_y(), &pulses) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    perf: PerformanceLevel,
    max_nodes: u32,
    max_line_vertices: u32,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, perf, max_nodes, max_line_vertices).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
