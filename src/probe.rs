//! One-shot device capability probe.
//!
//! Reads the user agent, logical core count, and the WebGL renderer string
//! to classify the device into a tier. Never fails: missing APIs fall back
//! to conservative defaults, and a failed context creation is read as a
//! low-end GPU so quality only ever errs downward.

use crate::core::{DeviceCapability, DEFAULT_CPU_CORES};
use wasm_bindgen::JsCast;
use web_sys as web;

const MOBILE_UA_TOKENS: [&str; 5] = ["mobile", "tablet", "android", "iphone", "ipad"];
const LOW_END_RENDERERS: [&str; 3] = ["intel hd", "intel(r) hd", "mali-4"];

// WEBGL_debug_renderer_info constant; queried through the extension object
// when available, with this value as the documented fallback.
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

pub fn probe(window: &web::Window) -> DeviceCapability {
    let navigator = window.navigator();

    let ua = navigator.user_agent().unwrap_or_default().to_lowercase();
    let is_mobile = MOBILE_UA_TOKENS.iter().any(|t| ua.contains(t));

    let cores = navigator.hardware_concurrency();
    let cpu_cores = if cores >= 1.0 {
        cores as u32
    } else {
        DEFAULT_CPU_CORES
    };

    let low_end_gpu = gpu_flagged_low_end(window);

    let cap = DeviceCapability::classify(is_mobile, cpu_cores, low_end_gpu);
    log::info!(
        "[probe] mobile={} cores={} low_end_gpu={} tier={:?}",
        cap.is_mobile,
        cap.cpu_cores,
        cap.low_end_gpu,
        cap.tier
    );
    cap
}

fn gpu_flagged_low_end(window: &web::Window) -> bool {
    let Some(gl) = webgl_context(window) else {
        // No context at all: assume low-end rather than guessing high.
        return true;
    };
    match renderer_string(&gl) {
        Some(renderer) => {
            let renderer = renderer.to_lowercase();
            LOW_END_RENDERERS.iter().any(|t| renderer.contains(t))
        }
        // Context exists but the debug extension is unavailable; leave the
        // GPU unflagged and let cores/UA decide.
        None => false,
    }
}

fn webgl_context(window: &web::Window) -> Option<web::WebGlRenderingContext> {
    let document = window.document()?;
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<web::HtmlCanvasElement>()
        .ok()?;
    canvas
        .get_context("webgl")
        .ok()
        .flatten()?
        .dyn_into::<web::WebGlRenderingContext>()
        .ok()
}

fn renderer_string(gl: &web::WebGlRenderingContext) -> Option<String> {
    let ext = gl.get_extension("WEBGL_debug_renderer_info").ok().flatten()?;
    let pname = js_sys::Reflect::get(&ext, &"UNMASKED_RENDERER_WEBGL".into())
        .ok()
        .and_then(|v| v.as_f64())
        .map(|v| v as u32)
        .unwrap_or(UNMASKED_RENDERER_WEBGL);
    gl.get_parameter(pname).ok()?.as_string()
}
