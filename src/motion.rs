//! Reduced-motion preference.
//!
//! The system `prefers-reduced-motion` media query is honored unless the
//! user has persisted an explicit override via the motion toggle. The
//! stored flag is the only piece of persisted state in the app.

use crate::constants::MOTION_STORAGE_KEY;
use web_sys as web;

pub fn reduced_motion(window: &web::Window) -> bool {
    if let Some(stored) = stored_override(window) {
        return stored;
    }
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

pub fn stored_override(window: &web::Window) -> Option<bool> {
    let storage = window.local_storage().ok().flatten()?;
    match storage.get_item(MOTION_STORAGE_KEY).ok().flatten()?.as_str() {
        "reduced" => Some(true),
        "full" => Some(false),
        _ => None,
    }
}

pub fn store_override(window: &web::Window, reduced: bool) {
    if let Some(storage) = window.local_storage().ok().flatten() {
        let value = if reduced { "reduced" } else { "full" };
        _ = storage.set_item(MOTION_STORAGE_KEY, value);
    }
}
