//! Browser binding for the avatar canvas widget.
//!
//! Wraps an existing `<canvas>` element: pointer drag pans, the wheel and an
//! optional range input zoom, and the visible region can be exported.

mod avatar;
mod canvas_utils;
mod file_picker;
mod image_loader;
mod listeners;
mod slider;
mod surface;

pub use avatar::AvatarCanvas;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);
}
