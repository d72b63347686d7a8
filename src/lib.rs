//! robot-viewer
//!
//! Two procedurally assembled robots, a metal one and a cardboard one, shown
//! in a small lit scene with a camera driven by four sliders. Runs natively
//! and in the browser (WebGL2).
//!
//! High-level modules
//! - `robots`: pure builders turning dimension records into node trees
//! - `data_structures`: scene graph, shapes, materials and vertex data
//! - `camera`: perspective camera, its live parameters and GPU uniform
//! - `scene`: scene contents and the [`scene::Viewer`] with its render function
//! - `panel`: numeric parameter panel bound to the viewer
//! - `render`: the renderer seam and its wgpu implementation
//! - `context`: device, queue and window or offscreen target
//! - `pipelines`: wgpu pipelines and shaders
//! - `config`: start-up configuration
//! - `flow`: the winit event loop
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod panel;
pub mod pipelines;
pub mod render;
pub mod robots;
pub mod scene;

pub use config::ViewerConfig;
pub use robots::RobotKind;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::run(ViewerConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
