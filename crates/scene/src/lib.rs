//! Scene: camera, lights, the single model slot and the caption panel, plus
//! the [`Viewer`] controller that owns interaction state and applies actions.
//!
//! # Invariants
//! - The viewer is the only mutator of scene and interaction state.
//! - The model is only moved or rotated while it is loaded.
//! - A failed model load leaves the scene renderable.

pub mod config;
pub mod scene;
pub mod viewer;

pub use config::{ConfigError, ViewerConfig};
pub use scene::{
    CameraRig, CaptionPanel, CaptionPlacement, Light, LightKind, MODEL_PLACEMENT, ModelSlot, Scene,
};
pub use viewer::Viewer;

pub fn crate_info() -> &'static str {
    "earthview-scene v0.1.0"
}
