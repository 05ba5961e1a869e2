//! wgpu render backend for the viewer.
//!
//! Draws the loaded model mesh, textured by its base color images and lit by
//! the scene's ambient and directional lights, with 4x multisampling. The
//! camera is the scene's fixed perspective rig.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - A scene without a loaded model renders as a cleared frame.

mod gpu;
mod lighting;
mod shaders;

pub use gpu::WgpuRenderer;
pub use lighting::{LightUniforms, MAX_DIRECTIONAL_LIGHTS};
