use earthview_scene::{CaptionPlacement, LightKind, ModelSlot, Scene};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and produces output. It never mutates the
/// scene; the viewer owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Produces a human-readable description of the scene.
///
/// Used by the CLI and in tests where no GPU is available.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let cam = &scene.camera;
        let _ = writeln!(out, "=== Scene (aspect={:.4}) ===", cam.aspect);
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0}",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.fov_y.to_degrees()
        );

        for light in &scene.lights {
            match light.kind {
                LightKind::Ambient => {
                    let _ = writeln!(out, "  light {} ambient x{:.1}", light.name, light.intensity);
                }
                LightKind::Directional { from } => {
                    let _ = writeln!(
                        out,
                        "  light {} from=({:.2}, {:.2}, {:.2}) x{:.1}",
                        light.name, from.x, from.y, from.z, light.intensity
                    );
                }
            }
        }

        match &scene.model {
            ModelSlot::Pending => out.push_str("Model: pending\n"),
            ModelSlot::Failed { reason } => {
                let _ = writeln!(out, "Model: failed ({reason})");
            }
            ModelSlot::Loaded {
                name,
                transform,
                orientation,
            } => {
                let p = transform.position;
                let _ = writeln!(
                    out,
                    "Model: {name} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}) scale={:.2}",
                    p.x,
                    p.y,
                    p.z,
                    orientation.rotation_x,
                    orientation.rotation_y,
                    transform.scale.x
                );
            }
        }

        let placement = match scene.caption.placement {
            CaptionPlacement::Hidden => "hidden",
            CaptionPlacement::Revealed => "revealed",
        };
        let _ = writeln!(
            out,
            "Caption: {placement} left={:.0}% \"{}\"",
            scene.caption.placement.left_fraction() * 100.0,
            scene.caption.text
        );

        out
    }
}
