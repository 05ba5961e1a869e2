use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An immutable input event descriptor, abstracted from the windowing host.
///
/// Positions are absolute viewport coordinates in pixels. Scroll carries the
/// absolute vertical scroll offset, not a per-event delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Primary pointer button pressed.
    PointerDown,
    /// Primary pointer button released.
    PointerUp,
    /// Pointer moved to an absolute position.
    PointerMove { position: Vec2 },
    /// Scroll offset changed.
    Scroll { offset_y: f32 },
    /// Viewport resized.
    Resize { width: u32, height: u32 },
}

impl InputEvent {
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            position: Vec2::new(x, y),
        }
    }
}
