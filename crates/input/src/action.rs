use crate::mapper::ModelOrientation;

/// A high-level action produced by dispatching one input event.
///
/// The scene consumes actions, never raw input events, so the desktop and
/// headless front ends share the same scene logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Apply a new orientation to the model.
    Orient(ModelOrientation),
    /// Move the model horizontally and show or hide the caption.
    Shift { offset: f32, text_visible: bool },
    /// Apply a new aspect ratio to the camera and viewport.
    SetAspect(f32),
    /// Nothing visible changed (drag toggles, pointer tracking).
    Noop,
}
