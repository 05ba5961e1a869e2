//! Interaction mapping: raw pointer, scroll and viewport events mapped to
//! bounded model orientation, horizontal offset and caption visibility.
//!
//! # Invariants
//! - `rotation_x` never leaves [-π/2, π/2].
//! - `horizontal_offset` never leaves [-1, 1].
//! - Every mapping is pure: same inputs, same outputs.
//! - The scene consumes [`Action`]s, never raw [`InputEvent`]s.

pub mod action;
pub mod event;
pub mod mapper;
pub mod state;

pub use action::Action;
pub use event::InputEvent;
pub use mapper::{
    DEFAULT_SENSITIVITY, DragState, InputError, ModelOrientation, ScrollState, on_drag_end,
    on_drag_start, on_pointer_move, on_scroll, on_viewport_resize,
};
pub use state::{InputConfig, InteractionState, Transition};

pub fn crate_info() -> &'static str {
    "earthview-input v0.1.0"
}
