use crate::action::Action;
use crate::event::InputEvent;
use crate::mapper::{
    self, DEFAULT_SENSITIVITY, DragState, InputError, ModelOrientation, ScrollState,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable input parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of rotation per pixel of drag.
    pub sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

/// Everything the mapper knows about the current interaction.
///
/// A plain value: dispatch consumes one and returns the next. Nothing is
/// shared between handlers except through this struct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    pub drag: DragState,
    pub orientation: ModelOrientation,
    pub scroll: ScrollState,
    pub aspect: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            drag: DragState::default(),
            orientation: ModelOrientation::default(),
            scroll: ScrollState::default(),
            aspect: 16.0 / 9.0,
        }
    }
}

/// Result of dispatching one event: the next state and what the scene must do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: InteractionState,
    pub action: Action,
}

impl InteractionState {
    /// Initial state for a viewport of the given size.
    pub fn with_viewport(width: u32, height: u32) -> Result<Self, InputError> {
        Ok(Self {
            aspect: mapper::on_viewport_resize(width, height)?,
            ..Self::default()
        })
    }

    /// Record the pointer position without rotating, even mid-drag.
    pub fn track_pointer(self, position: Vec2) -> Self {
        Self {
            drag: DragState {
                last_pointer: position,
                ..self.drag
            },
            ..self
        }
    }

    /// Map one event to the next state.
    pub fn dispatch(
        self,
        event: &InputEvent,
        config: &InputConfig,
    ) -> Result<Transition, InputError> {
        let transition = match *event {
            InputEvent::PointerDown => Transition {
                state: Self {
                    drag: mapper::on_drag_start(self.drag),
                    ..self
                },
                action: Action::Noop,
            },
            InputEvent::PointerUp => Transition {
                state: Self {
                    drag: mapper::on_drag_end(self.drag),
                    ..self
                },
                action: Action::Noop,
            },
            InputEvent::PointerMove { position } => {
                let (orientation, last_pointer) = mapper::on_pointer_move(
                    position,
                    self.drag,
                    self.orientation,
                    config.sensitivity,
                );
                let action = if self.drag.active {
                    Action::Orient(orientation)
                } else {
                    Action::Noop
                };
                Transition {
                    state: Self {
                        drag: DragState {
                            last_pointer,
                            ..self.drag
                        },
                        orientation,
                        ..self
                    },
                    action,
                }
            }
            InputEvent::Scroll { offset_y } => {
                let scroll = mapper::on_scroll(offset_y);
                Transition {
                    state: Self { scroll, ..self },
                    action: Action::Shift {
                        offset: scroll.horizontal_offset,
                        text_visible: scroll.text_visible,
                    },
                }
            }
            InputEvent::Resize { width, height } => {
                let aspect = mapper::on_viewport_resize(width, height)?;
                Transition {
                    state: Self { aspect, ..self },
                    action: Action::SetAspect(aspect),
                }
            }
        };

        tracing::debug!(?event, action = ?transition.action, "input dispatched");
        Ok(transition)
    }
}
