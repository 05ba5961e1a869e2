use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Radians of rotation per pixel of pointer travel.
pub const DEFAULT_SENSITIVITY: f32 = 0.005;

/// Model units of horizontal travel per pixel of scroll.
const SCROLL_GAIN: f32 = 0.01;

/// Horizontal offset is clamped to `[-OFFSET_LIMIT, OFFSET_LIMIT]`.
const OFFSET_LIMIT: f32 = 1.0;

/// The caption is visible strictly above this scroll offset.
const TEXT_REVEAL_THRESHOLD: f32 = 100.0;

/// Errors from interaction mapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("degenerate viewport {width}x{height}: aspect ratio is undefined")]
    DegenerateViewport { width: u32, height: u32 },
}

/// Pointer drag tracking. Idle until the pointer goes down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub active: bool,
    pub last_pointer: Vec2,
}

/// Model rotation about the horizontal (X) and vertical (Y) axes, in radians.
///
/// `rotation_x` is kept within [-π/2, π/2] so the model never flips over.
/// `rotation_y` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOrientation {
    pub rotation_x: f32,
    pub rotation_y: f32,
}

/// Scroll position and the values derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub scroll_value: f32,
    pub horizontal_offset: f32,
    pub text_visible: bool,
}

pub fn on_drag_start(drag: DragState) -> DragState {
    DragState {
        active: true,
        ..drag
    }
}

pub fn on_drag_end(drag: DragState) -> DragState {
    DragState {
        active: false,
        ..drag
    }
}

/// Track the pointer and, while dragging, rotate by the pointer delta.
///
/// The delta is taken against `drag.last_pointer` as it stands, so the first
/// move of a drag may include travel from before the button went down.
pub fn on_pointer_move(
    current: Vec2,
    drag: DragState,
    orientation: ModelOrientation,
    sensitivity: f32,
) -> (ModelOrientation, Vec2) {
    if !drag.active {
        return (orientation, current);
    }

    let delta = current - drag.last_pointer;
    let rotated = ModelOrientation {
        rotation_x: (orientation.rotation_x + delta.y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2),
        rotation_y: orientation.rotation_y + delta.x * sensitivity,
    };
    (rotated, current)
}

pub fn on_scroll(scroll_y: f32) -> ScrollState {
    ScrollState {
        scroll_value: scroll_y,
        horizontal_offset: (scroll_y * SCROLL_GAIN).clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
        text_visible: scroll_y > TEXT_REVEAL_THRESHOLD,
    }
}

/// Aspect ratio of the viewport. Fails rather than yield inf or NaN.
pub fn on_viewport_resize(width: u32, height: u32) -> Result<f32, InputError> {
    if height == 0 {
        return Err(InputError::DegenerateViewport { width, height });
    }
    Ok(width as f32 / height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn dragging_from(x: f32, y: f32) -> DragState {
        DragState {
            active: true,
            last_pointer: Vec2::new(x, y),
        }
    }

    #[test]
    fn drag_start_activates() {
        let drag = on_drag_start(DragState::default());
        assert!(drag.active);
    }

    #[test]
    fn drag_end_is_idempotent() {
        let once = on_drag_end(on_drag_start(DragState::default()));
        let twice = on_drag_end(once);
        assert!(!once.active);
        assert_eq!(once, twice);
    }

    #[test]
    fn drag_transitions_keep_last_pointer() {
        let drag = DragState {
            active: false,
            last_pointer: Vec2::new(7.0, 9.0),
        };
        assert_eq!(on_drag_start(drag).last_pointer, Vec2::new(7.0, 9.0));
        assert_eq!(on_drag_end(drag).last_pointer, Vec2::new(7.0, 9.0));
    }

    #[test]
    fn drag_scenario_rotates_by_delta() {
        let (o, last) = on_pointer_move(
            Vec2::new(100.0, 50.0),
            dragging_from(0.0, 0.0),
            ModelOrientation::default(),
            DEFAULT_SENSITIVITY,
        );
        assert!((o.rotation_y - 0.5).abs() < EPS);
        assert!((o.rotation_x - 0.25).abs() < EPS);
        assert_eq!(last, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn idle_moves_track_pointer_without_rotating() {
        let start = ModelOrientation {
            rotation_x: 0.3,
            rotation_y: -1.2,
        };
        let mut drag = DragState::default();
        let mut o = start;
        for p in [
            Vec2::new(10_000.0, -10_000.0),
            Vec2::new(-5.0, 3.0),
            Vec2::new(1e6, 1e6),
        ] {
            let (next, last) = on_pointer_move(p, drag, o, DEFAULT_SENSITIVITY);
            o = next;
            drag.last_pointer = last;
            assert_eq!(last, p);
        }
        assert_eq!(o, start);
    }

    #[test]
    fn rotation_x_stays_clamped_for_any_delta() {
        for sensitivity in [0.0001, 0.005, 0.1, 3.0] {
            for dy in [-1e6, -2000.0, -1.0, 0.0, 1.0, 314.0, 1e6] {
                let (o, _) = on_pointer_move(
                    Vec2::new(0.0, dy),
                    dragging_from(0.0, 0.0),
                    ModelOrientation {
                        rotation_x: 1.5,
                        rotation_y: 0.0,
                    },
                    sensitivity,
                );
                assert!(o.rotation_x >= -FRAC_PI_2 && o.rotation_x <= FRAC_PI_2);
            }
        }
    }

    #[test]
    fn rotation_x_saturates_at_half_pi() {
        let (o, _) = on_pointer_move(
            Vec2::new(0.0, 1000.0),
            dragging_from(0.0, 0.0),
            ModelOrientation::default(),
            DEFAULT_SENSITIVITY,
        );
        assert_eq!(o.rotation_x, FRAC_PI_2);
        let (o, _) = on_pointer_move(
            Vec2::new(0.0, -1000.0),
            dragging_from(0.0, 0.0),
            ModelOrientation::default(),
            DEFAULT_SENSITIVITY,
        );
        assert_eq!(o.rotation_x, -FRAC_PI_2);
    }

    #[test]
    fn rotation_y_is_unbounded() {
        let (o, _) = on_pointer_move(
            Vec2::new(10_000.0, 0.0),
            dragging_from(0.0, 0.0),
            ModelOrientation::default(),
            DEFAULT_SENSITIVITY,
        );
        assert!((o.rotation_y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn stale_last_pointer_is_used_on_first_drag_move() {
        // Pointer last seen at (40, 0) before the button went down.
        let drag = on_drag_start(DragState {
            active: false,
            last_pointer: Vec2::new(40.0, 0.0),
        });
        let (o, _) = on_pointer_move(
            Vec2::new(50.0, 0.0),
            drag,
            ModelOrientation::default(),
            DEFAULT_SENSITIVITY,
        );
        assert!((o.rotation_y - 0.05).abs() < EPS);
    }

    #[test]
    fn scroll_reference_points() {
        let s = on_scroll(0.0);
        assert_eq!((s.scroll_value, s.horizontal_offset, s.text_visible), (0.0, 0.0, false));

        let s = on_scroll(100.0);
        assert_eq!(s.scroll_value, 100.0);
        assert!((s.horizontal_offset - 1.0).abs() < EPS);
        assert!(!s.text_visible);

        let s = on_scroll(101.0);
        assert_eq!(s.scroll_value, 101.0);
        assert_eq!(s.horizontal_offset, 1.0);
        assert!(s.text_visible);

        let s = on_scroll(50.0);
        assert_eq!(s.scroll_value, 50.0);
        assert!((s.horizontal_offset - 0.5).abs() < EPS);
        assert!(!s.text_visible);
    }

    #[test]
    fn scroll_offset_is_monotone_and_bounded() {
        let mut prev = f32::NEG_INFINITY;
        for step in 0..5_000 {
            let s = on_scroll(step as f32 * 0.5);
            assert!(s.horizontal_offset >= prev);
            assert!((-1.0..=1.0).contains(&s.horizontal_offset));
            prev = s.horizontal_offset;
        }
        assert_eq!(prev, 1.0);
    }

    #[test]
    fn negative_scroll_is_still_clamped() {
        let s = on_scroll(-1_000.0);
        assert_eq!(s.horizontal_offset, -1.0);
        assert!(!s.text_visible);
    }

    #[test]
    fn scroll_is_deterministic() {
        assert_eq!(on_scroll(73.25), on_scroll(73.25));
    }

    #[test]
    fn resize_aspect_ratios() {
        let a = on_viewport_resize(1920, 1080).unwrap();
        assert!((a - 1.7778).abs() < 1e-4);
        let a = on_viewport_resize(800, 600).unwrap();
        assert!((a - 1.3333).abs() < 1e-4);
    }

    #[test]
    fn resize_with_zero_height_fails_fast() {
        let err = on_viewport_resize(640, 0).unwrap_err();
        assert_eq!(
            err,
            InputError::DegenerateViewport {
                width: 640,
                height: 0
            }
        );
    }
}
