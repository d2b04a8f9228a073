//! Maps Bevy input devices onto [`ControlEvent`]s.
//!
//! The mapping functions are pure so they can be tested against hand-built
//! [`ButtonInput`] state; [`collect_control_input`] triggers the resulting
//! events for the controller's observer. Any input resource may be absent,
//! as in headless apps built from `MinimalPlugins`.
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use crate::constants::SCROLL_PIXELS_PER_LINE;
use crate::player::{ControlEvent, ControlKey};

/// Physical keys and the controls they drive.
pub const KEY_BINDINGS: [(KeyCode, ControlKey); 9] = [
    (KeyCode::KeyW, ControlKey::Forward),
    (KeyCode::ArrowUp, ControlKey::Forward),
    (KeyCode::KeyS, ControlKey::Backward),
    (KeyCode::ArrowDown, ControlKey::Backward),
    (KeyCode::KeyA, ControlKey::StrafeLeft),
    (KeyCode::ArrowLeft, ControlKey::StrafeLeft),
    (KeyCode::KeyD, ControlKey::StrafeRight),
    (KeyCode::ArrowRight, ControlKey::StrafeRight),
    (KeyCode::Space, ControlKey::Jump),
];

/// Mouse button that captures the pointer for camera look.
pub const LOOK_BUTTON: MouseButton = MouseButton::Right;

/// Key transitions since the last frame.
#[must_use]
pub fn keyboard_events(keyboard: &ButtonInput<KeyCode>) -> Vec<ControlEvent> {
    let mut events = Vec::new();
    for (code, key) in KEY_BINDINGS {
        if keyboard.just_pressed(code) {
            events.push(ControlEvent::KeyDown(key));
        }
        if keyboard.just_released(code) {
            events.push(ControlEvent::KeyUp(key));
        }
    }
    events
}

/// Pointer capture changes driven by [`LOOK_BUTTON`].
#[must_use]
pub fn capture_event(buttons: &ButtonInput<MouseButton>) -> Option<ControlEvent> {
    if buttons.just_pressed(LOOK_BUTTON) {
        Some(ControlEvent::PointerCapture(true))
    } else if buttons.just_released(LOOK_BUTTON) {
        Some(ControlEvent::PointerCapture(false))
    } else {
        None
    }
}

/// Converts a vertical scroll into lines.
///
/// # Examples
/// ```
/// use bevy::input::mouse::MouseScrollUnit;
/// use brood::input::scroll_lines;
/// assert_eq!(scroll_lines(MouseScrollUnit::Line, 2.0), 2.0);
/// assert_eq!(scroll_lines(MouseScrollUnit::Pixel, 50.0), 0.5);
/// ```
#[must_use]
pub fn scroll_lines(unit: MouseScrollUnit, delta: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => delta,
        MouseScrollUnit::Pixel => delta / SCROLL_PIXELS_PER_LINE,
    }
}

/// Triggers a [`ControlEvent`] for every input change this frame.
///
/// Capture changes go first so a press-and-drag in one frame already turns
/// the camera.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn collect_control_input(
    mut commands: Commands,
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    motion: Option<Res<AccumulatedMouseMotion>>,
    scroll: Option<Res<AccumulatedMouseScroll>>,
) {
    if let Some(event) = buttons.as_deref().and_then(capture_event) {
        commands.trigger(event);
    }
    if let Some(pressed) = keyboard.as_deref() {
        for event in keyboard_events(pressed) {
            commands.trigger(event);
        }
    }
    if let Some(moved) = motion.as_deref() {
        if moved.delta != Vec2::ZERO {
            commands.trigger(ControlEvent::LookDelta(moved.delta));
        }
    }
    if let Some(scrolled) = scroll.as_deref() {
        let lines = scroll_lines(scrolled.unit, scrolled.delta.y);
        if lines != 0.0 {
            commands.trigger(ControlEvent::Zoom(lines));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::w(KeyCode::KeyW, ControlKey::Forward)]
    #[case::arrow_down(KeyCode::ArrowDown, ControlKey::Backward)]
    #[case::a(KeyCode::KeyA, ControlKey::StrafeLeft)]
    #[case::arrow_right(KeyCode::ArrowRight, ControlKey::StrafeRight)]
    #[case::space(KeyCode::Space, ControlKey::Jump)]
    fn presses_and_releases_map_to_controls(#[case] code: KeyCode, #[case] key: ControlKey) {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(code);
        assert_eq!(keyboard_events(&keyboard), vec![ControlEvent::KeyDown(key)]);

        keyboard.clear();
        keyboard.release(code);
        assert_eq!(keyboard_events(&keyboard), vec![ControlEvent::KeyUp(key)]);
    }

    #[test]
    fn held_keys_produce_no_new_events() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.clear();
        assert!(keyboard.pressed(KeyCode::KeyW));
        assert!(keyboard_events(&keyboard).is_empty());
    }

    #[test]
    fn right_button_toggles_capture() {
        let mut buttons = ButtonInput::<MouseButton>::default();
        assert_eq!(capture_event(&buttons), None);
        buttons.press(MouseButton::Right);
        assert_eq!(capture_event(&buttons), Some(ControlEvent::PointerCapture(true)));
        buttons.clear();
        buttons.release(MouseButton::Right);
        assert_eq!(capture_event(&buttons), Some(ControlEvent::PointerCapture(false)));
    }

    #[test]
    fn left_button_is_ignored() {
        let mut buttons = ButtonInput::<MouseButton>::default();
        buttons.press(MouseButton::Left);
        assert_eq!(capture_event(&buttons), None);
    }
}
