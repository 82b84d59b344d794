//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit events into engine InputEvents.
//
// Architecture:
//   winit WindowEvent → InputProcessor → InputEvent → InputBuffer
//
// Modifier state is cached from ModifiersChanged and stamped onto every
// following key and button event. Keys the engine does not name are
// filtered (None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

/// Pixel scroll (trackpads) is reported in lines of this height.
const PIXELS_PER_LINE: f64 = 20.0;

//=== InputProcessor ======================================================

/// Stateful winit → engine input converter.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Modifier State ---------------------------------------------------

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.current_modifiers = Modifiers::from(state);
    }

    #[cfg(test)]
    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a keyboard event. Unmapped keys yield `None`.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return None;
        };
        self.key(KeyCode::from(code), key_event.state)
    }

    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.current_modifiers;

        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn process_mouse_move(&self, position: PhysicalPosition<f64>) -> InputEvent {
        InputEvent::MouseMoved {
            x: position.x,
            y: position.y,
        }
    }

    /// Converts wheel or trackpad scroll to lines.
    pub(crate) fn process_scroll(&self, delta: MouseScrollDelta) -> InputEvent {
        let (dx, dy) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
            MouseScrollDelta::PixelDelta(pos) => (pos.x / PIXELS_PER_LINE, pos.y / PIXELS_PER_LINE),
        };
        InputEvent::MouseScrolled { dx, dy }
    }

    //--- Internal Helpers -------------------------------------------------

    fn key(&self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }

        let modifiers = self.current_modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit already folds macOS Cmd into `control_key`.
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits ---------------------------------------------------
            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters --------------------------------------------------
            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows ---------------------------------------------------
            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special --------------------------------------------------
            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            ShiftLeft | ShiftRight => KeyCode::ShiftLeft,
            ControlLeft | ControlRight => KeyCode::ControlLeft,
            AltLeft | AltRight => KeyCode::AltLeft,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Back, forward and extra buttons collapse into `Other`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        state.set(ModifiersState::SHIFT, shift);
        state.set(ModifiersState::CONTROL, ctrl);
        state.set(ModifiersState::ALT, alt);
        state
    }

    #[test]
    fn starts_with_no_modifiers() {
        assert!(InputProcessor::new().current_modifiers().is_empty());
    }

    #[test]
    fn key_events_carry_cached_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(modifiers(false, true, false));

        let event = processor.key(KeyCode::KeyS, ElementState::Pressed);

        assert_eq!(
            event,
            Some(InputEvent::KeyDown {
                key: KeyCode::KeyS,
                modifiers: Modifiers::CTRL,
            })
        );
    }

    #[test]
    fn unidentified_keys_are_filtered() {
        let processor = InputProcessor::new();

        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert_eq!(processor.key(KeyCode::Unidentified, ElementState::Pressed), None);
    }

    #[test]
    fn modifiers_persist_across_events() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(modifiers(true, false, false));

        let button = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released);
        let key = processor.key(KeyCode::Space, ElementState::Released);

        assert_eq!(
            button,
            InputEvent::MouseButtonUp {
                button: MouseButton::Left,
                modifiers: Modifiers::SHIFT,
            }
        );
        assert_eq!(
            key,
            Some(InputEvent::KeyUp {
                key: KeyCode::Space,
                modifiers: Modifiers::SHIFT,
            })
        );
    }

    #[test]
    fn mouse_move_keeps_physical_position() {
        let event = InputProcessor::new().process_mouse_move(PhysicalPosition::new(123.5, 456.25));

        assert_eq!(event, InputEvent::MouseMoved { x: 123.5, y: 456.25 });
    }

    #[test]
    fn pixel_scroll_is_converted_to_lines() {
        let processor = InputProcessor::new();

        let lines = processor.process_scroll(MouseScrollDelta::LineDelta(0.0, -2.0));
        let pixels = processor.process_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(40.0, 10.0)));

        assert_eq!(lines, InputEvent::MouseScrolled { dx: 0.0, dy: -2.0 });
        assert_eq!(pixels, InputEvent::MouseScrolled { dx: 2.0, dy: 0.5 });
    }

    #[test]
    fn left_and_right_modifier_keys_share_a_code() {
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftRight), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::ControlRight), KeyCode::ControlLeft);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
