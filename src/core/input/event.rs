//=========================================================================
// Input Event Types
//
// Engine-side representation of keyboard and mouse input.
//
// The platform layer (winit, headless scripts) converts whatever it
// receives into these types before they cross the platform channel, so
// nothing past the bridge ever sees a backend type.
//
// Event Flow:
// ```text
// Platform (winit / headless)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputState (per-frame held / pressed / released)
//         ↓
//    Components via ComponentContext::input()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the produced character, so
/// `KeyA` is the same key on QWERTY and AZERTY layouts.
///
/// Key codes are serializable so they can be named in configuration files
/// (see [`HotkeyConfig`](crate::engine::config::HotkeyConfig)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    ShiftLeft,
    ControlLeft,
    AltLeft,

    /// Keys the platform layer does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt) at the time of an event.
///
/// Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift key held.
    pub shift: bool,

    /// Ctrl key held (Command on macOS).
    pub ctrl: bool,

    /// Alt key held (Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Returns `true` if no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}

//=== InputEvent ==========================================================

/// Low-level input event delivered by the platform layer.
///
/// Discrete events (keys, buttons, scroll) are order-significant and are
/// never coalesced. `MouseMoved` is continuous: the platform keeps only
/// the last position per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Mouse button pressed.
    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Mouse button released.
    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Cursor moved to a new position (window pixels, top-left origin).
    MouseMoved { x: f64, y: f64 },

    /// Scroll wheel / trackpad scroll, in lines.
    MouseScrolled { dx: f64, dy: f64 },
}

impl InputEvent {
    /// Returns `true` for events whose intermediate values may be dropped
    /// (only the latest one per frame matters).
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
