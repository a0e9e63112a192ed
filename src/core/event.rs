//=========================================================================
// Events
//
// Engine representation of input and system events.
//
// This module abstracts away platform-specific events (e.g. Winit) into
// a small, portable set that scenes receive through `handle_event`.
//
// Responsibilities:
// - Represent keyboard, mouse and window events in a stable way
// - Tag each event with a kind so the scene manager can single out Quit
// - Carry modifier state (Shift, Ctrl, Alt) alongside key/button events
//
// Event Flow:
// ```text
// Platform Layer (Winit / Headless)
//         ↓
//    Event (this module)
//         ↓
//    SceneManager::run ──► Quit? → clear()
//         ↓
//    Scene::handle_event (top of stack only)
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::canvas::Dimensions;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyA` is always the same physical key regardless of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
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

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished. On macOS, Command maps
/// to `ctrl` and Option to `alt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// All modifiers held.
    pub const ALL: Self = Self { shift: true, ctrl: true, alt: true };

    /// Returns `true` if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=== EventKind ===========================================================

/// Type tag of an [`Event`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Quit,
    KeyDown,
    KeyUp,
    MouseButtonDown,
    MouseButtonUp,
    MouseMoved,
    Resized,
    Unidentified,
}

//=== Event ===============================================================

/// An input or system event delivered to the active scene.
///
/// The scene manager only looks at the kind: `Quit` triggers a full
/// shutdown, every other event is forwarded verbatim to the top scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Application shutdown requested (window closed, OS logout, etc.).
    Quit,

    /// Key pressed down.
    KeyDown { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// Mouse button pressed.
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },

    /// Mouse button released.
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor moved, in window pixels (top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Window inner size changed.
    Resized(Dimensions),

    /// Platform event with no engine representation.
    Unidentified,
}

impl Event {
    /// Returns the type tag of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Quit => EventKind::Quit,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::KeyUp { .. } => EventKind::KeyUp,
            Self::MouseButtonDown { .. } => EventKind::MouseButtonDown,
            Self::MouseButtonUp { .. } => EventKind::MouseButtonUp,
            Self::MouseMoved { .. } => EventKind::MouseMoved,
            Self::Resized(_) => EventKind::Resized,
            Self::Unidentified => EventKind::Unidentified,
        }
    }

    /// Returns `true` for the distinguished shutdown event.
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Convenience constructor for an unmodified key press.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE }
    }

    /// Convenience constructor for an unmodified key release.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// Returns the key if this is a press of any key.
    pub fn pressed_key(&self) -> Option<KeyCode> {
        match self {
            Self::KeyDown { key, .. } => Some(*key),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
