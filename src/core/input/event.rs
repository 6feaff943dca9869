//=========================================================================
// Input Event Types
//
// Defines the internal representation of user input.
//
// This module abstracts away platform-specific input (Winit, XR runtimes)
// into a small, engine-friendly vocabulary consumed by the input router.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputRouter (camera, controllers, transition slot)
// ```
//
//=========================================================================

//=== Internal Imports ====================================================

use crate::core::scene::Hand;

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyW` is the same physical key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Movement ---------------------------------------------------------

    KeyW,
    KeyA,
    KeyS,
    KeyD,

    //--- Navigation -------------------------------------------------------

    /// Next world.
    KeyN,

    /// Releases pointer lock.
    Escape,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== InputEvent ==========================================================

/// User input in engine terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode },

    /// Raw pointer motion in device pixels (unbounded under pointer lock).
    MouseMotion { dx: f32, dy: f32 },

    /// The host acquired pointer lock.
    PointerLocked,

    /// The host lost or released pointer lock.
    PointerUnlocked,

    /// Hand controller select (trigger) pressed.
    SelectStart(Hand),

    /// Hand controller select (trigger) released.
    SelectEnd(Hand),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycode_is_copy() {
        let key = KeyCode::KeyW;
        let copy = key;
        assert_eq!(key, copy);
    }

    #[test]
    fn events_compare_by_payload() {
        assert_eq!(
            InputEvent::SelectStart(Hand::Primary),
            InputEvent::SelectStart(Hand::Primary)
        );
        assert_ne!(
            InputEvent::SelectStart(Hand::Primary),
            InputEvent::SelectStart(Hand::Secondary)
        );
    }
}
