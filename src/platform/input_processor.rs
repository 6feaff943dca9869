//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → Runtime
//
// Stateful pointer-lock tracking: raw mouse motion is only forwarded
// while the cursor is grabbed. Unmapped keys (F13-F24, exotic keyboards)
// and key releases are filtered (returns None). The right mouse button
// stands in for the primary hand controller's select on desktop.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::ElementState,
    event::{KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{Hand, InputEvent, KeyCode};

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents with pointer-lock tracking.
pub(crate) struct InputProcessor {
    pointer_locked: bool,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            pointer_locked: false,
        }
    }

    //--- Pointer Lock State -----------------------------------------------

    /// Records a pointer lock change and returns the matching event.
    pub(crate) fn set_pointer_locked(&mut self, locked: bool) -> InputEvent {
        self.pointer_locked = locked;
        if locked {
            InputEvent::PointerLocked
        } else {
            InputEvent::PointerUnlocked
        }
    }

    pub(crate) fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit key press to an InputEvent. Releases and unmapped
    /// keys are filtered.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        self.create_key_input_event(key, key_event.state)
    }

    /// Converts a Winit mouse button event. Only the right button is bound,
    /// to select on the primary hand.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        match (button, state) {
            (WinitMouseButton::Right, ElementState::Pressed) => {
                Some(InputEvent::SelectStart(Hand::Primary))
            }
            (WinitMouseButton::Right, ElementState::Released) => {
                Some(InputEvent::SelectEnd(Hand::Primary))
            }
            _ => None,
        }
    }

    /// Raw device motion; dropped unless the pointer is locked.
    pub(crate) fn process_mouse_motion(&self, dx: f64, dy: f64) -> Option<InputEvent> {
        self.pointer_locked.then(|| InputEvent::MouseMotion {
            dx: dx as f32,
            dy: dy as f32,
        })
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_key_input_event(&self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        match (key, state) {
            (KeyCode::Unidentified, _) | (_, ElementState::Released) => None,
            (key, ElementState::Pressed) => Some(InputEvent::KeyDown { key }),
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Only the bound keys are mapped; everything else becomes
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        match code {
            WinitKeyCode::KeyW => KeyCode::KeyW,
            WinitKeyCode::KeyA => KeyCode::KeyA,
            WinitKeyCode::KeyS => KeyCode::KeyS,
            WinitKeyCode::KeyD => KeyCode::KeyD,
            WinitKeyCode::KeyN => KeyCode::KeyN,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unlocked() {
        let processor = InputProcessor::new();
        assert!(!processor.is_pointer_locked());
    }

    #[test]
    fn motion_only_forwarded_while_locked() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_mouse_motion(4.0, -2.0), None);

        assert_eq!(processor.set_pointer_locked(true), InputEvent::PointerLocked);
        assert_eq!(
            processor.process_mouse_motion(4.0, -2.0),
            Some(InputEvent::MouseMotion { dx: 4.0, dy: -2.0 })
        );

        assert_eq!(processor.set_pointer_locked(false), InputEvent::PointerUnlocked);
        assert_eq!(processor.process_mouse_motion(1.0, 1.0), None);
    }

    #[test]
    fn key_presses_become_events() {
        let processor = InputProcessor::new();

        assert_eq!(
            processor.create_key_input_event(KeyCode::KeyW, ElementState::Pressed),
            Some(InputEvent::KeyDown { key: KeyCode::KeyW })
        );
        assert_eq!(
            processor.create_key_input_event(KeyCode::KeyW, ElementState::Released),
            None
        );
        assert_eq!(
            processor.create_key_input_event(KeyCode::Unidentified, ElementState::Pressed),
            None
        );
    }

    #[test]
    fn right_button_drives_primary_select() {
        let processor = InputProcessor::new();

        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Right, ElementState::Pressed),
            Some(InputEvent::SelectStart(Hand::Primary))
        );
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Right, ElementState::Released),
            Some(InputEvent::SelectEnd(Hand::Primary))
        );
    }

    #[test]
    fn other_buttons_are_unbound() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed),
            None
        );
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Back, ElementState::Released),
            None
        );
    }

    #[test]
    fn keycode_conversion_filters_unbound() {
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Unidentified);
    }

    #[test]
    fn keycode_conversion_movement_keys() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyW), KeyCode::KeyW);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyN), KeyCode::KeyN);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
    }
}
