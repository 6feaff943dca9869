//=========================================================================
// Input Router
//=========================================================================
//
// Applies input events to the shared context.
//
//   W / S        → step forward / back along the view
//   A / D        → strafe left / right
//   N            → request the next world
//   Escape       → release pointer lock
//   mouse motion → look around (pointer lock only)
//   select       → hand controller trigger
//
// The router writes the transition slot on the user's behalf, exactly as
// a world would; the controller applies it on the next tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};
use crate::core::globals::SharedContext;
use crate::core::world::WorldTransition;

//=== Constants ===========================================================

/// Distance covered by one movement key press.
const DEFAULT_STEP: f32 = 0.2;

//=== InputRouter =========================================================

#[derive(Debug, Clone, Copy)]
pub struct InputRouter {
    step: f32,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distance of one movement step.
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Applies `event` to `ctx`. Returns `false` for events with no binding.
    pub fn handle(&self, event: &InputEvent, ctx: &mut SharedContext) -> bool {
        trace!(target: "platform::input", "Routing {:?}", event);

        match *event {
            InputEvent::KeyDown { key } => self.handle_key(key, ctx),

            InputEvent::MouseMotion { dx, dy } => ctx.camera_mut().rotate(dx, dy),

            InputEvent::PointerLocked => {
                ctx.camera_mut().lock_pointer();
                true
            }

            InputEvent::PointerUnlocked => {
                ctx.camera_mut().unlock_pointer();
                true
            }

            InputEvent::SelectStart(hand) => {
                ctx.controllers_mut().select_start(hand);
                true
            }

            InputEvent::SelectEnd(hand) => {
                ctx.controllers_mut().select_end(hand);
                true
            }
        }
    }

    fn handle_key(&self, key: KeyCode, ctx: &mut SharedContext) -> bool {
        match key {
            KeyCode::KeyW => ctx.camera_mut().move_forward(self.step),
            KeyCode::KeyS => ctx.camera_mut().move_forward(-self.step),
            KeyCode::KeyA => ctx.camera_mut().move_right(-self.step),
            KeyCode::KeyD => ctx.camera_mut().move_right(self.step),
            KeyCode::KeyN => ctx.request_transition(WorldTransition::Next),
            KeyCode::Escape => ctx.camera_mut().unlock_pointer(),
            _ => return false,
        }
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
