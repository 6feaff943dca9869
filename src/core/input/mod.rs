//=========================================================================
// Input System
//
// Translates user input into changes on the shared context.
//
// Responsibilities:
// - Define a portable input vocabulary (keys, motion, pointer lock, select)
// - Route events to the camera, hand controllers and transition slot
//
// Notes:
// The platform layer produces `InputEvent`s; the runtime feeds them to
// the `InputRouter` before the next tick.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod router;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode};
pub use router::InputRouter;
pub use crate::core::scene::Hand;
