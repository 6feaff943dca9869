//=========================================================================
// World System
//=========================================================================
//
// Ordered set of independently authored worlds driven through a uniform
// lifecycle.
//
// Architecture:
//   WorldRegistry ──start()──> WorldController
//     (register)                  ├─ worlds: Vec<Box<dyn World>>
//                                 └─ current: usize
//
// Flow:
//   start()  → setup(all, in order) → enter(0)
//   tick()   → take transition → [exit(old) → enter(new)] → execute(current)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::SharedContext;

//=== Module Declarations =================================================

mod controller;
mod error;
mod registry;
mod transition;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use controller::{Navigation, WorldController};
pub use error::WorldError;
pub use registry::WorldRegistry;
pub use transition::{TransitionSlot, WorldTransition};

//=== World Trait =========================================================

/// One navigable world with its own content and behaviour.
///
/// A world's content is attached to the shared scene exactly while it is
/// the current world: attach in `enter`, detach in `exit`.
///
/// # Minimal Implementation
///
/// Only `name()` and `execute()` are required. Lifecycle hooks default to
/// doing nothing:
///
/// ```ignore
/// struct Lobby;
///
/// impl World for Lobby {
///     fn name(&self) -> &str {
///         "lobby"
///     }
///
///     fn execute(&mut self, ctx: &mut SharedContext, _delta: f32, _elapsed: f32) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait World {
    /// Stable identifier, also used as the owner tag of its scene nodes.
    fn name(&self) -> &str;

    /// Called once after all assets are loaded, even for worlds that are
    /// never entered. Builds content; must not attach it.
    fn setup(&mut self, _ctx: &mut SharedContext) {}

    /// Called when the world becomes current. Attaches content and places
    /// the camera.
    fn enter(&mut self, _ctx: &mut SharedContext) {}

    /// Called when the world stops being current. Detaches content.
    fn exit(&mut self, _ctx: &mut SharedContext) {}

    /// Called every frame while the world is current.
    ///
    /// `delta` is seconds since the previous frame, `elapsed` seconds since
    /// the runtime started. Errors are logged; the world stays current.
    fn execute(&mut self, ctx: &mut SharedContext, delta: f32, elapsed: f32) -> anyhow::Result<()>;
}
