//=========================================================================
// Runtime
//=========================================================================
//
// Per-frame driver owning the started worlds and the shared context.
//
// Each frame:
//   1. Input routed into the context (as it arrives)
//   2. Clock advanced
//   3. WorldController::tick (apply pending transition, execute current)
//   4. Renderer draws the shared scene
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use super::SharedContext;
use crate::core::clock::{FrameClock, FrameTime};
use crate::core::input::{InputEvent, InputRouter};
use crate::core::render::Renderer;
use crate::core::world::{WorldController, WorldError, WorldRegistry};

//=== Runtime =============================================================

/// Running worlds plus the state they share.
///
/// Exists only once assets are loaded and the registry has been started,
/// so every frame sees a valid current world.
pub struct Runtime {
    controller: WorldController,
    context: SharedContext,
    router: InputRouter,
    clock: FrameClock,
}

impl Runtime {
    //--- Construction -----------------------------------------------------

    /// Starts `registry` against `context`.
    ///
    /// # Errors
    ///
    /// [`WorldError::EmptyRegistry`] if no world was registered.
    pub fn start(registry: WorldRegistry, mut context: SharedContext) -> Result<Self, WorldError> {
        let controller = registry.start(&mut context)?;
        info!(target: "world", "Runtime started with {} worlds", controller.len());

        Ok(Self {
            controller,
            context,
            router: InputRouter::new(),
            clock: FrameClock::new(),
        })
    }

    //--- Frame Loop -------------------------------------------------------

    /// Routes one input event into the shared context.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.router.handle(event, &mut self.context)
    }

    /// Advances the clock and ticks the worlds.
    pub fn frame(&mut self) -> FrameTime {
        let time = self.clock.tick();
        self.tick(time.delta, time.elapsed);
        time
    }

    /// Ticks the worlds with explicit timing.
    pub fn tick(&mut self, delta: f32, elapsed: f32) {
        self.controller.tick(&mut self.context, delta, elapsed);
    }

    /// Draws the shared scene.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.render(self.context.scene(), self.context.camera());
    }

    //--- Accessors --------------------------------------------------------

    pub fn controller(&self) -> &WorldController {
        &self.controller
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SharedContext {
        &mut self.context
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
