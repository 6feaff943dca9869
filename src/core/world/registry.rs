//=========================================================================
// World Registry
//=========================================================================
//
// Collects worlds before the runtime starts. Registration order is the
// navigation order and is fixed once `start` is called.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{World, WorldController, WorldError};
use crate::core::globals::SharedContext;

//=== WorldRegistry =======================================================

/// Unstarted set of worlds.
///
/// No lifecycle method runs while worlds sit here; [`WorldRegistry::start`]
/// consumes the registry and produces the running [`WorldController`].
#[derive(Default)]
pub struct WorldRegistry {
    worlds: Vec<Box<dyn World>>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a world, returning its index.
    pub fn register<W>(&mut self, world: W) -> usize
    where
        W: World + 'static,
    {
        if self.worlds.iter().any(|w| w.name() == world.name()) {
            warn!(
                target: "world",
                "World `{}` is registered more than once; scene ownership checks will conflate them",
                world.name()
            );
        }

        let index = self.worlds.len();
        debug!(target: "world", "Registered world `{}` at index {}", world.name(), index);
        self.worlds.push(Box::new(world));
        index
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.worlds.iter().map(|w| w.name())
    }

    /// Runs `setup` on every world in order, then enters world 0.
    ///
    /// # Errors
    ///
    /// [`WorldError::EmptyRegistry`] if nothing was registered.
    pub fn start(self, ctx: &mut SharedContext) -> Result<WorldController, WorldError> {
        WorldController::start(self.worlds, ctx)
    }
}

impl std::fmt::Debug for WorldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
