//=========================================================================
// Shared Context
//=========================================================================
//
// Shared data container for worlds.
//
// Contains state every lifecycle call reads/writes:
// - assets: Loaded asset registry (read-only)
// - shaders: Named shader sources
// - scene / camera / controllers: Shared rendering primitives
// - transitions: Slot for navigation requests
//
// Created once after assets are ready and mutated in place for the rest
// of the run.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetRegistry;
use crate::core::scene::{Camera, ControllerRig, SceneRoot, ShaderTable};
use crate::core::world::{TransitionSlot, WorldTransition};

//=== SharedContext =======================================================

/// Shared context handed to every world lifecycle call.
///
/// Worlds receive `&mut SharedContext` in `setup`, `enter`, `exit` and
/// `execute`. The asset registry is exposed read-only; everything else
/// is shared mutable state.
pub struct SharedContext {
    assets: AssetRegistry,
    shaders: ShaderTable,
    scene: SceneRoot,
    camera: Camera,
    controllers: ControllerRig,
    transitions: TransitionSlot,
}

impl SharedContext {
    /// Creates a context around a fully loaded registry.
    pub fn new(assets: AssetRegistry, shaders: ShaderTable) -> Self {
        Self {
            assets,
            shaders,
            scene: SceneRoot::new(),
            camera: Camera::default(),
            controllers: ControllerRig::default(),
            transitions: TransitionSlot::new(),
        }
    }

    //--- Assets -----------------------------------------------------------

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn shaders(&self) -> &ShaderTable {
        &self.shaders
    }

    //--- Rendering Primitives ---------------------------------------------

    pub fn scene(&self) -> &SceneRoot {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneRoot {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn controllers(&self) -> &ControllerRig {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRig {
        &mut self.controllers
    }

    /// Equips both hand controllers from the loaded registry.
    pub fn equip_controllers(&mut self, model: &str, texture: &str) -> bool {
        self.controllers.equip(&self.assets, model, texture)
    }

    //--- Transitions ------------------------------------------------------

    /// Requests navigation, applied at the start of the next tick.
    pub fn request_transition(&mut self, transition: WorldTransition) {
        self.transitions.request(transition);
    }

    pub fn pending_transition(&self) -> Option<WorldTransition> {
        self.transitions.peek()
    }

    pub(crate) fn take_transition(&mut self) -> Option<WorldTransition> {
        self.transitions.take()
    }
}

impl std::fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedContext")
            .field("assets", &self.assets.len())
            .field("shaders", &self.shaders.len())
            .field("scene_nodes", &self.scene.len())
            .field("pending_transition", &self.transitions.peek())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
