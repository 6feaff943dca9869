//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use world_tour::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Assets
pub use crate::core::assets::{
    AssetLoader, AssetRegistry, AssetTable, LoadError, LoadedAsset, RetryPolicy,
};

// Worlds and context
pub use crate::core::globals::{Runtime, SharedContext};
pub use crate::core::world::{World, WorldError, WorldRegistry, WorldTransition};

// Scene primitives
pub use crate::core::scene::{Camera, Hand, SceneNode, SceneRoot, ShaderSource, ShaderTable};

// Input
pub use crate::core::input::{InputEvent, KeyCode};
