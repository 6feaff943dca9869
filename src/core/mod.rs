//=========================================================================
// Core Systems
//
// Everything that runs independently of the windowing layer.
//
// Responsibilities:
// - Load the asset table into a registry (assets)
// - Drive the world lifecycle (world, globals)
// - Hold the shared rendering primitives (scene, render)
// - Translate user input into context changes (input)
//
// Notes:
// Nothing here touches winit. The platform layer owns the event loop and
// calls into `globals::Runtime` once per redraw.
//
//=========================================================================

pub mod assets;
pub mod clock;
pub mod globals;
pub mod input;
pub mod render;
pub mod scene;
pub mod world;
