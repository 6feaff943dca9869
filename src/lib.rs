//=========================================================================
// World Tour - Library Root
//
// This crate defines the public API surface of the World Tour runtime.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the world lifecycle and asset pipeline for world authors
// - Keep the windowing layer (`platform`) hidden from end users
//
// Typical usage:
// ```ignore
// use world_tour::prelude::*;
//
// fn main() -> anyhow::Result<()> {
//     EngineBuilder::new()
//         .with_assets(AssetTable::from_manifest_file("assets/manifest.json")?)
//         .build()
//         .init(|worlds| {
//             worlds.register(Lobby::default());
//         })
//         .run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the world lifecycle, asset pipeline, shared scene and
// input routing. None of it depends on winit.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains OS-specific logic (window, Winit integration,
// event loop) and is kept private.
//
// `engine` defines the main entry point and initialization logic.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
pub use platform::PlatformError;
