//=========================================================================
// World Tour Engine
//
// Main entry point and coordinator for the runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Platform]
//         │                                  │                           │
//         ├─ with_title()                    └─ registers worlds         ├─ spawns asset load
//         ├─ with_assets()                                               ├─ runs event loop
//         └─ with_loader_workers()                                       └─ blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetLoader, AssetTable, LoadError, RetryPolicy};
use crate::core::render::{Renderer, StatsRenderer};
use crate::core::scene::ShaderTable;
use crate::core::world::{WorldError, WorldRegistry};
use crate::platform::{PendingStart, Platform, PlatformError, WindowConfig};

//=== EngineError =========================================================

/// Terminal errors surfaced by [`Engine::run`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("asset loading failed: {0}")]
    Load(#[from] LoadError),

    #[error("world startup failed: {0}")]
    World(#[from] WorldError),
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "World Tour"
/// - **Window**: 800x600
/// - **Asset base**: `assets`
/// - **Loader workers**: 4
/// - **Retry policy**: 3 attempts, 50 ms backoff
///
/// # Examples
///
/// ```ignore
/// EngineBuilder::new()
///     .with_asset_base("assets")
///     .with_assets(AssetTable::from_pairs([("font", "f.font"), ("tex", "f.png")])?)
///     .build()
///     .init(|worlds| {
///         worlds.register(Lobby::default());
///         worlds.register(Gallery::default());
///     })
///     .run()?;
/// ```
pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    asset_base: PathBuf,
    assets: AssetTable,
    shaders: ShaderTable,
    workers: usize,
    retry: RetryPolicy,
    controller_assets: Option<(String, String)>,
    renderer: Option<Box<dyn Renderer>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "World Tour".to_string(),
            width: 800,
            height: 600,
            asset_base: PathBuf::from("assets"),
            assets: AssetTable::new(),
            shaders: ShaderTable::new(),
            workers: 4,
            retry: RetryPolicy::default(),
            controller_assets: None,
            renderer: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero");
        self.width = width;
        self.height = height;
        self
    }

    /// Directory asset paths are resolved against.
    pub fn with_asset_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.asset_base = base.into();
        self
    }

    /// Assets to load before any world runs.
    pub fn with_assets(mut self, assets: AssetTable) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_shaders(mut self, shaders: ShaderTable) -> Self {
        self.shaders = shaders;
        self
    }

    /// Sets the loader's worker pool size.
    ///
    /// Default: 4
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn with_loader_workers(mut self, workers: usize) -> Self {
        assert!(workers > 0, "Loader workers must be positive");
        self.workers = workers;
        self
    }

    /// Sets the fetch retry policy.
    ///
    /// # Panics
    ///
    /// Panics if `policy.max_attempts == 0`.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        assert!(policy.max_attempts > 0, "Retry policy needs at least one attempt");
        self.retry = policy;
        self
    }

    /// Asset names of the hand controller model and its texture.
    pub fn with_controller_assets(mut self, model: impl Into<String>, texture: impl Into<String>) -> Self {
        self.controller_assets = Some((model.into(), texture.into()));
        self
    }

    /// Replaces the default [`StatsRenderer`].
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine ({} assets, {} loader workers)",
            self.assets.len(),
            self.workers
        );

        Engine {
            window: WindowConfig {
                title: self.title,
                width: self.width,
                height: self.height,
            },
            loader: AssetLoader::new(self.asset_base)
                .with_workers(self.workers)
                .with_retry(self.retry),
            assets: self.assets,
            shaders: self.shaders,
            controller_assets: self.controller_assets,
            renderer: self
                .renderer
                .unwrap_or_else(|| Box::new(StatsRenderer::new())),
            worlds: WorldRegistry::new(),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// World Tour runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► AssetLoader (Loader Thread → worker pool)
///   │
///   └─► Platform (Event Loop)
///         └─► Runtime: WorldController + SharedContext
/// ```
pub struct Engine {
    window: WindowConfig,
    loader: AssetLoader,
    assets: AssetTable,
    shaders: ShaderTable,
    controller_assets: Option<(String, String)>,
    renderer: Box<dyn Renderer>,
    worlds: WorldRegistry,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Registers worlds before execution.
    ///
    /// Registration order is navigation order; world 0 is entered first.
    /// No lifecycle method runs until assets have loaded.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut WorldRegistry),
    {
        info!("Initializing worlds");

        init_fn(&mut self.worlds);

        info!("Registered {} worlds", self.worlds.len());
        self
    }

    pub fn worlds(&self) -> &WorldRegistry {
        &self.worlds
    }

    //--- Execution --------------------------------------------------------

    /// Starts loading, opens the window and blocks until it closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns the asset load on a background thread
    /// 2. Runs the platform event loop (blocks here)
    /// 3. Once assets are ready: setup all worlds, enter world 0
    /// 4. On window close: returns
    ///
    /// # Errors
    ///
    /// Platform failures, or the load/startup error that stopped the
    /// worlds from running.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime");

        //--- 1. Start loading ---------------------------------------------
        let handle = self.loader.spawn(self.assets);

        //--- 2. Launch the platform subsystem -----------------------------
        let platform = Platform::new(
            self.window,
            handle,
            PendingStart {
                worlds: self.worlds,
                shaders: self.shaders,
                controller_assets: self.controller_assets,
            },
            self.renderer,
        );
        info!("Platform initialized, entering event loop");

        let result = platform.run();

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world::testing::{call_log, RecordingWorld};
    use std::time::Duration;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.title, "World Tour");
        assert_eq!((builder.width, builder.height), (800, 600));
        assert_eq!(builder.workers, 4);
        assert_eq!(builder.retry, RetryPolicy::default());
        assert!(builder.assets.is_empty());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let assets = AssetTable::from_pairs([("font", "f.font"), ("tex", "f.png")]).unwrap();
        let retry = RetryPolicy {
            max_attempts: 5,
            backoff: Duration::from_millis(10),
        };

        let engine = EngineBuilder::new()
            .with_title("Tour")
            .with_window_size(1280, 720)
            .with_assets(assets)
            .with_loader_workers(8)
            .with_retry_policy(retry)
            .with_controller_assets("controller", "controller_tex")
            .build();

        assert_eq!(engine.window.title, "Tour");
        assert_eq!(engine.window.width, 1280);
        assert_eq!(engine.assets.len(), 2);
        assert_eq!(engine.loader.workers(), 8);
        assert_eq!(engine.loader.retry_policy(), retry);
        assert_eq!(
            engine.controller_assets,
            Some(("controller".to_string(), "controller_tex".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "Loader workers must be positive")]
    fn builder_zero_workers_panics() {
        EngineBuilder::new().with_loader_workers(0);
    }

    #[test]
    #[should_panic(expected = "at least one attempt")]
    fn builder_zero_attempts_panics() {
        EngineBuilder::new().with_retry_policy(RetryPolicy {
            max_attempts: 0,
            backoff: Duration::ZERO,
        });
    }

    #[test]
    #[should_panic(expected = "Window size must be non-zero")]
    fn builder_zero_window_panics() {
        EngineBuilder::new().with_window_size(0, 600);
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn init_registers_worlds_without_running_them() {
        let log = call_log();
        let engine = EngineBuilder::new().build().init(|worlds| {
            worlds.register(RecordingWorld::new("lobby", &log));
            worlds.register(RecordingWorld::new("gallery", &log));
        });

        assert_eq!(engine.worlds().names().collect::<Vec<_>>(), vec!["lobby", "gallery"]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn engine_error_wraps_sources() {
        let err: EngineError = WorldError::EmptyRegistry.into();
        assert!(err.to_string().contains("no worlds"));

        let err: EngineError = LoadError::LoaderLost.into();
        assert!(err.to_string().starts_with("asset loading failed"));
    }
}
