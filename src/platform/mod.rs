//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the world runtime.
//
// Architecture:
// ```text
//  Main Thread:                          Loader Thread:
//  ┌───────────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop             │    │  AssetLoader     │
//  │   ↓                           │    │   ├─ workers     │
//  │  HostState::Loading ──poll────┼────┤   └─ registry    │
//  │   ↓ Ready                     │    └──────────────────┘
//  │  HostState::Running(Runtime)  │
//  │   ├─ InputProcessor → route   │
//  │   └─ RedrawRequested:         │
//  │        frame() → render()     │
//  │   ↓ Load/start error          │
//  │  HostState::Failed            │
//  └───────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: one tick and one render per
//   redraw, then the next redraw is requested
// - **Non-blocking load**: the loader runs on its own thread and is polled
//   each redraw; no world is set up until every asset resolved
// - **Terminal failure**: a load or start error is logged, shown in the
//   window title and returned from `run()` once the window closes
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::assets::{AssetRegistry, LoadHandle, LoadStatus};
use crate::core::globals::{Runtime, SharedContext};
use crate::core::input::InputEvent;
use crate::core::render::Renderer;
use crate::core::scene::ShaderTable;
use crate::core::world::WorldRegistry;
use crate::engine::EngineError;
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: if the event loop can't be created, nothing runs.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error (rare, indicates corruption).
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== Configuration =======================================================

/// Window settings.
#[derive(Debug, Clone)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Everything needed to start the worlds once assets arrive.
pub(crate) struct PendingStart {
    pub worlds: WorldRegistry,
    pub shaders: ShaderTable,
    pub controller_assets: Option<(String, String)>,
}

//=== HostState ===========================================================

enum HostState {
    /// Assets are loading; worlds are untouched.
    Loading {
        handle: LoadHandle,
        pending: PendingStart,
    },

    /// Worlds are running.
    Running(Runtime),

    /// Terminal: loading or startup failed.
    Failed,
}

//=== Platform ============================================================

/// Window manager and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(...)` with a running load handle
/// 2. **Execution**: `platform.run()` starts the event loop
/// 3. **Loading**: each redraw polls the loader
/// 4. **Running**: each redraw ticks and renders the worlds
/// 5. **Shutdown**: user closes window → `run()` returns
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform {
    config: WindowConfig,

    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    state: HostState,
    error: Option<EngineError>,

    renderer: Box<dyn Renderer>,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates a platform around an in-flight asset load.
    ///
    /// Does not create window yet - that happens lazily in `resumed()`.
    pub fn new(
        config: WindowConfig,
        handle: LoadHandle,
        pending: PendingStart,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            config,
            window: None,
            state: HostState::Loading { handle, pending },
            error: None,
            renderer,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Platform`] if the event loop cannot be created or
    ///   aborts
    /// - the load or startup error that put the host into its failed state
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), EngineError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    //--- State Transitions ------------------------------------------------

    /// Polls the loader; starts the worlds once the registry is ready.
    fn poll_loading(&mut self) {
        let HostState::Loading { handle, .. } = &self.state else {
            return;
        };

        match handle.poll() {
            LoadStatus::Pending => {}
            LoadStatus::Ready(assets) => {
                if let HostState::Loading { pending, .. } =
                    std::mem::replace(&mut self.state, HostState::Failed)
                {
                    self.start_runtime(assets, pending);
                }
            }
            LoadStatus::Failed(err) => self.fail(err.into()),
        }
    }

    fn start_runtime(&mut self, assets: AssetRegistry, pending: PendingStart) {
        let mut context = SharedContext::new(assets, pending.shaders);

        if let Some((model, texture)) = &pending.controller_assets {
            context.equip_controllers(model, texture);
        }
        if let Some(window) = &self.window {
            let size = window.inner_size();
            context.camera_mut().set_aspect(size.width, size.height);
        }
        // The cursor may have been grabbed while assets were loading.
        if self.input_processor.is_pointer_locked() {
            context.camera_mut().lock_pointer();
        }

        match Runtime::start(pending.worlds, context) {
            Ok(runtime) => {
                info!(
                    target: "platform",
                    "Assets ready, running world `{}`",
                    runtime.controller().current_name()
                );
                self.state = HostState::Running(runtime);
            }
            Err(err) => self.fail(err.into()),
        }
    }

    fn fail(&mut self, err: EngineError) {
        error!(target: "platform", "Startup failed: {}", err);

        if let Some(window) = &self.window {
            window.set_title(&format!("{} - {}", self.config.title, err));
        }

        self.state = HostState::Failed;
        self.error = Some(err);
    }

    //--- Frame ------------------------------------------------------------

    fn redraw(&mut self) {
        self.poll_loading();

        if let HostState::Running(runtime) = &mut self.state {
            runtime.frame();
            runtime.render(self.renderer.as_mut());
        }

        if !matches!(self.state, HostState::Failed) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    //--- Input ------------------------------------------------------------

    fn route(&mut self, event: InputEvent) {
        match &mut self.state {
            HostState::Running(runtime) => {
                runtime.handle_input(&event);
            }
            _ => trace!(target: "platform::input", "Dropped {:?}, worlds not running", event),
        }
    }

    fn lock_pointer(&mut self) {
        if self.input_processor.is_pointer_locked() {
            return;
        }
        let Some(window) = &self.window else {
            return;
        };

        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                let event = self.input_processor.set_pointer_locked(true);
                self.route(event);
            }
            Err(e) => warn!(target: "platform::input", "Pointer lock unavailable: {}", e),
        }
    }

    fn unlock_pointer(&mut self) {
        if !self.input_processor.is_pointer_locked() {
            return;
        }
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!(target: "platform::input", "Failed to release pointer: {}", e);
            }
            window.set_cursor_visible(true);
        }
        let event = self.input_processor.set_pointer_locked(false);
        self.route(event);
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.renderer.resize(size.width, size.height);
                if let HostState::Running(runtime) = &mut self.state {
                    runtime.context_mut().camera_mut().set_aspect(size.width, size.height);
                }
            }

            WindowEvent::Focused(false) => self.unlock_pointer(),

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == ElementState::Pressed
                    && key_event.physical_key == PhysicalKey::Code(WinitKeyCode::Escape)
                {
                    self.unlock_pointer();
                }

                if let Some(event) = self.input_processor.process_key_event(&key_event) {
                    self.route(event);
                } else {
                    trace!(target: "platform::input", "Unbound key event ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left && state == ElementState::Pressed {
                    self.lock_pointer();
                }
                if let Some(event) = self.input_processor.process_mouse_button(button, state) {
                    self.route(event);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }

    /// Raw device motion drives the camera while the pointer is locked.
    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let Some(event) = self.input_processor.process_mouse_motion(dx, dy) {
                self.route(event);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
