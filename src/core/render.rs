//=========================================================================
// Renderer Seam
//=========================================================================
//
// The runtime draws through `Renderer` after each tick. GPU backends live
// outside this crate; `StatsRenderer` is the built-in stand-in that only
// counts work and reports it periodically.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::scene::{Camera, SceneRoot};

//=== Renderer ============================================================

pub trait Renderer {
    /// Draws the scene from the camera's point of view.
    fn render(&mut self, scene: &SceneRoot, camera: &Camera);

    /// Surface size changed.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

//=== StatsRenderer =======================================================

const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Counts render calls and logs a summary every reporting interval.
#[derive(Debug)]
pub struct StatsRenderer {
    interval: Duration,
    window_start: Instant,
    frames: u64,
    nodes: u64,
    reports: u64,
}

impl Default for StatsRenderer {
    fn default() -> Self {
        Self::with_interval(DEFAULT_REPORT_INTERVAL)
    }
}

impl StatsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            window_start: Instant::now(),
            frames: 0,
            nodes: 0,
            reports: 0,
        }
    }

    /// Frames rendered since the last report.
    pub fn frames_in_window(&self) -> u64 {
        self.frames
    }

    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl Renderer for StatsRenderer {
    fn render(&mut self, scene: &SceneRoot, _camera: &Camera) {
        self.frames += 1;
        self.nodes += scene.len() as u64;

        let window = self.window_start.elapsed();
        if window >= self.interval {
            info!(
                target: "render",
                "{} frames in {:.1}s, {:.1} nodes/frame",
                self.frames,
                window.as_secs_f32(),
                self.nodes as f32 / self.frames as f32
            );
            self.frames = 0;
            self.nodes = 0;
            self.reports += 1;
            self.window_start = Instant::now();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        info!(target: "render", "Surface resized to {}x{}", width, height);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
