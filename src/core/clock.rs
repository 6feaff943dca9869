//=========================================================================
// Frame Clock
//=========================================================================

use std::time::Instant;

/// Timing passed to `World::execute`, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub delta: f32,
    pub elapsed: f32,
}

/// Measures frame deltas and time since start.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    /// Advances to now.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let time = FrameTime {
            delta: (now - self.last).as_secs_f32(),
            elapsed: (now - self.start).as_secs_f32(),
        };
        self.last = now;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
