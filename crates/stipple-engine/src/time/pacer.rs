use std::time::{Duration, Instant};

/// Frame rate cap used when none is configured.
pub const DEFAULT_TARGET_FPS: u32 = 120;

/// Caps the frame rate by sleeping off whatever is left of each frame's
/// time budget.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FramePacer {
    interval: Duration,
}

impl FramePacer {
    /// Pacer for `fps` frames per second. `0` disables pacing.
    pub fn from_fps(fps: u32) -> Self {
        let interval = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / fps
        };
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time still to wait after a frame that took `spent`.
    pub fn remaining(&self, spent: Duration) -> Duration {
        self.interval.saturating_sub(spent)
    }

    /// Blocks until the budget of a frame that began at `frame_start` is used up.
    pub fn wait(&self, frame_start: Instant) {
        let left = self.remaining(frame_start.elapsed());
        if !left.is_zero() {
            std::thread::sleep(left);
        }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::from_fps(DEFAULT_TARGET_FPS)
    }
}
