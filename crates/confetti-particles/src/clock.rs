//! Wall clock that turns frame callbacks into elapsed emission time

use std::time::{Duration, Instant};

/// Measures milliseconds since an animation started.
///
/// Hosts with their own frame timing can skip this and feed `tick` directly.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    started_at: Option<Instant>,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self { started_at: None }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Milliseconds since `start`, or `None` when stopped
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.elapsed_ms_at(Instant::now())
    }

    pub fn elapsed_ms_at(&self, now: Instant) -> Option<u64> {
        let started = self.started_at?;
        let elapsed = now.saturating_duration_since(started);
        Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    /// Time until the next frame at `fps`, for hosts running their own loop
    pub fn frame_interval(fps: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
    }
}
