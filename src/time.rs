//! Clocks and frame timing.
//!
//! Everything time-dependent in the simulation (the convergence timeline,
//! demo cues) reads time through the [`Clock`] trait as a monotonic
//! [`Duration`] since the clock started. The viewer uses [`SystemClock`];
//! tests use [`ManualClock`] and step time explicitly.
//!
//! # Example
//!
//! ```ignore
//! use biasfield::time::{Clock, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! clock.advance(Duration::from_millis(16));
//! assert_eq!(clock.now(), Duration::from_millis(16));
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, now: Duration) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Frame counter with delta time and a periodically refreshed FPS figure.
#[derive(Debug)]
pub struct FrameStats {
    last_frame: Option<Duration>,
    delta: Duration,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Duration,
    fps_update_interval: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Duration::ZERO,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame at `now`. Returns the delta since the previous frame.
    pub fn tick(&mut self, now: Duration) -> Duration {
        self.delta = match self.last_frame {
            Some(last) => now.saturating_sub(last),
            None => {
                self.fps_update_time = now;
                Duration::ZERO
            }
        };
        self.last_frame = Some(now);
        self.frame_count += 1;

        let fps_elapsed = now.saturating_sub(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now();
        thread::sleep(Duration::from_millis(5));
        assert!(clock.now() > a);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));

        // Backwards jumps are ignored
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn test_frame_stats_fps() {
        let mut stats = FrameStats::new();
        let mut now = Duration::ZERO;
        for _ in 0..=60 {
            stats.tick(now);
            now += Duration::from_micros(16_667);
        }
        assert_eq!(stats.frame(), 61);
        assert_eq!(stats.delta(), Duration::from_micros(16_667));
        assert!((stats.fps() - 60.0).abs() < 2.0, "fps {}", stats.fps());
    }
}
