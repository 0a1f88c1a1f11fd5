//! Frame timing for debug builds.
//!
//! The viewer only redraws on demand, so the reported rate is redraws per
//! second over the last window, not a display refresh rate.

use std::time::{Duration, Instant};

pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frames: u32,
    pub fps: f64,
    pub avg_frame_ms: f64,
    pub max_frame_ms: f64,
}

#[derive(Debug, Clone)]
pub struct FrameTimer {
    interval: Duration,
    window_start: Instant,
    frames: u32,
    busy: Duration,
    worst: Duration,
}

impl FrameTimer {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, REPORT_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            window_start: now,
            frames: 0,
            busy: Duration::ZERO,
            worst: Duration::ZERO,
        }
    }

    /// Adds one frame that took `frame_time` and finished at `now`. Returns a
    /// report and starts a new window once `interval` has elapsed.
    pub fn record(&mut self, frame_time: Duration, now: Instant) -> Option<FrameReport> {
        self.frames += 1;
        self.busy += frame_time;
        self.worst = self.worst.max(frame_time);

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }

        let report = FrameReport {
            frames: self.frames,
            fps: self.frames as f64 / elapsed.as_secs_f64(),
            avg_frame_ms: self.busy.as_secs_f64() * 1000.0 / self.frames as f64,
            max_frame_ms: self.worst.as_secs_f64() * 1000.0,
        };
        self.window_start = now;
        self.frames = 0;
        self.busy = Duration::ZERO;
        self.worst = Duration::ZERO;
        Some(report)
    }
}
