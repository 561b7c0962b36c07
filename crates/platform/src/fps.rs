//! Frames-per-second counter for `--show-fps`.

use std::time::{Duration, Instant};

pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
    interval: Duration,
}

impl FpsCounter {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    fn starting_at(now: Instant, interval: Duration) -> Self {
        Self {
            frames: 0,
            window_start: now,
            interval,
        }
    }

    /// Count a presented frame. Returns the average FPS once per interval.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}
