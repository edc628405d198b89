use std::time::Instant;

/// Longest frame step handed to the simulation, in seconds
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame clock - tracks delta time between redraws
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    elapsed: f32,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            elapsed: 0.0,
        }
    }

    /// Seconds since the last tick, capped at [`MAX_FRAME_DELTA`] so a
    /// stalled window does not teleport the camera
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32().min(MAX_FRAME_DELTA);
        self.last_tick = now;
        self.elapsed += delta;
        delta
    }

    /// Sum of all ticks so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames per second averaged over a fixed window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    interval: f32,
    frames: u32,
    timer: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            frames: 0,
            timer: 0.0,
            fps: 0.0,
        }
    }

    /// Counts one frame; returns true when a new average is available
    pub fn tick(&mut self, delta: f32) -> bool {
        self.frames += 1;
        self.timer += delta;

        if self.timer >= self.interval {
            self.fps = self.frames as f32 / self.timer;
            self.frames = 0;
            self.timer = 0.0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
