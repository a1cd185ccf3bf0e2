//! Frame timing

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Fixed(f32),
    Realtime(Instant),
}

/// Produces the `dt` fed to each simulation step
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: Mode,
    frame: u64,
    elapsed: f32,
}

impl FrameClock {
    /// Every tick advances by exactly `dt` seconds
    pub fn fixed(dt: f32) -> Self {
        Self {
            mode: Mode::Fixed(dt),
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Each tick returns the wall time since the previous one
    pub fn realtime() -> Self {
        Self {
            mode: Mode::Realtime(Instant::now()),
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Advance one frame and return its length in seconds
    pub fn tick(&mut self) -> f32 {
        let dt = match &mut self.mode {
            Mode::Fixed(dt) => *dt,
            Mode::Realtime(last) => {
                let now = Instant::now();
                let dt = now.duration_since(*last).as_secs_f32();
                *last = now;
                dt
            }
        };

        self.frame += 1;
        self.elapsed += dt;
        dt
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.mode, Mode::Fixed(_))
    }
}
