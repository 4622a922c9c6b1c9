/// Fixed timestep simulation clock
///
/// Wall-clock frame time is accumulated and turned into a whole number of
/// fixed physics steps, so the simulation advances at the same rate no matter
/// how fast frames are produced.
use std::time::{Duration, Instant};

/// Default physics rate (60 steps per second)
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of physics steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Simulation timing state
pub struct GameLoop {
    /// Length of one fixed step
    timestep: Duration,

    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total steps executed
    step_count: u64,
}

impl GameLoop {
    /// Create a clock stepping every `timestep` seconds
    pub fn new(timestep: f32) -> Self {
        Self {
            timestep: Duration::from_secs_f32(timestep.max(1e-4)),
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            step_count: 0,
        }
    }

    /// Begin a new frame, returns the number of fixed steps to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of wall-clock time, returns the steps owed
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // Paused time is dropped, not banked
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.timestep && steps < MAX_PHYSICS_STEPS {
            self.accumulator -= self.timestep;
            steps += 1;
        }

        // Whatever is left after hitting the cap is discarded
        if steps == MAX_PHYSICS_STEPS {
            self.accumulator = self.accumulator.min(self.timestep);
        }

        self.step_count += steps as u64;
        steps
    }

    /// Length of one fixed step in seconds
    pub fn timestep(&self) -> f32 {
        self.timestep.as_secs_f32()
    }

    /// Interpolation factor between the last two steps
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / self.timestep()).min(1.0)
    }

    /// Get total number of frames seen
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of steps handed out
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Check if the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTEP)
    }
}
