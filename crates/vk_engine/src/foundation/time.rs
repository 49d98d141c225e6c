//! Frame timing

use std::time::Instant;

/// Per-frame clock tracking delta and total elapsed time
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    delta: f32,
}

impl Clock {
    /// Create a clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            delta: 0.0,
        }
    }

    /// Advance the clock and return the seconds elapsed since the last tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.delta
    }

    /// Seconds elapsed during the most recent tick
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Total seconds since the clock was created
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_delta() {
        let mut clock = Clock::new();
        assert_eq!(clock.delta(), 0.0);

        std::thread::sleep(std::time::Duration::from_millis(5));
        let delta = clock.tick();
        assert!(delta > 0.0);
        assert_eq!(clock.delta(), delta);
        assert!(clock.elapsed() >= delta);
    }
}
