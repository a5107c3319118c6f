/// Converts real elapsed frame time into the simulation `dt`.
///
/// The simulation advances exactly once per rendered frame. Long stalls
/// (window drags, debugger pauses) are clamped so a single tick can never
/// move a body further than a few frames' worth of velocity.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// Target duration of one frame in seconds.
    target_dt: f32,
    /// Upper bound for a single tick.
    max_dt: f32,
}

impl FrameClock {
    /// Clock for the given target frame rate. `max_dt` defaults to three frames.
    pub fn new(target_fps: f32) -> Self {
        let target_dt = 1.0 / target_fps.max(1.0);
        Self {
            target_dt,
            max_dt: target_dt * 3.0,
        }
    }

    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt.max(self.target_dt);
        self
    }

    /// Simulation dt for a frame that took `elapsed` seconds.
    pub fn frame_dt(&self, elapsed: f32) -> f32 {
        if !elapsed.is_finite() {
            return self.target_dt;
        }
        elapsed.clamp(0.0, self.max_dt)
    }

    /// Same as [`frame_dt`](Self::frame_dt) for a millisecond frame time.
    pub fn frame_dt_ms(&self, elapsed_ms: u32) -> f32 {
        self.frame_dt(elapsed_ms as f32 / 1000.0)
    }

    pub fn target_dt(&self) -> f32 {
        self.target_dt
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}

/// Countdown timer used for cooldowns and damage windows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// (Re)start the countdown.
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Advance by `dt`, stopping at zero.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_ready(&self) -> bool {
        !self.is_running()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_dt_passes_normal_frames_through() {
        let clock = FrameClock::new(60.0);
        let dt = clock.frame_dt(1.0 / 60.0);
        assert!((dt - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn frame_dt_clamps_stalls() {
        let clock = FrameClock::new(60.0);
        let dt = clock.frame_dt(2.0);
        assert!((dt - 3.0 / 60.0).abs() < 1e-6, "dt was {}", dt);
        assert_eq!(clock.frame_dt(-1.0), 0.0);
        assert!((clock.frame_dt(f32::NAN) - clock.target_dt()).abs() < 1e-6);
    }

    #[test]
    fn frame_dt_from_milliseconds() {
        let clock = FrameClock::new(60.0).with_max_dt(0.1);
        assert!((clock.frame_dt_ms(16) - 0.016).abs() < 1e-6);
        assert!((clock.frame_dt_ms(500) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn cooldown_counts_down_to_zero() {
        let mut cd = Cooldown::new();
        assert!(cd.is_ready());
        cd.start(0.5);
        assert!(cd.is_running());
        cd.tick(0.3);
        assert!(cd.is_running());
        cd.tick(0.3);
        assert!(cd.is_ready());
        assert_eq!(cd.remaining(), 0.0);
    }
}
