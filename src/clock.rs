//! Per-surface animation driver.
//!
//! At most one frame request is outstanding at a time. A tick consumes the
//! request, advances the elapsed time by a fixed step, paints, and re-arms
//! only while the surface is visible. Frames missed while stopped are never
//! replayed.

/// Nominal time advanced per tick, in seconds.
pub const DEFAULT_STEP: f64 = 0.016;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Idle,
    Armed,
    Detached,
}

#[derive(Debug)]
pub struct AnimationClock {
    elapsed: f64,
    step: f64,
    state: ClockState,
    frames: u64,
}

impl AnimationClock {
    pub fn new(step: f64) -> Self {
        Self {
            elapsed: 0.0,
            step: if step.is_finite() && step > 0.0 { step } else { DEFAULT_STEP },
            state: ClockState::Idle,
            frames: 0,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of frames painted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.state == ClockState::Armed
    }

    pub fn is_detached(&self) -> bool {
        self.state == ClockState::Detached
    }

    /// Arm a frame request if none is outstanding. No effect once detached.
    pub fn start(&mut self) {
        if self.state == ClockState::Idle {
            self.state = ClockState::Armed;
        }
    }

    /// Cancel the outstanding request, keeping the elapsed time.
    pub fn stop(&mut self) {
        if self.state == ClockState::Armed {
            self.state = ClockState::Idle;
        }
    }

    /// Cancel permanently; later `start`/`tick` calls do nothing.
    pub fn teardown(&mut self) {
        self.state = ClockState::Detached;
    }

    /// Service the outstanding request, if any. Returns whether `paint` ran.
    pub fn tick<F>(&mut self, visible: bool, paint: F) -> bool
    where
        F: FnOnce(f64),
    {
        if self.state != ClockState::Armed {
            return false;
        }
        self.state = ClockState::Idle;

        self.elapsed += self.step;
        self.frames += 1;
        paint(self.elapsed);

        if visible {
            self.state = ClockState::Armed;
        }
        true
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_accumulate_fixed_steps() {
        let mut clock = AnimationClock::new(0.5);
        clock.start();
        let mut seen = Vec::new();
        for _ in 0..3 {
            clock.tick(true, |t| seen.push(t));
        }
        assert_eq!(seen, vec![0.5, 1.0, 1.5]);
        assert_eq!(clock.frames(), 3);
    }

    #[test]
    fn nothing_happens_before_start() {
        let mut clock = AnimationClock::default();
        assert!(!clock.tick(true, |_| panic!("painted without a request")));
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn invisible_tick_does_not_rearm() {
        let mut clock = AnimationClock::new(1.0);
        clock.start();
        assert!(clock.tick(false, |_| {}));
        assert!(!clock.is_pending());
        assert!(!clock.tick(true, |_| panic!("frame after visibility loss")));
    }

    #[test]
    fn stop_cancels_pending_frame_and_resume_continues() {
        let mut clock = AnimationClock::new(1.0);
        clock.start();
        clock.tick(true, |_| {});
        clock.stop();
        for _ in 0..10 {
            assert!(!clock.tick(true, |_| panic!("frame while stopped")));
        }
        clock.start();
        let mut t = 0.0;
        clock.tick(true, |e| t = e);
        assert_eq!(t, 2.0);
    }

    #[test]
    fn teardown_is_final() {
        let mut clock = AnimationClock::new(1.0);
        clock.start();
        clock.teardown();
        clock.start();
        assert!(clock.is_detached());
        assert!(!clock.tick(true, |_| panic!("frame after teardown")));
    }

    #[test]
    fn invalid_step_falls_back_to_default() {
        assert_eq!(AnimationClock::new(0.0).step(), DEFAULT_STEP);
        assert_eq!(AnimationClock::new(f64::NAN).step(), DEFAULT_STEP);
    }

    #[test]
    fn start_twice_keeps_single_request() {
        let mut clock = AnimationClock::new(1.0);
        clock.start();
        clock.start();
        assert!(clock.tick(false, |_| {}));
        assert!(!clock.tick(false, |_| {}));
    }
}
