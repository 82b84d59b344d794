//=========================================================================
// Frame Timing
//=========================================================================
//
// Variable frame delta and fixed-step accumulation.
//
// Architecture:
//   FrameTimer ──tick()──> raw delta ──clamp(max_frame_delta)──> delta
//                                                │
//   FixedStepper ◄──accumulate(delta)────────────┘
//        └─ take_steps() → number of fixed passes this frame (capped)
//
// The clock can be real time or a fixed simulated delta; the latter makes
// headless runs deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::warn;

//=== FrameTime ===========================================================

/// Timing snapshot handed to hooks.
///
/// All values are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Clamped wall time since the previous frame.
    pub delta: f64,

    /// Length of one fixed step.
    pub fixed_delta: f64,

    /// Simulated time elapsed in this run (excludes paused frames).
    pub elapsed: f64,

    /// Frames completed in this run before the current one.
    pub frame: u64,

    /// Fixed steps executed so far in this run.
    pub fixed_steps: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        Self {
            delta: 0.0,
            fixed_delta: 1.0 / 60.0,
            elapsed: 0.0,
            frame: 0,
            fixed_steps: 0,
        }
    }
}

//=== Clock ===============================================================

/// Source of frame deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Measure wall time between frames.
    Realtime,

    /// Pretend every frame took exactly this long.
    Simulated(Duration),
}

//=== FrameTimer ==========================================================

/// Measures per-frame deltas and clamps spikes.
#[derive(Debug)]
pub(crate) struct FrameTimer {
    clock: Clock,
    max_frame_delta: Duration,
    last: Option<Instant>,
}

impl FrameTimer {
    pub(crate) fn new(clock: Clock, max_frame_delta: Duration) -> Self {
        Self {
            clock,
            max_frame_delta,
            last: None,
        }
    }

    /// Delta since the previous call, clamped to `max_frame_delta`.
    ///
    /// The first call on a realtime clock returns zero.
    pub(crate) fn tick(&mut self) -> Duration {
        let raw = match self.clock {
            Clock::Simulated(step) => step,
            Clock::Realtime => {
                let now = Instant::now();
                let raw = self.last.map_or(Duration::ZERO, |last| now - last);
                self.last = Some(now);
                raw
            }
        };

        raw.min(self.max_frame_delta)
    }
}

//=== FixedStepper ========================================================

/// Fixed-timestep accumulator with a per-frame step cap.
#[derive(Debug)]
pub(crate) struct FixedStepper {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
}

impl FixedStepper {
    pub(crate) fn new(step: Duration, max_steps: u32) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    pub(crate) fn step(&self) -> Duration {
        self.step
    }

    pub(crate) fn accumulate(&mut self, delta: Duration) {
        self.accumulator += delta;
    }

    /// Consumes one step if enough time has accumulated.
    pub(crate) fn try_consume(&mut self) -> bool {
        if self.accumulator >= self.step {
            self.accumulator -= self.step;
            true
        } else {
            false
        }
    }

    /// Consumes as many whole steps as are due, up to the cap.
    ///
    /// Time beyond the cap is dropped so a long stall cannot snowball
    /// into ever longer frames.
    pub(crate) fn take_steps(&mut self) -> u32 {
        let mut steps = 0;
        while steps < self.max_steps && self.try_consume() {
            steps += 1;
        }

        if self.accumulator >= self.step {
            let dropped = self.accumulator.as_secs_f64() / self.step.as_secs_f64();
            warn!(
                target: "game",
                "Fixed step cap ({}) reached, dropping {:.1} steps of backlog",
                self.max_steps, dropped.floor()
            );
            self.accumulator = Duration::from_nanos(
                (self.accumulator.as_nanos() % self.step.as_nanos().max(1)) as u64,
            );
        }

        steps
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> Duration {
        self.accumulator
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    //=====================================================================
    // FrameTimer
    //=====================================================================

    #[test]
    fn simulated_clock_returns_fixed_delta() {
        let mut timer = FrameTimer::new(Clock::Simulated(ms(16)), ms(250));

        assert_eq!(timer.tick(), ms(16));
        assert_eq!(timer.tick(), ms(16));
    }

    #[test]
    fn delta_is_clamped_to_max_frame_delta() {
        let mut timer = FrameTimer::new(Clock::Simulated(ms(900)), ms(250));

        assert_eq!(timer.tick(), ms(250));
    }

    #[test]
    fn realtime_clock_first_tick_is_zero() {
        let mut timer = FrameTimer::new(Clock::Realtime, ms(250));

        assert_eq!(timer.tick(), Duration::ZERO);
    }

    //=====================================================================
    // FixedStepper
    //=====================================================================

    #[test]
    fn accumulates_until_a_step_is_due() {
        let mut stepper = FixedStepper::new(ms(10), 8);

        stepper.accumulate(ms(6));
        assert_eq!(stepper.take_steps(), 0);

        stepper.accumulate(ms(6));
        assert_eq!(stepper.take_steps(), 1);
        assert_eq!(stepper.pending(), ms(2));
    }

    #[test]
    fn multiple_steps_in_one_frame() {
        let mut stepper = FixedStepper::new(ms(10), 8);

        stepper.accumulate(ms(35));

        assert_eq!(stepper.take_steps(), 3);
        assert_eq!(stepper.pending(), ms(5));
    }

    #[test]
    fn step_cap_drops_backlog_but_keeps_remainder() {
        let mut stepper = FixedStepper::new(ms(10), 2);

        stepper.accumulate(ms(57));

        assert_eq!(stepper.take_steps(), 2);
        assert_eq!(stepper.pending(), ms(7));
    }

    #[test]
    fn step_count_tracks_simulated_time_under_variable_deltas() {
        let mut stepper = FixedStepper::new(ms(20), 16);
        let deltas = [3, 17, 41, 9, 25, 33, 1, 60, 12, 19];
        let mut total_ms = 0;
        let mut steps = 0;

        for _ in 0..50 {
            for &d in &deltas {
                total_ms += d;
                stepper.accumulate(ms(d));
                steps += stepper.take_steps() as u64;
            }
        }

        let expected = total_ms / 20;
        assert!(steps + 1 >= expected && steps <= expected + 1, "{steps} vs {expected}");
    }

    #[test]
    fn default_timing_keeps_every_step_across_long_frames() {
        let timing = crate::engine::TimingConfig::default();
        let mut stepper = FixedStepper::new(timing.fixed_step(), timing.max_fixed_steps());
        let max = timing.max_frame_delta();
        let raw = [5, 200, 31, 240, 900, 249, 16, 250, 3, 400, 120, 251];
        let mut total = Duration::ZERO;
        let mut steps = 0u64;

        for _ in 0..40 {
            for &d in &raw {
                let mut timer = FrameTimer::new(Clock::Simulated(ms(d)), max);
                let delta = timer.tick();
                total += delta;
                stepper.accumulate(delta);
                steps += u64::from(stepper.take_steps());
            }
        }

        let expected = (total.as_secs_f64() / timing.fixed_step().as_secs_f64()).floor() as u64;
        assert!(steps + 1 >= expected && steps <= expected + 1, "{steps} vs {expected}");
    }
}
