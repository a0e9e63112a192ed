//=========================================================================
// Clock & Fixed Timestep
//=========================================================================
//
// Monotonic tick source and the fixed-step accumulator driven by it.
//
// Architecture:
//   Clock::ticks() ──► clamp_elapsed() ──► FixedTimestep::accumulate()
//                                                 ↓
//                               next_step() → (t, dt) while ≥ dt pending
//
// All times are integer milliseconds so the N-th step always sees
// t = (N-1) * dt exactly, regardless of how real time was sampled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::time::Instant;

//=== Defaults ============================================================

/// Default simulation step, in milliseconds.
pub const DEFAULT_FIXED_STEP_MS: u64 = 10;

/// Default stall guard: the most real time a single iteration may feed
/// into the accumulator, in milliseconds.
pub const DEFAULT_MAX_FRAME_DELTA_MS: u64 = 250;

//=== Clock Trait =========================================================

/// Monotonic millisecond tick counter, sampled once per loop iteration.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Never decreases.
    fn ticks(&mut self) -> u64;
}

//=== SystemClock =========================================================

/// Wall-clock [`Clock`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn ticks(&mut self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

//=== ManualClock =========================================================

/// Scripted [`Clock`] for replays and tests.
///
/// The first sample reads the current time unchanged; every later sample
/// first advances by the next scripted delta, or by `fallback` once the
/// script runs out.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: u64,
    started: bool,
    deltas: VecDeque<u64>,
    fallback: u64,
}

impl ManualClock {
    /// Clock that never advances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that advances by each of `deltas` in turn, then by `fallback`.
    pub fn scripted(deltas: impl IntoIterator<Item = u64>, fallback: u64) -> Self {
        Self {
            now: 0,
            started: false,
            deltas: deltas.into_iter().collect(),
            fallback,
        }
    }

    /// Clock that advances by the same amount on every sample.
    pub fn steady(delta: u64) -> Self {
        Self::scripted(std::iter::empty(), delta)
    }
}

impl Clock for ManualClock {
    fn ticks(&mut self) -> u64 {
        if self.started {
            let delta = self.deltas.pop_front().unwrap_or(self.fallback);
            self.now = self.now.saturating_add(delta);
        } else {
            self.started = true;
        }
        self.now
    }
}

//=== LoopConfig ==========================================================

/// Timing parameters of the scene loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Length of one simulation step (`dt`), in milliseconds.
    pub fixed_step_ms: u64,

    /// Upper bound on the real time one iteration may contribute.
    pub max_frame_delta_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fixed_step_ms: DEFAULT_FIXED_STEP_MS,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
        }
    }
}

//=== FixedTimestep =======================================================

/// Fixed-step accumulator.
///
/// Leftover time below one step carries to the next iteration. It is not
/// used for render interpolation.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: u64,
    max_frame_delta: u64,
    accumulator: u64,
    t: u64,
}

impl FixedTimestep {
    /// Creates an accumulator at `t = 0`.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_step_ms == 0`.
    pub fn new(config: LoopConfig) -> Self {
        assert!(config.fixed_step_ms > 0, "Fixed step must be positive");
        Self {
            dt: config.fixed_step_ms,
            max_frame_delta: config.max_frame_delta_ms,
            accumulator: 0,
            t: 0,
        }
    }

    /// Applies the stall guard to a raw elapsed sample.
    pub fn clamp_elapsed(&self, elapsed: u64) -> u64 {
        elapsed.min(self.max_frame_delta)
    }

    /// Adds an already-clamped elapsed sample to the accumulator.
    pub fn accumulate(&mut self, elapsed: u64) {
        self.accumulator = self.accumulator.saturating_add(elapsed);
    }

    /// Consumes one step if available, returning `(t, dt)` for it.
    pub fn next_step(&mut self) -> Option<(u64, u64)> {
        if self.accumulator < self.dt {
            return None;
        }
        let step = (self.t, self.dt);
        self.t += self.dt;
        self.accumulator -= self.dt;
        Some(step)
    }

    /// Simulation time reached so far.
    pub fn time(&self) -> u64 {
        self.t
    }

    /// Time accumulated but not yet simulated (always `< dt` after draining).
    pub fn pending(&self) -> u64 {
        self.accumulator
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
