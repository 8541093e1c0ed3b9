//! Simulation time model.
//!
//! Time is a monotonically increasing `Iteration` counter plus a fixed step
//! `dt` in seconds.  Simulated time is `iteration * dt`; there is no notion
//! of wall-clock time beyond that.

use std::fmt;

// ── Iteration ────────────────────────────────────────────────────────────────

/// Number of completed `iterate()` calls.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iteration(pub u64);

impl Iteration {
    pub const ZERO: Iteration = Iteration(0);

    /// `true` every `n`-th iteration (and never for `n == 0`).
    #[inline]
    pub fn is_multiple_of(self, n: u64) -> bool {
        n != 0 && self.0 % n == 0
    }
}

impl std::ops::Add<u64> for Iteration {
    type Output = Iteration;
    #[inline]
    fn add(self, rhs: u64) -> Iteration {
        Iteration(self.0 + rhs)
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Fixed-step clock.  Cheap to copy; holds no heap data.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds per iteration.
    pub dt: f64,
    /// Completed iterations.
    pub iteration: Iteration,
}

impl SimClock {
    pub fn new(dt: f64) -> Self {
        Self { dt, iteration: Iteration::ZERO }
    }

    /// Advance the clock by one iteration.
    #[inline]
    pub fn advance(&mut self) {
        self.iteration = self.iteration + 1;
    }

    /// Simulated seconds since iteration 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.iteration.0 as f64 * self.dt
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.3} s)", self.iteration, self.elapsed_secs())
    }
}
