//! Simulation configuration.

use ped_core::SimClock;

use crate::{SimError, SimResult};

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate (enable
/// the `serde` feature) and passed to [`SimBuilder`](crate::SimBuilder).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seconds per iteration.  Must be small enough that no agent crosses a
    /// wall in one step at its maximum speed; this is not checked.
    pub dt: f64,

    /// Master seed for random branch decisions.  The same seed always
    /// produces identical runs.
    pub seed: u64,

    /// Worker thread count for the operational phase (`parallel` feature).
    /// `None` uses Rayon's global pool.
    pub num_threads: Option<usize>,

    /// Initial flag of every waiting set.  `true` means waiting sets hold
    /// agents until released with `notify_waiting_set(id, false)`.
    pub waiting_sets_start_active: bool,

    /// Grid cell size as a multiple of the model's neighbour cut-off.
    pub neighbor_cell_factor: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            seed: 0,
            num_threads: None,
            waiting_sets_start_active: true,
            neighbor_cell_factor: 1.0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::Config(format!("dt must be finite and > 0, got {}", self.dt)));
        }
        if !(self.neighbor_cell_factor.is_finite() && self.neighbor_cell_factor > 0.0) {
            return Err(SimError::Config(format!(
                "neighbor_cell_factor must be finite and > 0, got {}",
                self.neighbor_cell_factor
            )));
        }
        if self.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// A clock at iteration 0 with this configuration's step.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt)
    }
}
