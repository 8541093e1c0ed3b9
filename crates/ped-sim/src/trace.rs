//! Per-iteration timing record.

use std::time::Duration;

/// Wall-clock timings of the last `iterate()` call.  Overwritten every
/// iteration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    /// The whole call.
    pub iteration_duration: Duration,
    /// The operational-model phase only.
    pub operational_level_duration: Duration,
}

impl Trace {
    /// Share of the iteration spent in the operational model, in `[0, 1]`.
    pub fn operational_share(&self) -> f64 {
        if self.iteration_duration.is_zero() {
            return 0.0;
        }
        self.operational_level_duration.as_secs_f64() / self.iteration_duration.as_secs_f64()
    }
}
