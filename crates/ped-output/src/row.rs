//! Plain row types written by the backends.

/// Position and heading of one agent in one recorded frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub iteration: u64,
    pub agent_id:  u64,
    pub x:         f64,
    pub y:         f64,
    pub ori_x:     f64,
    pub ori_y:     f64,
}

/// Per-frame summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRow {
    pub iteration:      u64,
    /// Simulated seconds since the start.
    pub time_secs:      f64,
    pub agent_count:    u64,
    /// Wall-clock cost of the iteration that produced this frame.
    pub duration_us:    u64,
    /// Share of `duration_us` spent in the operational model.
    pub operational_us: u64,
}
