//! `TrajectoryObserver<W>` — records simulation frames into a
//! [`TrajectoryWriter`].

use ped_core::Iteration;
use ped_sim::{SimObserver, Simulation};

use crate::row::{IterationRow, TrajectoryRow};
use crate::writer::TrajectoryWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every `every_nth` frame to `W`.
///
/// Observer hooks cannot fail, so the first write error is kept and can be
/// retrieved with [`take_error`][Self::take_error] once the run returns.
pub struct TrajectoryObserver<W: TrajectoryWriter> {
    writer:     W,
    every_nth:  u64,
    frames:     u64,
    last_error: Option<OutputError>,
}

impl<W: TrajectoryWriter> TrajectoryObserver<W> {
    /// Record every frame.
    pub fn new(writer: W) -> Self {
        Self { writer, every_nth: 1, frames: 0, last_error: None }
    }

    /// Record only frames whose iteration count is a multiple of `n`.
    /// `0` is treated as `1`.
    pub fn every_nth(mut self, n: u64) -> Self {
        self.every_nth = n.max(1);
        self
    }

    /// Number of frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Write the current state of `sim` unconditionally, e.g. the initial
    /// frame before the first iteration.
    pub fn record(&mut self, sim: &Simulation) {
        let result = self.write(sim);
        self.store_err(result);
    }

    fn write(&mut self, sim: &Simulation) -> OutputResult<()> {
        let iteration = sim.iteration_count();
        let rows: Vec<TrajectoryRow> = sim
            .agents()
            .map(|a| TrajectoryRow {
                iteration,
                agent_id: a.id.get(),
                x:        a.position.x,
                y:        a.position.y,
                ori_x:    a.orientation.x,
                ori_y:    a.orientation.y,
            })
            .collect();
        if !rows.is_empty() {
            self.writer.write_frame(&rows)?;
        }

        let trace = sim.get_last_trace();
        self.writer.write_iteration(&IterationRow {
            iteration,
            time_secs:      sim.elapsed_time(),
            agent_count:    rows.len() as u64,
            duration_us:    trace.iteration_duration.as_micros() as u64,
            operational_us: trace.operational_level_duration.as_micros() as u64,
        })?;
        self.frames += 1;
        Ok(())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TrajectoryWriter> SimObserver for TrajectoryObserver<W> {
    fn on_iteration_end(&mut self, sim: &Simulation) {
        if Iteration(sim.iteration_count()).is_multiple_of(self.every_nth) {
            self.record(sim);
        }
    }

    fn on_sim_end(&mut self, _sim: &Simulation) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
