//! The backend trait.

use crate::{IterationRow, OutputResult, TrajectoryRow};

/// Sink for recorded frames.  Implemented by the CSV and SQLite writers.
pub trait TrajectoryWriter {
    /// Write the positions of every live agent in one recorded frame.
    fn write_frame(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()>;

    /// Write the summary of one recorded frame.
    fn write_iteration(&mut self, row: &IterationRow) -> OutputResult<()>;

    /// Flush everything to disk.  Calling it again is a no-op.
    fn finish(&mut self) -> OutputResult<()>;
}
