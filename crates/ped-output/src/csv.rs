//! CSV backend.
//!
//! Creates `trajectories.csv` and `iterations.csv` in the output directory.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TrajectoryWriter;
use crate::{IterationRow, OutputResult, TrajectoryRow};

pub struct CsvWriter {
    trajectories: Writer<File>,
    iterations:   Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Create both files in `dir` (truncating existing ones) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trajectories = Writer::from_path(dir.join("trajectories.csv"))?;
        trajectories.write_record(["iteration", "agent_id", "x", "y", "ori_x", "ori_y"])?;

        let mut iterations = Writer::from_path(dir.join("iterations.csv"))?;
        iterations.write_record([
            "iteration",
            "time_secs",
            "agent_count",
            "duration_us",
            "operational_us",
        ])?;

        Ok(Self { trajectories, iterations, finished: false })
    }
}

impl TrajectoryWriter for CsvWriter {
    fn write_frame(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        for row in rows {
            self.trajectories.write_record(&[
                row.iteration.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.ori_x.to_string(),
                row.ori_y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_iteration(&mut self, row: &IterationRow) -> OutputResult<()> {
        self.iterations.write_record(&[
            row.iteration.to_string(),
            row.time_secs.to_string(),
            row.agent_count.to_string(),
            row.duration_us.to_string(),
            row.operational_us.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trajectories.flush()?;
        self.iterations.flush()?;
        Ok(())
    }
}
