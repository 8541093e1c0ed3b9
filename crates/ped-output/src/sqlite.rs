//! SQLite backend (feature `sqlite`).
//!
//! Creates `trajectories.db` in the output directory with the tables
//! `trajectory_data` and `frame_data`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::TrajectoryWriter;
use crate::{IterationRow, OutputResult, TrajectoryRow};

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `trajectories.db` in `dir` and create the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("trajectories.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS trajectory_data (
                 frame  INTEGER NOT NULL,
                 id     INTEGER NOT NULL,
                 pos_x  REAL    NOT NULL,
                 pos_y  REAL    NOT NULL,
                 ori_x  REAL    NOT NULL,
                 ori_y  REAL    NOT NULL
             );
             CREATE INDEX IF NOT EXISTS frame_index ON trajectory_data(frame);
             CREATE TABLE IF NOT EXISTS frame_data (
                 frame          INTEGER PRIMARY KEY,
                 time_secs      REAL    NOT NULL,
                 agent_count    INTEGER NOT NULL,
                 duration_us    INTEGER NOT NULL,
                 operational_us INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl TrajectoryWriter for SqliteWriter {
    fn write_frame(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trajectory_data (frame, id, pos_x, pos_y, ori_x, ori_y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.iteration as i64,
                    row.agent_id as i64,
                    row.x,
                    row.y,
                    row.ori_x,
                    row.ori_y,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_iteration(&mut self, row: &IterationRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO frame_data (frame, time_secs, agent_count, duration_us, operational_us) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.iteration as i64,
                row.time_secs,
                row.agent_count as i64,
                row.duration_us as i64,
                row.operational_us as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
