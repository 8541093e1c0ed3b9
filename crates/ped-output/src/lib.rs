//! `ped-output` — trajectory writers for the pedestrian simulation workspace.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                           |
//! |-----------|---------|-----------------------------------------|
//! | *(none)*  | CSV     | `trajectories.csv`, `iterations.csv`    |
//! | `sqlite`  | SQLite  | `trajectories.db`                       |
//!
//! Both implement [`TrajectoryWriter`] and are driven by
//! [`TrajectoryObserver`], which implements `ped_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ped_output::{CsvWriter, TrajectoryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TrajectoryObserver::new(writer).every_nth(10);
//! obs.record(&sim);
//! sim.run_until_empty(100_000, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TrajectoryObserver;
pub use row::{IterationRow, TrajectoryRow};
pub use writer::TrajectoryWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
