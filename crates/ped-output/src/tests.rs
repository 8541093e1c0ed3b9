//! Integration tests for ped-output.

#[cfg(test)]
mod helpers {
    use ped_core::{NoopSink, Point, ProfileId};
    use ped_journey::JourneyDescription;
    use ped_model::{CollisionFreeSpeedModel, CollisionFreeSpeedParameters, CollisionFreeSpeedProfile};
    use ped_sim::{SimBuilder, SimConfig, Simulation};
    use ped_spatial::{GeometryBuilder, Polygon};

    use crate::row::{IterationRow, TrajectoryRow};

    pub fn tmp() -> tempfile::TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn traj_row(agent_id: u64, iteration: u64) -> TrajectoryRow {
        TrajectoryRow { iteration, agent_id, x: 1.5, y: -0.25, ori_x: 1.0, ori_y: 0.0 }
    }

    pub fn iter_row(iteration: u64) -> IterationRow {
        IterationRow {
            iteration,
            time_secs: iteration as f64 * 0.01,
            agent_count: 2,
            duration_us: 40,
            operational_us: 30,
        }
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)]).unwrap()
    }

    /// Two agents walking down a corridor towards an exit at x = 9.
    pub fn corridor_sim() -> Simulation {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(-1.0, -1.0, 12.0, 1.0));
        let model = CollisionFreeSpeedModel::with_profiles(
            CollisionFreeSpeedParameters::default(),
            [(ProfileId(0), CollisionFreeSpeedProfile::default())],
        )
        .unwrap();
        let config = SimConfig { dt: 0.01, seed: 1, ..SimConfig::default() };
        let mut sim =
            SimBuilder::new(config, model, b.build().unwrap()).sink(NoopSink).build().unwrap();
        let exit = sim.add_exit_stage(rect(9.0, -1.0, 11.0, 1.0)).unwrap();
        let j = sim.add_journey(&JourneyDescription::new([exit])).unwrap();
        sim.add_agent(ProfileId(0), j, Point::new(0.0, 0.5), Point::new(1.0, 0.0)).unwrap();
        sim.add_agent(ProfileId(0), j, Point::new(0.0, -0.5), Point::new(1.0, 0.0)).unwrap();
        sim
    }
}

#[cfg(test)]
mod csv_tests {
    use super::helpers::*;
    use crate::csv::CsvWriter;
    use crate::writer::TrajectoryWriter;

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["iteration", "agent_id", "x", "y", "ori_x", "ori_y"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("iterations.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["iteration", "time_secs", "agent_count", "duration_us", "operational_us"]);
    }

    #[test]
    fn csv_frame_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_frame(&[traj_row(1, 5), traj_row(2, 5)]).unwrap();
        w.write_iteration(&iter_row(5)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");
        assert_eq!(&rows[1][1], "2");
        assert_eq!(rows[0][3].parse::<f64>().unwrap(), -0.25);

        let mut rdr = csv::Reader::from_path(dir.path().join("iterations.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "2");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("absent")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use super::helpers::*;
    use crate::csv::CsvWriter;
    use crate::observer::TrajectoryObserver;

    #[test]
    fn every_nth_frame_is_recorded() {
        let dir = tmp();
        let mut sim = corridor_sim();
        let mut obs = TrajectoryObserver::new(CsvWriter::new(dir.path()).unwrap()).every_nth(10);
        obs.record(&sim);
        sim.run_iterations(50, &mut obs).unwrap();
        sim.run_until_empty(0, &mut obs).unwrap();
        assert!(obs.take_error().is_none());
        // Initial frame plus iterations 10, 20, 30, 40, 50.
        assert_eq!(obs.frames(), 6);

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let iterations: Vec<u64> =
            rdr.records().map(|r| r.unwrap()[0].parse().unwrap()).collect();
        assert_eq!(iterations, [0, 0, 10, 10, 20, 20, 30, 30, 40, 40, 50, 50]);
    }

    #[test]
    fn agents_move_forward_between_frames() {
        let dir = tmp();
        let mut sim = corridor_sim();
        let mut obs = TrajectoryObserver::new(CsvWriter::new(dir.path()).unwrap()).every_nth(100);
        obs.record(&sim);
        sim.run_iterations(200, &mut obs).unwrap();
        sim.run_until_empty(0, &mut obs).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let xs: Vec<(u64, f64)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[1].parse().unwrap(), r[2].parse().unwrap())
            })
            .filter(|&(id, _)| id == 1)
            .collect();
        assert_eq!(xs.len(), 3);
        assert!(xs[0].1 < xs[1].1 && xs[1].1 < xs[2].1, "{xs:?}");
    }

    #[test]
    fn empty_frames_still_write_a_summary() {
        let dir = tmp();
        let mut sim = corridor_sim();
        let mut obs = TrajectoryObserver::new(CsvWriter::new(dir.path()).unwrap()).every_nth(0);
        assert!(sim.run_until_empty(5000, &mut obs).unwrap());
        let n = sim.iteration_count();
        assert_eq!(obs.frames(), n);

        let mut rdr = csv::Reader::from_path(dir.path().join("iterations.csv")).unwrap();
        let last = rdr.records().last().unwrap().unwrap();
        assert_eq!(last[0].parse::<u64>().unwrap(), n);
        assert_eq!(&last[2], "0");
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;

    use super::helpers::*;
    use crate::observer::TrajectoryObserver;
    use crate::sqlite::SqliteWriter;
    use crate::writer::TrajectoryWriter;

    #[test]
    fn sqlite_rows_written() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_frame(&[traj_row(1, 3), traj_row(2, 3)]).unwrap();
        w.write_iteration(&iter_row(3)).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("trajectories.db")).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM trajectory_data WHERE frame = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 2);
        let count: i64 =
            conn.query_row("SELECT agent_count FROM frame_data", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn sqlite_observer_integration() {
        let dir = tmp();
        let mut sim = corridor_sim();
        let mut obs = TrajectoryObserver::new(SqliteWriter::new(dir.path()).unwrap()).every_nth(5);
        sim.run_iterations(20, &mut obs).unwrap();
        sim.run_until_empty(0, &mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let conn = Connection::open(dir.path().join("trajectories.db")).unwrap();
        let frames: i64 =
            conn.query_row("SELECT COUNT(*) FROM frame_data", [], |r| r.get(0)).unwrap();
        assert_eq!(frames, 4);
    }
}
