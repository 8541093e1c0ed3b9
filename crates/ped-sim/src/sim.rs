//! The `Simulation` struct and its iteration loop.

use std::sync::Arc;
use std::time::Instant;

use ped_agent::{Agent, AgentStore};
use ped_core::{
    AgentId, DiagnosticSink, Iteration, JourneyId, Point, ProfileId, SimClock, StageId,
};
use ped_journey::{Advance, Decision, Journey, JourneyDescription, RoutingTable, Stage};
use ped_model::{AgentUpdate, ModelError, ModelResult, OperationalModel, PedestrianModel, StepContext};
use ped_spatial::{Geometry, NeighborhoodGrid, Polygon};

use crate::{SimConfig, SimError, SimObserver, SimResult, Trace};

/// Agents closer than this to a wall (beyond their own radius) are not
/// reported; absorbs rounding at the boundary.
const WALL_TOLERANCE: f64 = 1e-6;

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Owns the geometry, the model, every stage, journey and agent, and the
/// neighbour grid.  Callers only ever hold ids and read snapshots.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    /// Validated settings the simulation was built with.
    pub(crate) config:   SimConfig,
    /// Iteration counter and fixed `dt`.
    pub(crate) clock:    SimClock,
    /// Operational model fixed at construction.
    pub(crate) model:    OperationalModel,
    /// Accessible area, wall index and routing graph.
    pub(crate) geometry: Geometry,
    /// Stages, journeys and per-stage occupancy.
    pub(crate) routing:  RoutingTable,
    /// Live agents in ascending id order.
    pub(crate) agents:   AgentStore,
    /// Snapshot of committed positions; never the source of truth.
    pub(crate) grid:     NeighborhoodGrid,
    /// Receives every diagnostic event.
    pub(crate) sink:     Arc<dyn DiagnosticSink>,
    /// Timings of the last iteration.
    pub(crate) trace:    Trace,
    /// Agents removed during the last iteration, ascending.
    pub(crate) removed:  Vec<AgentId>,
    /// Dedicated worker pool when `num_threads` is set.
    #[cfg(feature = "parallel")]
    pub(crate) pool:     Option<rayon::ThreadPool>,
}

impl Simulation {
    // ── Stages and journeys ───────────────────────────────────────────────

    /// Add a waypoint: agents arrive once within `distance` metres of
    /// `position`.
    ///
    /// Fails if `position` is outside the accessible area or `distance` is
    /// not positive.
    pub fn add_waypoint_stage(&mut self, position: Point, distance: f64) -> SimResult<StageId> {
        self.check_inside(position)?;
        let id = self.routing.add_waypoint(position, distance)?;
        self.sink.info(&format!("added waypoint {id} at {position}, capture radius {distance} m"));
        Ok(id)
    }

    /// Add an exit: agents inside `polygon` after a step are removed.
    /// Agents walk towards its centroid.
    pub fn add_exit_stage(&mut self, polygon: Polygon) -> SimResult<StageId> {
        let centroid = polygon.centroid();
        let id = self.routing.add_exit(polygon);
        self.sink.info(&format!("added exit {id} around {centroid}"));
        Ok(id)
    }

    /// Add a waiting set with queueing points in order.  Its initial flag
    /// comes from [`SimConfig::waiting_sets_start_active`].
    pub fn add_waiting_set_stage(&mut self, slots: Vec<Point>) -> SimResult<StageId> {
        for &slot in &slots {
            self.check_inside(slot)?;
        }
        let count = slots.len();
        let id = self.routing.add_waiting_set(slots)?;
        self.sink.info(&format!("added waiting set {id} with {count} slots"));
        Ok(id)
    }

    /// Activate or release a waiting set.  Agents held by it resume
    /// advancing on the next iteration after it becomes inactive.
    pub fn notify_waiting_set(&mut self, stage: StageId, active: bool) -> SimResult<()> {
        let was = self.routing.notify_waiting_set(stage, active)?;
        if was != active {
            let state = if active { "active" } else { "inactive" };
            self.sink.info(&format!("waiting set {stage} is now {state}"));
        }
        Ok(())
    }

    /// Register a journey over already added stages.
    ///
    /// Fails if a stage is unknown, a stage is unreachable from the entry,
    /// or no exit can be reached.
    pub fn add_journey(&mut self, desc: &JourneyDescription) -> SimResult<JourneyId> {
        let id = self.routing.add_journey(desc)?;
        self.sink.info(&format!("added journey {id} with {} stages", desc.stages().len()));
        Ok(id)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Place a new agent at the entry stage of `journey`.
    ///
    /// Fails without side effects if the profile or journey is unknown or if
    /// `position` is outside the accessible area.
    pub fn add_agent(
        &mut self,
        profile:     ProfileId,
        journey:     JourneyId,
        position:    Point,
        orientation: Point,
    ) -> SimResult<AgentId> {
        if !self.model.has_profile(profile) {
            return Err(ModelError::UnknownProfile(profile).into());
        }
        let entry = self.routing.journey(journey)?.entry();
        self.check_inside(position)?;

        let id = self.agents.peek_next_id();
        self.routing.enter(id, entry)?;
        let mut agent = Agent::new(profile, journey, entry, position, orientation);
        agent.waypoint = self.routing.target_for(id, entry)?;
        agent.target = steer(&self.geometry, position, agent.waypoint);
        self.agents.add(agent);
        self.grid.update(id, position);

        self.sink.debug(&format!("added agent {id} at {position} on journey {journey}"));
        Ok(id)
    }

    /// Remove a live agent.  Removing an absent id is an error.
    pub fn remove_agent(&mut self, id: AgentId) -> SimResult<()> {
        let agent = self.agents.remove(id)?;
        self.release(&agent);
        self.sink.debug(&format!("removed agent {id} at {}", agent.position));
        Ok(())
    }

    /// Change the parameter profile of a live agent.
    pub fn switch_agent_profile(&mut self, id: AgentId, profile: ProfileId) -> SimResult<()> {
        if !self.model.has_profile(profile) {
            return Err(ModelError::UnknownProfile(profile).into());
        }
        self.agents.try_get_mut(id)?.profile = profile;
        Ok(())
    }

    fn check_inside(&self, position: Point) -> SimResult<()> {
        if self.geometry.is_routable(position) {
            Ok(())
        } else {
            Err(SimError::OutsideGeometry(position))
        }
    }

    /// Detach a removed agent from the grid and its stage.
    fn release(&mut self, agent: &Agent) {
        self.grid.remove(agent.id);
        self.routing.leave(agent.id, agent.stage);
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// Advance the simulation by one `dt`.
    pub fn iterate(&mut self) -> SimResult<()> {
        let started = Instant::now();
        self.removed.clear();

        // ── ① Targets ─────────────────────────────────────────────────────
        for agent in self.agents.iter_mut() {
            agent.waypoint = self.routing.target_for(agent.id, agent.stage)?;
            agent.target = steer(&self.geometry, agent.position, agent.waypoint);
        }

        // ── ② Operational phase (read-only) ───────────────────────────────
        let operational_started = Instant::now();
        let updates = self.compute_updates().map_err(|(agent, e)| SimError::Invariant {
            agent,
            message: e.to_string(),
        })?;
        let operational_level_duration = operational_started.elapsed();

        // ── ③ Commit ──────────────────────────────────────────────────────
        let mut diverged = Vec::new();
        for (agent, update) in self.agents.iter_mut().zip(&updates) {
            if update.is_finite() {
                update.apply(agent);
            } else {
                diverged.push(agent.id);
            }
        }
        for agent in self.agents.remove_many(&diverged) {
            self.sink.error(&format!(
                "agent {} diverged at iteration {} and was removed (last position {})",
                agent.id, self.clock.iteration, agent.position,
            ));
            self.release(&agent);
        }
        self.check_positions();

        // ── ④ Index refresh ───────────────────────────────────────────────
        for agent in self.agents.iter() {
            self.grid.update(agent.id, agent.position);
        }

        // ── ⑤ Transitions (serial, ascending id) ──────────────────────────
        let mut exited = Vec::new();
        for agent in self.agents.iter_mut() {
            let decision = Decision {
                seed:          self.config.seed,
                agent:         agent.id,
                position:      agent.position,
                stage_changes: agent.stage_changes,
            };
            match self.routing.advance(agent.journey, agent.stage, &decision)? {
                Advance::Stay => {}
                Advance::Moved(next) => {
                    agent.stage = next;
                    agent.stage_changes += 1;
                }
                Advance::Exited => exited.push(agent.id),
            }
        }

        // ── ⑥ Removal ─────────────────────────────────────────────────────
        for agent in self.agents.remove_many(&exited) {
            self.sink.debug(&format!("agent {} left through stage {}", agent.id, agent.stage));
            self.release(&agent);
        }
        self.removed.extend(diverged);
        self.removed.extend(exited);
        self.removed.sort_unstable();

        // ── ⑦ Clock, ⑧ trace ──────────────────────────────────────────────
        self.clock.advance();
        self.trace = Trace {
            iteration_duration: started.elapsed(),
            operational_level_duration,
        };
        Ok(())
    }

    /// Run the model for every agent against the current snapshot.
    /// Results are in agent order.  On failure, returns the offending agent.
    fn compute_updates(&self) -> Result<Vec<AgentUpdate>, (AgentId, ModelError)> {
        // Explicit field borrows so the closure can be shared across threads.
        let ctx = StepContext::new(self.config.dt, &self.geometry);
        let model = &self.model;
        let grid = &self.grid;
        let store = &self.agents;
        let radius = model.cutoff_radius();

        let step = |agent: &Agent| -> Result<AgentUpdate, (AgentId, ModelError)> {
            let neighbors: Vec<&Agent> = grid
                .query_radius(agent.position, radius)
                .into_iter()
                .filter_map(|id| store.get(id))
                .collect();
            let result: ModelResult<AgentUpdate> = model.compute_update(&ctx, agent, &neighbors);
            result.map_err(|e| (agent.id, e))
        };

        #[cfg(not(feature = "parallel"))]
        {
            store.iter().map(step).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // `collect` on an indexed parallel iterator preserves order, so the
            // result is identical to the sequential path.
            let run = || -> Result<Vec<AgentUpdate>, (AgentId, ModelError)> {
                store.as_slice().par_iter().map(step).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }

    /// Report agents that left the accessible area or overlap a wall.
    fn check_positions(&self) {
        for agent in self.agents.iter() {
            if !self.geometry.contains(agent.position) {
                self.sink.warning(&format!(
                    "agent {} at {} is outside the accessible area (iteration {}); dt may be too large",
                    agent.id, agent.position, self.clock.iteration,
                ));
                continue;
            }
            let radius = self.model.profile_radius(agent.profile).unwrap_or(0.0);
            if let Some(distance) = self.geometry.distance_to_nearest_wall(agent.position) {
                if distance + WALL_TOLERANCE < radius {
                    self.sink.warning(&format!(
                        "agent {} is {distance:.3} m from a wall, less than its radius {radius} m",
                        agent.id,
                    ));
                }
            }
        }
    }

    // ── Drivers ───────────────────────────────────────────────────────────

    /// Run exactly `n` iterations, calling observer hooks around each.
    pub fn run_iterations<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            observer.on_iteration_start(self.clock.iteration);
            self.iterate()?;
            observer.on_iteration_end(self);
        }
        Ok(())
    }

    /// Iterate until no agents are left or `max_iterations` have run.
    /// Returns `true` if the simulation emptied.
    pub fn run_until_empty<O: SimObserver>(
        &mut self,
        max_iterations: u64,
        observer:       &mut O,
    ) -> SimResult<bool> {
        let mut remaining = max_iterations;
        while !self.agents.is_empty() && remaining > 0 {
            observer.on_iteration_start(self.clock.iteration);
            self.iterate()?;
            observer.on_iteration_end(self);
            remaining -= 1;
        }
        observer.on_sim_end(self);
        Ok(self.agents.is_empty())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Live agents after the last removal phase.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Completed `iterate()` calls.
    pub fn iteration_count(&self) -> u64 {
        self.clock.iteration.0
    }

    /// [`iteration_count`](Self::iteration_count) as a typed counter.
    pub fn iteration(&self) -> Iteration {
        self.clock.iteration
    }

    /// Simulated seconds: `iteration_count() * dt`.
    pub fn elapsed_time(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Fixed step length in seconds.
    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    /// Timings of the most recent `iterate()` call; zero before the first.
    pub fn get_last_trace(&self) -> Trace {
        self.trace
    }

    /// Read snapshot of a live agent; `None` once it has been removed.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Live agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter()
    }

    /// Ids removed (exited or diverged) during the last iteration.
    pub fn removed_agents(&self) -> &[AgentId] {
        &self.removed
    }

    /// Read access to a stage, e.g. waiting-set occupancy.
    pub fn stage(&self, id: StageId) -> SimResult<&Stage> {
        Ok(self.routing.stage(id)?)
    }

    /// Read access to a registered journey.
    pub fn journey(&self, id: JourneyId) -> SimResult<&Journey> {
        Ok(self.routing.journey(id)?)
    }

    /// The immutable accessible area, also used to query walking routes.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The operational model and its registered profiles.
    pub fn model(&self) -> &OperationalModel {
        &self.model
    }

    /// Settings the simulation was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Next corner on the walking route from `position` to `waypoint`.  Falls
/// back to `waypoint` itself when no route exists, e.g. for an exit whose
/// centroid lies outside the accessible area.
fn steer(geometry: &Geometry, position: Point, waypoint: Point) -> Point {
    geometry.route(position, waypoint).map_or(waypoint, |route| route.next_waypoint())
}
