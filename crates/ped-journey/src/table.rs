//! `RoutingTable` — stage and journey arenas plus the transition step.

use ped_core::{AgentId, AgentRng, JourneyId, Point, StageId};
use ped_spatial::Polygon;

use crate::stage::{ExitArea, WaitingSet, Waypoint};
use crate::{Journey, JourneyDescription, JourneyError, JourneyResult, Stage, Transition};

/// Per-agent inputs to one transition decision.
#[derive(Clone, Copy, Debug)]
pub struct Decision {
    /// Global seed of the run.
    pub seed:          u64,
    pub agent:         AgentId,
    pub position:      Point,
    /// Stage changes the agent has made so far; numbers its random draws.
    pub stage_changes: u64,
}

/// Outcome of [`RoutingTable::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Not arrived yet (or held by an active waiting set).
    Stay,
    /// Arrived; the agent's current stage is now the given one.
    Moved(StageId),
    /// Arrived at an exit; the agent must be removed.
    Exited,
}

/// Owns every stage and journey of one simulation.
pub struct RoutingTable {
    stages:   Vec<Stage>,
    journeys: Vec<Journey>,
    waiting_sets_start_active: bool,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RoutingTable {
    /// `waiting_sets_start_active` sets the initial flag of every waiting set
    /// added later.
    pub fn new(waiting_sets_start_active: bool) -> Self {
        Self { stages: Vec::new(), journeys: Vec::new(), waiting_sets_start_active }
    }

    fn push_stage(&mut self, stage: Stage) -> StageId {
        let id = StageId(self.stages.len() as u32);
        self.stages.push(stage);
        id
    }

    // ── Registration ──────────────────────────────────────────────────────

    pub fn add_waypoint(&mut self, position: Point, distance: f64) -> JourneyResult<StageId> {
        if !position.is_finite() {
            return Err(JourneyError::InvalidStage("waypoint position is not finite"));
        }
        if !(distance.is_finite() && distance > 0.0) {
            return Err(JourneyError::InvalidStage("capture radius must be finite and > 0"));
        }
        Ok(self.push_stage(Stage::Waypoint(Waypoint { position, distance })))
    }

    pub fn add_exit(&mut self, polygon: Polygon) -> StageId {
        self.push_stage(Stage::Exit(ExitArea::new(polygon)))
    }

    pub fn add_waiting_set(&mut self, slots: Vec<Point>) -> JourneyResult<StageId> {
        if slots.is_empty() {
            return Err(JourneyError::InvalidStage("waiting set needs at least one slot"));
        }
        if slots.iter().any(|p| !p.is_finite()) {
            return Err(JourneyError::InvalidStage("waiting set slot is not finite"));
        }
        let active = self.waiting_sets_start_active;
        Ok(self.push_stage(Stage::WaitingSet(WaitingSet::new(slots, active))))
    }

    /// Set the active flag of a waiting set.  Returns the previous value.
    pub fn notify_waiting_set(&mut self, stage: StageId, active: bool) -> JourneyResult<bool> {
        match self.stages.get_mut(stage.0 as usize) {
            Some(Stage::WaitingSet(ws)) => {
                let was = ws.is_active();
                ws.set_active(active);
                Ok(was)
            }
            Some(_) => Err(JourneyError::NotAWaitingSet(stage)),
            None => Err(JourneyError::UnknownStage(stage)),
        }
    }

    /// Validate and register a journey.  Nothing is registered on error.
    pub fn add_journey(&mut self, desc: &JourneyDescription) -> JourneyResult<JourneyId> {
        let journey = Journey::build(desc, &self.stages)?;
        let id = JourneyId(self.journeys.len() as u32);
        self.journeys.push(journey);
        Ok(id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn stage(&self, id: StageId) -> JourneyResult<&Stage> {
        self.stages.get(id.0 as usize).ok_or(JourneyError::UnknownStage(id))
    }

    pub fn journey(&self, id: JourneyId) -> JourneyResult<&Journey> {
        self.journeys.get(id.0 as usize).ok_or(JourneyError::UnknownJourney(id))
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn journey_count(&self) -> usize {
        self.journeys.len()
    }

    /// Point `agent` should currently walk towards.
    pub fn target_for(&self, agent: AgentId, stage: StageId) -> JourneyResult<Point> {
        Ok(self.stage(stage)?.target_for(agent))
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// Record that `agent`'s current stage is now `stage`.
    pub fn enter(&mut self, agent: AgentId, stage: StageId) -> JourneyResult<()> {
        match self.stages.get_mut(stage.0 as usize) {
            Some(Stage::WaitingSet(ws)) => {
                ws.enter(agent);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(JourneyError::UnknownStage(stage)),
        }
    }

    /// Record that `agent` left `stage` (advanced or was removed).
    pub fn leave(&mut self, agent: AgentId, stage: StageId) {
        if let Some(Stage::WaitingSet(ws)) = self.stages.get_mut(stage.0 as usize) {
            ws.leave(agent);
        }
    }

    // ── Transition step ───────────────────────────────────────────────────

    /// Evaluate the arrival predicate of `stage` for one agent and, if it
    /// holds, move the agent to the successor chosen by `journey`.
    pub fn advance(
        &mut self,
        journey: JourneyId,
        stage:   StageId,
        decision: &Decision,
    ) -> JourneyResult<Advance> {
        let current = self.stage(stage)?;
        if !current.has_arrived(decision.position) {
            return Ok(Advance::Stay);
        }
        if current.is_exit() {
            return Ok(Advance::Exited);
        }

        let next = self.select_successor(journey, stage, decision)?;
        self.leave(decision.agent, stage);
        self.enter(decision.agent, next)?;
        Ok(Advance::Moved(next))
    }

    fn select_successor(
        &mut self,
        journey:  JourneyId,
        stage:    StageId,
        decision: &Decision,
    ) -> JourneyResult<StageId> {
        let stages = &self.stages;
        let journey = self
            .journeys
            .get_mut(journey.0 as usize)
            .ok_or(JourneyError::UnknownJourney(journey))?;

        let next = match journey.transition(stage) {
            None => None,
            Some(Transition::RoundRobin(_)) => journey.next_round_robin(stage),
            Some(Transition::Fixed(s)) => Some(*s),
            Some(Transition::Nearest(candidates)) => nearest(stages, candidates, decision.position),
            Some(Transition::WeightedRandom(weighted)) => {
                let weights: Vec<u32> = weighted.iter().map(|&(_, w)| w).collect();
                let mut rng = AgentRng::new(decision.seed, decision.agent, decision.stage_changes);
                rng.pick_weighted(&weights).map(|i| weighted[i].0)
            }
        };
        next.ok_or(JourneyError::MissingTransition(stage))
    }
}

/// Candidate whose approach point is closest to `position`; first wins ties.
fn nearest(stages: &[Stage], candidates: &[StageId], position: Point) -> Option<StageId> {
    let mut best: Option<(StageId, f64)> = None;
    for &id in candidates {
        let Some(stage) = stages.get(id.0 as usize) else { continue };
        let d = stage.approach_point().distance_squared(position);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((id, d));
        }
    }
    best.map(|(id, _)| id)
}
