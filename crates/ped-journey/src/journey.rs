//! Journey description (caller input) and validated journey graph.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use ped_core::StageId;

use crate::transition::round_robin_pick;
use crate::{JourneyError, JourneyResult, Stage, Transition};

// ── JourneyDescription ────────────────────────────────────────────────────────

/// Ordered stage list plus optional per-stage transition overrides.
///
/// The first stage is the entry.  A stage without an explicit transition
/// goes to the next stage in the list; the last stage must then be an exit.
///
/// ```
/// use ped_core::StageId;
/// use ped_journey::{JourneyDescription, Transition};
///
/// let mut desc = JourneyDescription::new([StageId(0), StageId(1), StageId(2)]);
/// desc.set_transition_for_stage(StageId(0), Transition::Nearest(vec![StageId(1), StageId(2)]));
/// assert_eq!(desc.stages().len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct JourneyDescription {
    stages:      Vec<StageId>,
    transitions: Vec<(StageId, Transition)>,
}

impl JourneyDescription {
    pub fn new(stages: impl IntoIterator<Item = StageId>) -> Self {
        Self { stages: stages.into_iter().collect(), transitions: Vec::new() }
    }

    /// Override the successor rule of `stage`.  A later call for the same
    /// stage replaces the earlier one.
    pub fn set_transition_for_stage(&mut self, stage: StageId, transition: Transition) -> &mut Self {
        self.transitions.retain(|(s, _)| *s != stage);
        self.transitions.push((stage, transition));
        self
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }
}

// ── Journey ───────────────────────────────────────────────────────────────────

/// A validated journey graph.
///
/// Invariants established by [`Journey::build`]:
/// - every stage exists and appears once;
/// - every non-exit stage has a transition and exits have none;
/// - every stage is reachable from the entry;
/// - at least one exit is reachable.
#[derive(Clone, Debug)]
pub struct Journey {
    stages:      Vec<StageId>,
    transitions: FxHashMap<StageId, Transition>,
    /// Round-robin counters per branching stage.
    counters:    FxHashMap<StageId, u64>,
}

impl Journey {
    /// Validate `desc` against the stage arena.
    pub(crate) fn build(desc: &JourneyDescription, arena: &[Stage]) -> JourneyResult<Self> {
        let entry = *desc.stages.first().ok_or(JourneyError::EmptyJourney)?;
        let lookup = |id: StageId| arena.get(id.0 as usize).ok_or(JourneyError::UnknownStage(id));

        let mut members = FxHashSet::default();
        for &id in &desc.stages {
            lookup(id)?;
            if !members.insert(id) {
                return Err(JourneyError::DuplicateStage(id));
            }
        }

        let explicit: FxHashMap<StageId, &Transition> =
            desc.transitions.iter().map(|(s, t)| (*s, t)).collect();
        for (stage, transition) in &desc.transitions {
            if !members.contains(stage) {
                return Err(JourneyError::StageNotInJourney(*stage));
            }
            transition
                .check()
                .map_err(|reason| JourneyError::InvalidTransition { stage: *stage, reason })?;
            for candidate in transition.candidates() {
                if !members.contains(&candidate) {
                    return Err(JourneyError::StageNotInJourney(candidate));
                }
            }
        }

        let mut transitions = FxHashMap::default();
        for (i, &id) in desc.stages.iter().enumerate() {
            let is_exit = lookup(id)?.is_exit();
            match (explicit.get(&id), is_exit) {
                (Some(_), true) => return Err(JourneyError::TransitionFromExit(id)),
                (None, true) => {}
                (Some(t), false) => {
                    transitions.insert(id, (*t).clone());
                }
                (None, false) => {
                    let next = desc
                        .stages
                        .get(i + 1)
                        .ok_or(JourneyError::MissingTransition(id))?;
                    transitions.insert(id, Transition::Fixed(*next));
                }
            }
        }

        // Breadth-first reachability from the entry.
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([entry]);
        seen.insert(entry);
        let mut exit_reachable = false;
        while let Some(id) = queue.pop_front() {
            exit_reachable |= lookup(id)?.is_exit();
            if let Some(t) = transitions.get(&id) {
                for next in t.candidates() {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        if let Some(&lost) = desc.stages.iter().find(|s| !seen.contains(s)) {
            return Err(JourneyError::Unreachable(lost));
        }
        if !exit_reachable {
            return Err(JourneyError::NoReachableExit);
        }

        Ok(Self { stages: desc.stages.clone(), transitions, counters: FxHashMap::default() })
    }

    /// Stage every agent starts at.
    pub fn entry(&self) -> StageId {
        self.stages[0]
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    /// Successor rule of `stage`; `None` for exits.
    pub fn transition(&self, stage: StageId) -> Option<&Transition> {
        self.transitions.get(&stage)
    }

    /// Pick the next round-robin successor of `stage` and advance the
    /// counter.  `None` if `stage` does not branch round-robin.
    pub(crate) fn next_round_robin(&mut self, stage: StageId) -> Option<StageId> {
        let Some(Transition::RoundRobin(weights)) = self.transitions.get(&stage) else {
            return None;
        };
        let counter = self.counters.entry(stage).or_insert(0);
        let pick = round_robin_pick(weights, *counter);
        *counter += 1;
        pick
    }
}
