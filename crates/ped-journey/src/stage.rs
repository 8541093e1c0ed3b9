//! Stage types and their arrival predicates.

use ped_core::{AgentId, Point};
use ped_spatial::Polygon;

/// Walk to a point; arrived once within `distance` of it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: Point,
    pub distance: f64,
}

/// Leave the simulation on entering `polygon`.  Agents walk towards the
/// polygon's centroid.
#[derive(Clone, Debug)]
pub struct ExitArea {
    pub polygon: Polygon,
    centroid:    Point,
}

impl ExitArea {
    pub fn new(polygon: Polygon) -> Self {
        let centroid = polygon.centroid();
        Self { polygon, centroid }
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }
}

/// Queue at an ordered list of slots while active.
///
/// The k-th agent to enter (counting only agents still present) waits at
/// `slots[k]`; agents beyond the last slot share the last one.
#[derive(Clone, Debug)]
pub struct WaitingSet {
    slots:     Vec<Point>,
    active:    bool,
    occupants: Vec<AgentId>,
}

impl WaitingSet {
    /// `slots` must be non-empty; [`RoutingTable`](crate::RoutingTable)
    /// checks this before constructing one.
    pub(crate) fn new(slots: Vec<Point>, active: bool) -> Self {
        Self { slots, active, occupants: Vec::new() }
    }

    pub fn slots(&self) -> &[Point] {
        &self.slots
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Agents whose current stage is this set, in arrival order.
    pub fn occupants(&self) -> &[AgentId] {
        &self.occupants
    }

    fn slot(&self, index: usize) -> Point {
        self.slots[index.min(self.slots.len() - 1)]
    }

    /// Slot assigned to `agent`.  Unknown agents get the next free slot.
    pub fn slot_for(&self, agent: AgentId) -> Point {
        let index = self
            .occupants
            .iter()
            .position(|&a| a == agent)
            .unwrap_or(self.occupants.len());
        self.slot(index)
    }

    /// Where the next agent to enter will be sent.
    pub fn next_free_slot(&self) -> Point {
        self.slot(self.occupants.len())
    }

    pub(crate) fn enter(&mut self, agent: AgentId) {
        if !self.occupants.contains(&agent) {
            self.occupants.push(agent);
        }
    }

    pub(crate) fn leave(&mut self, agent: AgentId) {
        self.occupants.retain(|&a| a != agent);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageKind {
    Waypoint,
    Exit,
    WaitingSet,
}

/// One routing target.
#[derive(Clone, Debug)]
pub enum Stage {
    Waypoint(Waypoint),
    Exit(ExitArea),
    WaitingSet(WaitingSet),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Waypoint(_) => StageKind::Waypoint,
            Stage::Exit(_) => StageKind::Exit,
            Stage::WaitingSet(_) => StageKind::WaitingSet,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Stage::Exit(_))
    }

    /// Point `agent` should walk towards while this is its current stage.
    pub fn target_for(&self, agent: AgentId) -> Point {
        match self {
            Stage::Waypoint(w) => w.position,
            Stage::Exit(e) => e.centroid,
            Stage::WaitingSet(ws) => ws.slot_for(agent),
        }
    }

    /// Representative point used to rank this stage as a candidate
    /// successor.
    pub fn approach_point(&self) -> Point {
        match self {
            Stage::Waypoint(w) => w.position,
            Stage::Exit(e) => e.centroid,
            Stage::WaitingSet(ws) => ws.next_free_slot(),
        }
    }

    /// Arrival predicate.  An active waiting set never reports arrival; an
    /// inactive one lets agents through at once.
    pub fn has_arrived(&self, position: Point) -> bool {
        match self {
            Stage::Waypoint(w) => position.distance(w.position) <= w.distance,
            Stage::Exit(e) => e.polygon.contains(position),
            Stage::WaitingSet(ws) => !ws.active,
        }
    }

    pub fn as_waiting_set(&self) -> Option<&WaitingSet> {
        match self {
            Stage::WaitingSet(ws) => Some(ws),
            _ => None,
        }
    }
}
