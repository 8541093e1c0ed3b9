//! Uniform hash grid over agent positions.
//!
//! # Contract
//!
//! - `update` relocates an agent in O(1) amortized (O(cell occupancy) for the
//!   removal from the old cell).
//! - `query_radius(p, r)` returns every agent stored in a cell that overlaps
//!   the square `[p - r, p + r]²`.  That is a superset of the agents within
//!   distance `r`: no false negatives, some false positives, which callers
//!   filter with an exact distance check.
//!
//! The grid is a cache of positions, never the source of truth.  The
//! simulation refreshes it from committed agent positions once per
//! iteration.

use rustc_hash::FxHashMap;

use ped_core::{AgentId, Point};

use crate::{GeometryError, GeometryResult};

type Cell = (i64, i64);

/// Spatial hash of agent ids keyed by integer cell coordinate.
pub struct NeighborhoodGrid {
    cell_size: f64,
    cells:     FxHashMap<Cell, Vec<AgentId>>,
    locations: FxHashMap<AgentId, (Cell, Point)>,
}

impl NeighborhoodGrid {
    /// Create an empty grid.  `cell_size` is usually the largest interaction
    /// radius of the operational model.
    pub fn new(cell_size: f64) -> GeometryResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GeometryError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells:     FxHashMap::default(),
            locations: FxHashMap::default(),
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed agents.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.locations.contains_key(&agent)
    }

    /// Last position recorded for `agent`.
    pub fn position(&self, agent: AgentId) -> Option<Point> {
        self.locations.get(&agent).map(|&(_, p)| p)
    }

    #[inline]
    fn cell_of(&self, p: Point) -> Cell {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Insert or relocate `agent`.
    pub fn update(&mut self, agent: AgentId, position: Point) {
        let cell = self.cell_of(position);
        match self.locations.insert(agent, (cell, position)) {
            Some((old_cell, _)) if old_cell == cell => {}
            Some((old_cell, _)) => {
                self.detach(agent, old_cell);
                self.cells.entry(cell).or_default().push(agent);
            }
            None => self.cells.entry(cell).or_default().push(agent),
        }
    }

    /// Remove `agent`.  Returns `false` if it was not indexed.
    pub fn remove(&mut self, agent: AgentId) -> bool {
        match self.locations.remove(&agent) {
            Some((cell, _)) => {
                self.detach(agent, cell);
                true
            }
            None => false,
        }
    }

    fn detach(&mut self, agent: AgentId, cell: Cell) {
        if let Some(ids) = self.cells.get_mut(&cell) {
            if let Some(pos) = ids.iter().position(|&a| a == agent) {
                ids.swap_remove(pos);
            }
            if ids.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Drop every entry and re-insert from `positions`.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = (AgentId, Point)>) {
        self.cells.clear();
        self.locations.clear();
        for (agent, p) in positions {
            self.update(agent, p);
        }
    }

    /// Candidate agents near `center` (conservative superset of the disk of
    /// radius `radius`), sorted by id so callers iterate deterministically.
    pub fn query_radius(&self, center: Point, radius: f64) -> Vec<AgentId> {
        let r = radius.max(0.0);
        let (x0, y0) = self.cell_of(Point::new(center.x - r, center.y - r));
        let (x1, y1) = self.cell_of(Point::new(center.x + r, center.y + r));
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(ids);
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Agents whose recorded position is within `radius` of `center`
    /// (exact filter over [`query_radius`](Self::query_radius)).
    pub fn agents_within(&self, center: Point, radius: f64) -> Vec<(AgentId, Point)> {
        let r2 = radius * radius;
        self.query_radius(center, radius)
            .into_iter()
            .filter_map(|a| self.position(a).map(|p| (a, p)))
            .filter(|(_, p)| p.distance_squared(center) <= r2)
            .collect()
    }
}
