//! Shortest walking paths around obstacles.
//!
//! # Graph
//!
//! Nodes are the obstacle corners of the accessible area, each pushed
//! `clearance` metres into the open along the bisector of its free sector so
//! paths keep clear of the wall.  A wall endpoint counts as an obstacle
//! corner when the free sector around it is wider than a straight angle;
//! room corners never lie on a shortest path and get no node.  Two nodes are
//! linked when the straight segment between them touches no wall.
//!
//! # Queries
//!
//! [`Geometry::route`] first tries the straight segment.  Only when a wall is
//! in the way does it link both end points to every node they can see and
//! run Dijkstra.
//!
//! # Cost units
//!
//! Edge costs are whole millimetres (u64) so heap ordering is exact and ties
//! break on node index.  [`Route::length`] is reported in metres.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::f64::consts::{PI, TAU};

use ped_core::Point;

use crate::{Geometry, GeometryError, GeometryResult, GEOMETRY_EPS};

/// Default distance between an obstacle corner and its routing node, in
/// metres.
pub const DEFAULT_CORNER_CLEARANCE: f64 = 0.5;

/// A free sector must exceed a straight angle by this much (radians) for its
/// apex to count as a corner.
const ANGLE_EPS: f64 = 1e-6;

// ── Route ─────────────────────────────────────────────────────────────────────

/// Polyline from a start point to an end point through obstacle corners.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Start, intermediate corner nodes, end.  Always at least two points.
    waypoints: Vec<Point>,
    length:    f64,
}

impl Route {
    fn through(waypoints: Vec<Point>) -> Self {
        let length = waypoints.windows(2).map(|w| w[0].distance(w[1])).sum();
        Self { waypoints, length }
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Total length in metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Where an agent standing at the start should head now.
    pub fn next_waypoint(&self) -> Point {
        self.waypoints[1]
    }

    /// `true` if no corner lies between start and end.
    pub fn is_direct(&self) -> bool {
        self.waypoints.len() == 2
    }
}

// ── VisibilityGraph ───────────────────────────────────────────────────────────

/// Corner nodes and the visibility links between them.  Built once with the
/// geometry and immutable afterwards.
#[derive(Clone, Debug, Default)]
pub(crate) struct VisibilityGraph {
    nodes: Vec<Point>,
    /// `links[i]`: `(neighbour, cost in mm)`, ascending neighbour index.
    links: Vec<Vec<(usize, u64)>>,
}

impl VisibilityGraph {
    /// Time complexity: O(N² log W) visibility tests for N corner nodes and
    /// W walls.
    pub(crate) fn build(geometry: &Geometry, clearance: f64) -> Self {
        let nodes = corner_nodes(geometry, clearance);
        let mut links = vec![Vec::new(); nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if geometry.line_of_sight(nodes[i], nodes[j]) {
                    let cost = cost_mm(nodes[i], nodes[j]);
                    links[i].push((j, cost));
                    links[j].push((i, cost));
                }
            }
        }
        Self { nodes, links }
    }

    pub(crate) fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    /// Dijkstra from `from` to `to` through corner nodes.  Both points must
    /// already be known to lie in the accessible area.
    pub(crate) fn shortest_path(
        &self,
        geometry: &Geometry,
        from:     Point,
        to:       Point,
    ) -> GeometryResult<Route> {
        let n = self.nodes.len();
        let (start, goal) = (n, n + 1);

        let from_links: Vec<(usize, u64)> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|&(_, &p)| geometry.line_of_sight(from, p))
            .map(|(i, &p)| (i, cost_mm(from, p)))
            .collect();
        let goal_links: Vec<Option<u64>> = self
            .nodes
            .iter()
            .map(|&p| geometry.line_of_sight(p, to).then(|| cost_mm(p, to)))
            .collect();

        // dist[v] = best known cost (mm) to reach v; prev[v] = predecessor.
        let mut dist = vec![u64::MAX; n + 2];
        let mut prev = vec![usize::MAX; n + 2];
        dist[start] = 0;

        // Reverse turns the max-heap into a min-heap; the node index breaks
        // ties deterministically.
        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();
        heap.push(Reverse((0, start)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == goal {
                return Ok(self.reconstruct(&prev, from, to));
            }
            if cost > dist[node] {
                continue;
            }
            let (outgoing, to_goal) = if node == start {
                (from_links.as_slice(), None)
            } else {
                (self.links[node].as_slice(), goal_links[node])
            };
            for (next, step) in outgoing.iter().copied().chain(to_goal.map(|c| (goal, c))) {
                let new_cost = cost.saturating_add(step);
                if new_cost < dist[next] {
                    dist[next] = new_cost;
                    prev[next] = node;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }

        Err(GeometryError::NoRoute { from, to })
    }

    fn reconstruct(&self, prev: &[usize], from: Point, to: Point) -> Route {
        let n = self.nodes.len();
        let point = |i: usize| match i {
            i if i == n => from,
            i if i == n + 1 => to,
            i => self.nodes[i],
        };
        let mut waypoints = Vec::new();
        let mut cur = n + 1;
        while cur != usize::MAX {
            waypoints.push(point(cur));
            cur = prev[cur];
        }
        waypoints.reverse();
        Route::through(waypoints)
    }
}

impl Geometry {
    /// Shortest walking route from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NotRoutable`] if either point is outside the
    /// accessible area, [`GeometryError::NoRoute`] if they lie in
    /// disconnected parts of it.
    pub fn route(&self, from: Point, to: Point) -> GeometryResult<Route> {
        for p in [from, to] {
            if !self.is_routable(p) {
                return Err(GeometryError::NotRoutable(p));
            }
        }
        if self.line_of_sight(from, to) {
            return Ok(Route::through(vec![from, to]));
        }
        self.routes.shortest_path(self, from, to)
    }

    /// `true` if routes may start or end at `p`.
    pub fn is_routable(&self, p: Point) -> bool {
        p.is_finite() && self.contains(p)
    }

    /// Corner nodes of the routing graph, in derivation order.
    pub fn routing_nodes(&self) -> &[Point] {
        self.routes.nodes()
    }
}

/// Obstacle corners of `geometry`, each moved `clearance` into its free
/// sector.
fn corner_nodes(geometry: &Geometry, clearance: f64) -> Vec<Point> {
    // Wall endpoints with the heading of every wall leaving them.
    let mut corners: Vec<(Point, Vec<f64>)> = Vec::new();
    for wall in geometry.walls() {
        for (at, towards) in [(wall.a, wall.b), (wall.b, wall.a)] {
            let d = towards - at;
            let heading = d.y.atan2(d.x);
            let existing = corners
                .iter_mut()
                .find(|(p, _)| p.distance_squared(at) <= GEOMETRY_EPS * GEOMETRY_EPS);
            match existing {
                Some((_, headings)) => headings.push(heading),
                None => corners.push((at, vec![heading])),
            }
        }
    }

    let mut nodes = Vec::new();
    for (corner, mut headings) in corners {
        headings.sort_by(f64::total_cmp);
        for (k, &start) in headings.iter().enumerate() {
            let end = headings.get(k + 1).copied().unwrap_or(headings[0] + TAU);
            let gap = end - start;
            if gap <= PI + ANGLE_EPS {
                continue;
            }
            let bisector = start + gap * 0.5;
            let node = corner + Point::new(bisector.cos(), bisector.sin()) * clearance;
            if geometry.contains(node) {
                nodes.push(node);
            }
        }
    }
    nodes
}

#[inline]
fn cost_mm(a: Point, b: Point) -> u64 {
    (a.distance(b) * 1000.0).round() as u64
}
