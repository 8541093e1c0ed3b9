//! Accessible-area geometry and wall index.
//!
//! # Model
//!
//! The accessible area is the union of one or more polygons (which may have
//! holes and may overlap or share edges) minus any number of excluded
//! obstacle polygons.  Walls are the boundary of that region, derived once
//! at build time:
//!
//! 1. Every edge of every ring is split at each point where another edge
//!    crosses or touches it.
//! 2. A piece is a wall iff exactly one side of it is accessible.  Pieces
//!    shared by two touching accessible polygons are therefore dropped.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over the wall segments answers "walls within
//! distance d" and nearest-wall queries in O(log W) per call.
//!
//! # Routing
//!
//! The builder also derives the corner visibility graph used by
//! [`Geometry::route`]; see [`crate::routing`].

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ped_core::Point;

use crate::routing::{DEFAULT_CORNER_CLEARANCE, VisibilityGraph};
use crate::{GeometryError, GeometryResult, LineSegment, Polygon, GEOMETRY_EPS};

/// Sideways offset used to probe which side of a wall piece is accessible.
const SIDE_PROBE: f64 = 1e-6;

// ── R-tree wall entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: one wall segment plus its index in
/// `Geometry::walls`, used to keep query results in a stable order.
#[derive(Clone)]
struct WallEntry {
    segment: LineSegment,
    index:   usize,
}

impl RTreeObject for WallEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        let (min, max) = self.segment.bounds();
        AABB::from_corners(min, max)
    }
}

impl PointDistance for WallEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.segment.distance_squared_to(Point::from(*point))
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Immutable accessible area with derived walls.
///
/// Do not construct directly; use [`GeometryBuilder`].
pub struct Geometry {
    accessible: Vec<Polygon>,
    excluded:   Vec<Polygon>,
    walls:      Vec<LineSegment>,
    wall_index: RTree<WallEntry>,
    pub(crate) routes: VisibilityGraph,
}

impl Geometry {
    /// `true` if `p` lies in the accessible area.
    pub fn contains(&self, p: Point) -> bool {
        self.accessible.iter().any(|a| a.contains(p))
            && !self.excluded.iter().any(|e| e.contains(p))
    }

    /// All wall segments, in derivation order.
    pub fn walls(&self) -> &[LineSegment] {
        &self.walls
    }

    /// Walls whose closest point is within `distance` of `p`, in stable
    /// (derivation) order so force sums are reproducible.
    pub fn walls_within(&self, p: Point, distance: f64) -> Vec<LineSegment> {
        let mut hits: Vec<&WallEntry> = self
            .wall_index
            .locate_within_distance(p.as_array(), distance * distance)
            .collect();
        hits.sort_unstable_by_key(|e| e.index);
        hits.into_iter().map(|e| e.segment).collect()
    }

    /// Distance from `p` to the closest wall.  `None` only if there are no
    /// walls at all.
    pub fn distance_to_nearest_wall(&self, p: Point) -> Option<f64> {
        self.wall_index
            .nearest_neighbor(&p.as_array())
            .map(|e| e.segment.distance_to(p))
    }

    /// `true` if `segment` touches any wall.  Used to ignore neighbours that
    /// are on the other side of an obstacle.
    pub fn intersects_any(&self, segment: &LineSegment) -> bool {
        // Any wall touching the segment comes within half its length of the
        // midpoint.
        let reach = segment.length() * 0.5 + GEOMETRY_EPS;
        self.wall_index
            .locate_within_distance(segment.at(0.5).as_array(), reach * reach)
            .any(|e| e.segment.intersects(segment))
    }

    /// `true` if the straight segment from `a` to `b` touches no wall.
    pub fn line_of_sight(&self, a: Point, b: Point) -> bool {
        if a.distance_squared(b) <= GEOMETRY_EPS * GEOMETRY_EPS {
            return true;
        }
        !self.intersects_any(&LineSegment::new(a, b))
    }

    /// Axis-aligned bounds of the accessible area.
    pub fn bounds(&self) -> (Point, Point) {
        self.accessible.iter().map(Polygon::bounds).fold(
            (
                Point::new(f64::INFINITY, f64::INFINITY),
                Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), (a, b)| {
                (
                    Point::new(lo.x.min(a.x), lo.y.min(a.y)),
                    Point::new(hi.x.max(b.x), hi.y.max(b.y)),
                )
            },
        )
    }
}

// ── GeometryBuilder ───────────────────────────────────────────────────────────

/// Collect accessible and excluded polygons, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ped_core::Point;
/// use ped_spatial::{GeometryBuilder, Polygon};
///
/// let mut b = GeometryBuilder::new();
/// b.add_accessible_area(Polygon::new([(0.0, 0.0), (10.0, 0.0), (10.0, 4.0), (0.0, 4.0)]).unwrap());
/// b.add_accessible_area(Polygon::new([(10.0, 1.0), (12.0, 1.0), (12.0, 3.0), (10.0, 3.0)]).unwrap());
/// let geo = b.build().unwrap();
/// assert!(geo.contains(Point::new(11.0, 2.0)));
/// assert!(!geo.contains(Point::new(11.0, 3.5)));
/// ```
#[derive(Default)]
pub struct GeometryBuilder {
    accessible: Vec<Polygon>,
    excluded:   Vec<Polygon>,
    /// `None` means [`DEFAULT_CORNER_CLEARANCE`].
    clearance:  Option<f64>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a polygon to the accessible area (union).
    pub fn add_accessible_area(&mut self, polygon: Polygon) -> &mut Self {
        self.accessible.push(polygon);
        self
    }

    /// Subtract an obstacle polygon from the accessible area.
    pub fn exclude_area(&mut self, polygon: Polygon) -> &mut Self {
        self.excluded.push(polygon);
        self
    }

    /// Distance in metres between an obstacle corner and the routing node
    /// placed in front of it.  Defaults to [`DEFAULT_CORNER_CLEARANCE`].
    pub fn corner_clearance(&mut self, clearance: f64) -> &mut Self {
        self.clearance = Some(clearance);
        self
    }

    /// Derive walls, bulk-load the wall index and link the routing graph.
    ///
    /// Time complexity: O(E²) for edge splitting, where E is the total edge
    /// count, plus O(W log W) for the R-tree bulk load and O(N² log W) for
    /// the N routing nodes.
    pub fn build(self) -> GeometryResult<Geometry> {
        if self.accessible.is_empty() {
            return Err(GeometryError::NoAccessibleArea);
        }
        let clearance = self.clearance.unwrap_or(DEFAULT_CORNER_CLEARANCE);
        if !clearance.is_finite() || clearance <= 0.0 {
            return Err(GeometryError::InvalidClearance(clearance));
        }

        let inside = |p: Point| {
            self.accessible.iter().any(|a| a.contains(p))
                && !self.excluded.iter().any(|e| e.contains(p))
        };

        let edges: Vec<LineSegment> = self
            .accessible
            .iter()
            .chain(self.excluded.iter())
            .flat_map(|poly| poly.edges())
            .collect();

        let mut walls: Vec<LineSegment> = Vec::new();
        for (i, edge) in edges.iter().enumerate() {
            let mut params = vec![0.0, 1.0];
            for (j, other) in edges.iter().enumerate() {
                if i != j {
                    params.extend(edge.contact_params(other));
                }
            }
            params.sort_by(f64::total_cmp);
            params.dedup_by(|a, b| (*a - *b).abs() <= GEOMETRY_EPS);

            let normal = edge.direction().orthogonal().normalized();
            for pair in params.windows(2) {
                let piece = LineSegment::new(edge.at(pair[0]), edge.at(pair[1]));
                if piece.length() <= GEOMETRY_EPS {
                    continue;
                }
                let mid = piece.at(0.5);
                let left = inside(mid + normal * SIDE_PROBE);
                let right = inside(mid - normal * SIDE_PROBE);
                if left != right && !walls.iter().any(|w| same_segment(w, &piece)) {
                    walls.push(piece);
                }
            }
        }

        if walls.is_empty() {
            return Err(GeometryError::NoAccessibleArea);
        }

        let entries: Vec<WallEntry> = walls
            .iter()
            .enumerate()
            .map(|(index, &segment)| WallEntry { segment, index })
            .collect();
        let wall_index = RTree::bulk_load(entries);

        let mut geometry = Geometry {
            accessible: self.accessible,
            excluded:   self.excluded,
            walls,
            wall_index,
            routes:     VisibilityGraph::default(),
        };
        geometry.routes = VisibilityGraph::build(&geometry, clearance);
        Ok(geometry)
    }
}

/// Undirected equality within tolerance.
fn same_segment(a: &LineSegment, b: &LineSegment) -> bool {
    let close = |p: Point, q: Point| p.distance_squared(q) <= GEOMETRY_EPS * GEOMETRY_EPS;
    (close(a.a, b.a) && close(a.b, b.b)) || (close(a.a, b.b) && close(a.b, b.a))
}
