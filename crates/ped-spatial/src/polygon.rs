//! Validated simple polygons with optional holes.

use ped_core::Point;

use crate::{GeometryError, GeometryResult, LineSegment, GEOMETRY_EPS};

/// A simple polygon: one exterior ring and zero or more hole rings.
///
/// Rings are stored open (the closing vertex is not repeated).  Construction
/// validates every ring, so a `Polygon` in hand is always non-degenerate and
/// non-self-intersecting.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    exterior: Vec<Point>,
    holes:    Vec<Vec<Point>>,
}

impl Polygon {
    /// Build a polygon without holes.
    pub fn new<P: Into<Point>>(exterior: impl IntoIterator<Item = P>) -> GeometryResult<Self> {
        Self::with_holes(exterior, Vec::<Vec<Point>>::new())
    }

    /// Build a polygon with holes.  Every hole must lie inside the exterior.
    pub fn with_holes<P, H>(
        exterior: impl IntoIterator<Item = P>,
        holes:    impl IntoIterator<Item = H>,
    ) -> GeometryResult<Self>
    where
        P: Into<Point>,
        H: IntoIterator<Item = Point>,
    {
        let exterior = normalize_ring(exterior.into_iter().map(Into::into).collect())?;
        let mut hole_rings = Vec::new();
        for hole in holes {
            let ring = normalize_ring(hole.into_iter().collect())?;
            if !ring_contains(&exterior, ring[0]) {
                return Err(GeometryError::HoleOutsideExterior);
            }
            hole_rings.push(ring);
        }
        Ok(Self { exterior, holes: hole_rings })
    }

    pub fn exterior(&self) -> &[Point] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    /// Even-odd containment test.  Points inside a hole are outside.
    pub fn contains(&self, p: Point) -> bool {
        ring_contains(&self.exterior, p) && !self.holes.iter().any(|h| ring_contains(h, p))
    }

    /// Area of the exterior minus the holes.
    pub fn area(&self) -> f64 {
        signed_area(&self.exterior).abs()
            - self.holes.iter().map(|h| signed_area(h).abs()).sum::<f64>()
    }

    /// Area-weighted centroid (holes subtract).
    pub fn centroid(&self) -> Point {
        let mut acc = Point::ZERO;
        let mut total = 0.0;
        let rings = std::iter::once((&self.exterior, 1.0))
            .chain(self.holes.iter().map(|h| (h, -1.0)));
        for (ring, sign) in rings {
            let a = signed_area(ring).abs() * sign;
            acc += ring_centroid(ring) * a;
            total += a;
        }
        if total.abs() <= GEOMETRY_EPS {
            return self.exterior[0];
        }
        acc / total
    }

    /// Every edge of every ring.
    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .flat_map(|ring| ring_edges(ring))
    }

    /// Axis-aligned bounds of the exterior as `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.exterior {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        (min, max)
    }
}

// ── Ring helpers ──────────────────────────────────────────────────────────────

/// Drop repeated and closing vertices, then validate.
fn normalize_ring(mut ring: Vec<Point>) -> GeometryResult<Vec<Point>> {
    if ring.iter().any(|p| !p.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate);
    }
    ring.dedup_by(|a, b| a.distance_squared(*b) <= GEOMETRY_EPS * GEOMETRY_EPS);
    while ring.len() > 1
        && ring[0].distance_squared(ring[ring.len() - 1]) <= GEOMETRY_EPS * GEOMETRY_EPS
    {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(GeometryError::TooFewVertices(ring.len()));
    }
    if signed_area(&ring).abs() <= GEOMETRY_EPS {
        return Err(GeometryError::ZeroArea);
    }
    check_simple(&ring)?;
    Ok(ring)
}

/// Reject rings where two non-adjacent edges touch.  O(n²); rings are small.
fn check_simple(ring: &[Point]) -> GeometryResult<()> {
    let edges: Vec<LineSegment> = ring_edges(ring).collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if !adjacent && edges[i].intersects(&edges[j]) {
                return Err(GeometryError::SelfIntersecting(i, j));
            }
        }
    }
    Ok(())
}

fn ring_edges(ring: &[Point]) -> impl Iterator<Item = LineSegment> + '_ {
    let n = ring.len();
    (0..n).map(move |i| LineSegment::new(ring[i], ring[(i + 1) % n]))
}

fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    (0..n).map(|i| ring[i].cross(ring[(i + 1) % n])).sum::<f64>() * 0.5
}

fn ring_centroid(ring: &[Point]) -> Point {
    let n = ring.len();
    let a = signed_area(ring);
    if a.abs() <= GEOMETRY_EPS {
        return ring.iter().fold(Point::ZERO, |acc, &p| acc + p) / n as f64;
    }
    let mut c = Point::ZERO;
    for i in 0..n {
        let (p, q) = (ring[i], ring[(i + 1) % n]);
        c += (p + q) * p.cross(q);
    }
    c / (6.0 * a)
}

/// Ray-casting point-in-ring test.
pub(crate) fn ring_contains(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
