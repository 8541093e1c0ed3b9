//! Line segments and the predicates built on them.

use ped_core::Point;

use crate::GEOMETRY_EPS;

/// A closed straight segment from `a` to `b`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub a: Point,
    pub b: Point,
}

impl LineSegment {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Point at parameter `t` (0 → `a`, 1 → `b`).
    #[inline]
    pub fn at(&self, t: f64) -> Point {
        self.a + self.direction() * t
    }

    /// Point on the segment closest to `p`.
    pub fn closest_point(&self, p: Point) -> Point {
        let d = self.direction();
        let len2 = d.norm_squared();
        if len2 <= GEOMETRY_EPS * GEOMETRY_EPS {
            return self.a;
        }
        let t = ((p - self.a).dot(d) / len2).clamp(0.0, 1.0);
        self.at(t)
    }

    #[inline]
    pub fn distance_squared_to(&self, p: Point) -> f64 {
        self.closest_point(p).distance_squared(p)
    }

    #[inline]
    pub fn distance_to(&self, p: Point) -> f64 {
        self.distance_squared_to(p).sqrt()
    }

    /// Axis-aligned bounds as `(min, max)` corners.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.a.x.min(self.b.x), self.a.y.min(self.b.y)],
            [self.a.x.max(self.b.x), self.a.y.max(self.b.y)],
        )
    }

    /// `true` if the two closed segments share at least one point.
    pub fn intersects(&self, other: &LineSegment) -> bool {
        let d1 = orientation(other.a, other.b, self.a);
        let d2 = orientation(other.a, other.b, self.b);
        let d3 = orientation(self.a, self.b, other.a);
        let d4 = orientation(self.a, self.b, other.b);

        if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
            return true;
        }
        (d1 == 0.0 && on_segment(other, self.a))
            || (d2 == 0.0 && on_segment(other, self.b))
            || (d3 == 0.0 && on_segment(self, other.a))
            || (d4 == 0.0 && on_segment(self, other.b))
    }

    /// Parameters `t ∈ (0, 1)` along `self` where `other` crosses or touches
    /// it.  Collinear overlaps contribute the projections of `other`'s
    /// endpoints.  Used to split polygon edges into wall pieces.
    pub fn contact_params(&self, other: &LineSegment) -> Vec<f64> {
        let r = self.direction();
        let s = other.direction();
        let denom = r.cross(s);
        let qp = other.a - self.a;
        let r_len2 = r.norm_squared();
        let mut out = Vec::new();
        if r_len2 <= GEOMETRY_EPS * GEOMETRY_EPS {
            return out;
        }

        let tol = GEOMETRY_EPS * r_len2.sqrt().max(s.norm()).max(1.0);
        if denom.abs() > tol {
            let t = qp.cross(s) / denom;
            let u = qp.cross(r) / denom;
            let slack = 1e-9;
            if (-slack..=1.0 + slack).contains(&u) && t > 0.0 && t < 1.0 {
                out.push(t);
            }
        } else if qp.cross(r).abs() <= tol * r_len2.sqrt() {
            for q in [other.a, other.b] {
                let t = (q - self.a).dot(r) / r_len2;
                if t > 0.0 && t < 1.0 {
                    out.push(t);
                }
            }
        }
        out
    }
}

/// Signed area of the triangle (a, b, c) snapped to zero within tolerance.
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    let v = (b - a).cross(c - a);
    let scale = (b - a).norm().max((c - a).norm()).max(1.0);
    if v.abs() <= GEOMETRY_EPS * scale {
        0.0
    } else {
        v
    }
}

/// `p` is known collinear with `seg`; is it within the segment's bounds?
fn on_segment(seg: &LineSegment, p: Point) -> bool {
    let (min, max) = seg.bounds();
    p.x >= min[0] - GEOMETRY_EPS
        && p.x <= max[0] + GEOMETRY_EPS
        && p.y >= min[1] - GEOMETRY_EPS
        && p.y <= max[1] + GEOMETRY_EPS
}
