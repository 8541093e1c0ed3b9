//! Unit tests for ped-spatial.
//!
//! All geometries are hand-crafted rectangles so expected walls can be
//! checked exactly.

#[cfg(test)]
mod helpers {
    use ped_core::Point;

    use crate::{Geometry, GeometryBuilder, Polygon};

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)]).unwrap()
    }

    /// The obstacle-free corridor `[-1, 12] × [-1, 1]`.
    pub fn corridor() -> Geometry {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(-1.0, -1.0, 12.0, 1.0));
        b.build().unwrap()
    }

    pub fn total_wall_length(geo: &Geometry) -> f64 {
        geo.walls().iter().map(|w| w.length()).sum()
    }

    pub fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }
}

// ── Segments ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod segment {
    use super::helpers::p;
    use crate::LineSegment;

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let s = LineSegment::new(p(0.0, 0.0), p(2.0, 0.0));
        assert_eq!(s.closest_point(p(1.0, 5.0)), p(1.0, 0.0));
        assert_eq!(s.closest_point(p(-3.0, 1.0)), p(0.0, 0.0));
        assert_eq!(s.closest_point(p(9.0, -1.0)), p(2.0, 0.0));
        assert!((s.distance_to(p(1.0, 5.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_and_touching_intersect() {
        let s = LineSegment::new(p(0.0, 0.0), p(2.0, 2.0));
        assert!(s.intersects(&LineSegment::new(p(0.0, 2.0), p(2.0, 0.0))));
        assert!(s.intersects(&LineSegment::new(p(2.0, 2.0), p(3.0, 0.0))));
        assert!(!s.intersects(&LineSegment::new(p(0.0, 1.0), p(0.5, 2.0))));
    }

    #[test]
    fn collinear_overlap_contacts() {
        let s = LineSegment::new(p(0.0, 0.0), p(4.0, 0.0));
        let o = LineSegment::new(p(1.0, 0.0), p(3.0, 0.0));
        let mut t = s.contact_params(&o);
        t.sort_by(f64::total_cmp);
        assert_eq!(t, vec![0.25, 0.75]);
    }

    #[test]
    fn t_junction_contact() {
        let s = LineSegment::new(p(0.0, 0.0), p(4.0, 0.0));
        let o = LineSegment::new(p(1.0, 0.0), p(1.0, 3.0));
        assert_eq!(s.contact_params(&o), vec![0.25]);
    }
}

// ── Polygons ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod polygon {
    use super::helpers::{p, rect};
    use crate::{GeometryError, Polygon};

    #[test]
    fn closing_vertex_is_dropped() {
        let poly = Polygon::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap();
        assert_eq!(poly.exterior().len(), 3);
    }

    #[test]
    fn degenerate_rings_rejected() {
        assert_eq!(
            Polygon::new([(0.0, 0.0), (1.0, 0.0)]).unwrap_err(),
            GeometryError::TooFewVertices(2)
        );
        assert_eq!(
            Polygon::new([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap_err(),
            GeometryError::ZeroArea
        );
    }

    #[test]
    fn bow_tie_rejected() {
        let err = Polygon::new([(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 2.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::SelfIntersecting(_, _)));
    }

    #[test]
    fn non_finite_rejected() {
        let err = Polygon::new([(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::NonFiniteCoordinate);
    }

    #[test]
    fn holes_are_outside() {
        let hole = vec![p(4.0, 4.0), p(6.0, 4.0), p(6.0, 6.0), p(4.0, 6.0)];
        let poly = Polygon::with_holes(
            [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            [hole],
        )
        .unwrap();
        assert!(poly.contains(p(1.0, 1.0)));
        assert!(!poly.contains(p(5.0, 5.0)));
        assert!((poly.area() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn hole_outside_exterior_rejected() {
        let hole = vec![p(20.0, 20.0), p(21.0, 20.0), p(21.0, 21.0)];
        let err = Polygon::with_holes([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], [hole]).unwrap_err();
        assert_eq!(err, GeometryError::HoleOutsideExterior);
    }

    #[test]
    fn centroid_of_rectangle() {
        let c = rect(9.0, -1.0, 11.0, 1.0).centroid();
        assert!((c.x - 10.0).abs() < 1e-12 && c.y.abs() < 1e-12);
    }
}

// ── Geometry & walls ──────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use super::helpers::{corridor, p, rect, total_wall_length};
    use crate::{GeometryBuilder, GeometryError, LineSegment};

    #[test]
    fn empty_builder_rejected() {
        assert_eq!(GeometryBuilder::new().build().err(), Some(GeometryError::NoAccessibleArea));
    }

    #[test]
    fn corridor_walls_are_its_perimeter() {
        let geo = corridor();
        assert_eq!(geo.walls().len(), 4);
        assert!((total_wall_length(&geo) - 30.0).abs() < 1e-9);
        assert!(geo.contains(p(0.0, 0.0)));
        assert!(!geo.contains(p(13.0, 0.0)));
    }

    #[test]
    fn shared_edge_is_not_a_wall() {
        // Two 2×2 squares side by side form a 4×2 rectangle: perimeter 12.
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(0.0, 0.0, 2.0, 2.0));
        b.add_accessible_area(rect(2.0, 0.0, 4.0, 2.0));
        let geo = b.build().unwrap();
        assert!((total_wall_length(&geo) - 12.0).abs() < 1e-9);
        assert!(geo.contains(p(2.0 + 1e-3, 1.0)));
    }

    #[test]
    fn partially_shared_edge_keeps_the_rest() {
        // 10×4 room with a 2×1.2 corridor attached to its right side.
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(50.0, 100.0, 60.0, 104.0));
        b.add_accessible_area(rect(60.0, 101.4, 62.0, 102.6));
        let geo = b.build().unwrap();
        // Room perimeter 28 minus the 1.2 opening, plus corridor 2 + 2 + 1.2.
        let expected = 28.0 - 1.2 + 2.0 + 2.0 + 1.2;
        assert!((total_wall_length(&geo) - expected).abs() < 1e-9, "{}", total_wall_length(&geo));
        assert!(!geo.intersects_any(&LineSegment::new(p(59.0, 102.0), p(61.0, 102.0))));
        assert!(geo.intersects_any(&LineSegment::new(p(59.0, 103.0), p(61.0, 103.0))));
    }

    #[test]
    fn obstacle_creates_inner_walls() {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(0.0, 0.0, 10.0, 10.0));
        b.exclude_area(rect(4.0, 4.0, 6.0, 6.0));
        let geo = b.build().unwrap();
        assert!(!geo.contains(p(5.0, 5.0)));
        assert!((total_wall_length(&geo) - 48.0).abs() < 1e-9);
        let d = geo.distance_to_nearest_wall(p(3.0, 5.0)).unwrap();
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn walls_within_radius() {
        let geo = corridor();
        // (0, 0): 1 m to the top, bottom and left walls, 12 m to the right one.
        assert_eq!(geo.walls_within(p(0.0, 0.0), 1.5).len(), 3);
        assert_eq!(geo.walls_within(p(5.0, 0.0), 0.5).len(), 0);
        assert_eq!(geo.walls_within(p(5.0, 0.0), 1.01).len(), 2);
    }

    #[test]
    fn bounds_cover_all_areas() {
        let (lo, hi) = corridor().bounds();
        assert_eq!((lo, hi), (p(-1.0, -1.0), p(12.0, 1.0)));
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::{corridor, p, rect};
    use crate::{Geometry, GeometryBuilder, GeometryError, Polygon};

    /// Room `[0, 20] × [0, 10]` with the block `[8, 10] × [3, 7]` removed.
    fn room_with_block() -> Geometry {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(0.0, 0.0, 20.0, 10.0));
        b.exclude_area(rect(8.0, 3.0, 10.0, 7.0));
        b.build().unwrap()
    }

    /// L-shaped room whose inner corner sits at (4, 4).
    fn l_room() -> Geometry {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(
            Polygon::new([(0.0, 0.0), (10.0, 0.0), (10.0, 4.0), (4.0, 4.0), (4.0, 10.0), (0.0, 10.0)])
                .unwrap(),
        );
        b.build().unwrap()
    }

    #[test]
    fn convex_room_has_no_corner_nodes() {
        let geo = corridor();
        assert!(geo.routing_nodes().is_empty());
        let route = geo.route(p(0.0, 0.0), p(10.0, 0.5)).unwrap();
        assert!(route.is_direct());
        assert_eq!(route.next_waypoint(), p(10.0, 0.5));
        assert!((route.length() - p(0.0, 0.0).distance(p(10.0, 0.5))).abs() < 1e-12);
    }

    #[test]
    fn block_corners_become_nodes() {
        let geo = room_with_block();
        let nodes = geo.routing_nodes();
        assert_eq!(nodes.len(), 4);
        for corner in [p(8.0, 3.0), p(10.0, 3.0), p(10.0, 7.0), p(8.0, 7.0)] {
            assert!(nodes.iter().any(|n| (n.distance(corner) - 0.5).abs() < 1e-9), "{corner}");
        }
        assert!(nodes.iter().all(|&n| geo.contains(n)));
    }

    #[test]
    fn route_bends_around_block() {
        let geo = room_with_block();
        let (from, to) = (p(2.0, 5.0), p(19.0, 5.0));
        let route = geo.route(from, to).unwrap();

        let points = route.waypoints();
        assert_eq!(points.len(), 4, "{points:?}");
        assert_eq!(points[0], from);
        assert_eq!(points[3], to);
        for leg in points.windows(2) {
            assert!(geo.line_of_sight(leg[0], leg[1]), "{} -> {}", leg[0], leg[1]);
        }
        // First corner is in front of the block, on one of its long sides.
        let first = route.next_waypoint();
        assert!(first.x < 8.0 && (first.y < 3.0 || first.y > 7.0), "{first}");
        assert!(route.length() > from.distance(to));
        assert!(route.length() < 19.0, "{}", route.length());
    }

    #[test]
    fn route_turns_the_inner_corner_of_an_l() {
        let geo = l_room();
        assert_eq!(geo.routing_nodes().len(), 1);
        let route = geo.route(p(8.0, 2.0), p(2.0, 8.0)).unwrap();
        assert_eq!(route.waypoints().len(), 3);
        let corner = route.next_waypoint();
        assert!(corner.x < 4.0 && corner.y < 4.0, "{corner}");
        assert!((corner.distance(p(4.0, 4.0)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn route_is_deterministic() {
        let geo = room_with_block();
        let a = geo.route(p(2.0, 5.0), p(19.0, 5.0)).unwrap();
        let b = geo.route(p(2.0, 5.0), p(19.0, 5.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn points_outside_are_not_routable() {
        let geo = room_with_block();
        assert!(!geo.is_routable(p(9.0, 5.0)));
        assert!(!geo.is_routable(p(f64::NAN, 5.0)));
        assert_eq!(
            geo.route(p(2.0, 5.0), p(9.0, 5.0)).err(),
            Some(GeometryError::NotRoutable(p(9.0, 5.0)))
        );
    }

    #[test]
    fn disconnected_areas_have_no_route() {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(0.0, 0.0, 2.0, 2.0));
        b.add_accessible_area(rect(5.0, 0.0, 7.0, 2.0));
        let geo = b.build().unwrap();
        let err = geo.route(p(1.0, 1.0), p(6.0, 1.0)).err();
        assert_eq!(err, Some(GeometryError::NoRoute { from: p(1.0, 1.0), to: p(6.0, 1.0) }));
    }

    #[test]
    fn invalid_clearance_rejected() {
        for clearance in [0.0, -1.0, f64::NAN] {
            let mut b = GeometryBuilder::new();
            b.add_accessible_area(rect(0.0, 0.0, 2.0, 2.0));
            b.corner_clearance(clearance);
            assert!(matches!(b.build(), Err(GeometryError::InvalidClearance(_))));
        }
    }

    #[test]
    fn clearance_sets_node_offset() {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(0.0, 0.0, 20.0, 10.0));
        b.exclude_area(rect(8.0, 3.0, 10.0, 7.0));
        b.corner_clearance(1.0);
        let geo = b.build().unwrap();
        let corners = [p(8.0, 3.0), p(10.0, 3.0), p(10.0, 7.0), p(8.0, 7.0)];
        for node in geo.routing_nodes() {
            let d = corners.iter().map(|&c| node.distance(c)).fold(f64::INFINITY, f64::min);
            assert!((d - 1.0).abs() < 1e-9, "{node}: {d}");
        }
    }
}

// ── Neighbourhood grid ────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use ped_core::{AgentId, AgentRng, Point};

    use super::helpers::p;
    use crate::{GeometryError, NeighborhoodGrid};

    #[test]
    fn invalid_cell_size_rejected() {
        assert!(matches!(NeighborhoodGrid::new(0.0), Err(GeometryError::InvalidCellSize(_))));
        assert!(NeighborhoodGrid::new(f64::NAN).is_err());
    }

    #[test]
    fn update_moves_between_cells() {
        let mut g = NeighborhoodGrid::new(1.0).unwrap();
        g.update(AgentId(1), p(0.5, 0.5));
        g.update(AgentId(2), p(5.5, 5.5));
        assert_eq!(g.query_radius(p(0.5, 0.5), 0.1), vec![AgentId(1)]);

        g.update(AgentId(1), p(5.2, 5.2));
        assert!(g.query_radius(p(0.5, 0.5), 0.1).is_empty());
        assert_eq!(g.query_radius(p(5.3, 5.3), 0.1), vec![AgentId(1), AgentId(2)]);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn remove_is_reported() {
        let mut g = NeighborhoodGrid::new(2.0).unwrap();
        g.update(AgentId(3), p(1.0, 1.0));
        assert!(g.remove(AgentId(3)));
        assert!(!g.remove(AgentId(3)));
        assert!(g.is_empty());
        assert!(g.query_radius(p(1.0, 1.0), 5.0).is_empty());
    }

    #[test]
    fn rebuild_replaces_contents() {
        let mut g = NeighborhoodGrid::new(1.0).unwrap();
        g.update(AgentId(1), p(0.0, 0.0));
        g.rebuild([(AgentId(7), p(3.0, 3.0))]);
        assert!(!g.contains(AgentId(1)));
        assert_eq!(g.position(AgentId(7)), Some(p(3.0, 3.0)));
    }

    #[test]
    fn negative_coordinates_are_indexed() {
        let mut g = NeighborhoodGrid::new(1.0).unwrap();
        g.update(AgentId(1), p(-0.2, -0.2));
        assert_eq!(g.query_radius(p(0.1, 0.1), 0.35), vec![AgentId(1)]);
    }

    /// Random placements: every agent within `r` of the probe must be a
    /// candidate, whatever the cell size.
    #[test]
    fn query_has_no_false_negatives() {
        for (trial, cell) in [0.3, 1.0, 2.5, 7.0].into_iter().enumerate() {
            let mut g = NeighborhoodGrid::new(cell).unwrap();
            let mut rng = AgentRng::new(1234, AgentId(trial as u64), 0);
            let mut placed = Vec::new();
            for i in 0..500u64 {
                let pos = Point::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
                g.update(AgentId(i), pos);
                placed.push((AgentId(i), pos));
            }
            for _ in 0..100 {
                let probe = Point::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
                let r = rng.gen_range(0.0..5.0);
                let candidates = g.query_radius(probe, r);
                for &(id, pos) in &placed {
                    if pos.distance(probe) <= r {
                        assert!(candidates.binary_search(&id).is_ok(), "missed {id} (cell {cell})");
                    }
                }
                let exact = g.agents_within(probe, r);
                assert!(exact.iter().all(|(_, q)| q.distance(probe) <= r));
            }
        }
    }
}
