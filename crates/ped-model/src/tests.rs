//! Unit tests for ped-model.

#[cfg(test)]
mod helpers {
    use ped_agent::Agent;
    use ped_core::{AgentId, JourneyId, Point, ProfileId, StageId};
    use ped_spatial::{Geometry, GeometryBuilder, Polygon};

    pub const DT: f64 = 0.01;

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)]).unwrap()
    }

    /// The `[-1, 12] × [-1, 1]` corridor.
    pub fn corridor() -> Geometry {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(-1.0, -1.0, 12.0, 1.0));
        b.build().unwrap()
    }

    /// A 10 m room with a thin pillar `[4.8, 5.2] × [2, 8]` in the middle.
    pub fn room_with_pillar() -> Geometry {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(rect(0.0, 0.0, 10.0, 10.0));
        b.exclude_area(rect(4.8, 2.0, 5.2, 8.0));
        b.build().unwrap()
    }

    /// Agent with profile 1 walking towards `target`.
    pub fn agent(id: u64, pos: (f64, f64), target: (f64, f64)) -> Agent {
        let pos = Point::from(pos);
        let target = Point::from(target);
        let mut a = Agent::new(ProfileId(1), JourneyId(0), StageId(0), pos, target - pos);
        a.id = AgentId(id);
        a.waypoint = target;
        a.target = target;
        a
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use crate::{
        CollisionFreeSpeedParameters, CollisionFreeSpeedProfile, ModelError,
        SocialForceParameters, SocialForceProfile,
    };

    #[test]
    fn defaults_are_valid() {
        CollisionFreeSpeedParameters::default().validate().unwrap();
        CollisionFreeSpeedProfile::default().validate().unwrap();
        SocialForceParameters::default().validate().unwrap();
        SocialForceProfile::default().validate().unwrap();
    }

    #[test]
    fn non_positive_radius_rejected() {
        let p = CollisionFreeSpeedProfile { radius: 0.0, ..Default::default() };
        assert!(matches!(
            p.validate(),
            Err(ModelError::InvalidParameter { name: "radius", .. })
        ));
        let p = SocialForceProfile { radius: -0.1, ..Default::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_speed_rejected() {
        let p = CollisionFreeSpeedProfile { v0: -1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(ModelError::InvalidParameter { name: "v0", .. })));
        let p = CollisionFreeSpeedProfile { v0: 0.0, ..Default::default() };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn non_finite_rejected() {
        let p = CollisionFreeSpeedParameters {
            range_neighbor_repulsion: f64::NAN,
            ..Default::default()
        };
        assert!(p.validate().is_err());
        let p = SocialForceProfile { mass: f64::INFINITY, ..Default::default() };
        assert!(p.validate().is_err());
    }
}

// ── Collision-free speed model ────────────────────────────────────────────────

#[cfg(test)]
mod collision_free {
    use ped_core::{Point, ProfileId};

    use super::helpers::{DT, agent, corridor, room_with_pillar};
    use crate::{
        CollisionFreeSpeedModel, CollisionFreeSpeedParameters, CollisionFreeSpeedProfile,
        ModelError, PedestrianModel, StepContext,
    };

    fn model() -> CollisionFreeSpeedModel {
        CollisionFreeSpeedModel::with_profiles(
            CollisionFreeSpeedParameters::default(),
            [(ProfileId(1), CollisionFreeSpeedProfile { v0: 1.0, ..Default::default() })],
        )
        .unwrap()
    }

    #[test]
    fn duplicate_profile_rejected() {
        let mut m = model();
        let err = m.add_profile(ProfileId(1), CollisionFreeSpeedProfile::default()).unwrap_err();
        assert_eq!(err, ModelError::DuplicateProfile(ProfileId(1)));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let mut a = agent(1, (0.0, 0.0), (5.0, 0.0));
        a.profile = ProfileId(9);
        assert_eq!(
            model().compute_update(&ctx, &a, &[]).unwrap_err(),
            ModelError::UnknownProfile(ProfileId(9))
        );
    }

    #[test]
    fn free_agent_walks_at_desired_speed() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.0), (5.0, 0.0));
        let u = model().compute_update(&ctx, &a, &[]).unwrap();
        assert!((u.velocity.norm() - 1.0).abs() < 1e-9);
        assert!((u.position.x - 0.01).abs() < 1e-6);
        assert!(u.position.y.abs() < 1e-6);
        assert!(u.orientation.x > 0.999);
    }

    #[test]
    fn neighbor_ahead_limits_speed() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.0), (5.0, 0.0));
        let b = agent(2, (1.0, 0.0), (5.0, 0.0));
        let u = model().compute_update(&ctx, &a, &[&a, &b]).unwrap();
        // Gap 1.0 - 2 * 0.3 = 0.4 with T = 1 s.
        assert!((u.velocity.norm() - 0.4).abs() < 1e-6, "{}", u.velocity.norm());
    }

    #[test]
    fn neighbor_behind_does_not_limit_speed() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (1.0, 0.0), (5.0, 0.0));
        let b = agent(2, (0.0, 0.0), (5.0, 0.0));
        let u = model().compute_update(&ctx, &a, &[&b]).unwrap();
        assert!((u.velocity.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn offset_neighbor_deflects_sideways() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.05), (10.0, 0.05));
        let b = agent(2, (0.8, -0.05), (0.0, -0.05));
        let u = model().compute_update(&ctx, &a, &[&b]).unwrap();
        assert!(u.velocity.y > 0.0);
        assert!(u.interaction.y > 0.0);
    }

    #[test]
    fn head_on_neighbors_step_to_opposite_sides() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.0), (10.0, 0.0));
        let b = agent(2, (0.8, 0.0), (0.0, 0.0));
        let m = model();
        let ua = m.compute_update(&ctx, &a, &[&a, &b]).unwrap();
        let ub = m.compute_update(&ctx, &b, &[&a, &b]).unwrap();
        assert!(ua.velocity.y > 0.0, "{}", ua.velocity);
        assert!(ub.velocity.y < 0.0, "{}", ub.velocity);
        assert!((ua.velocity.y + ub.velocity.y).abs() < 1e-9);
    }

    #[test]
    fn neighbor_behind_wall_is_ignored() {
        let geo = room_with_pillar();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (4.4, 5.0), (4.4, 9.0));
        let hidden = agent(2, (5.6, 5.0), (5.6, 9.0));
        let m = model();
        let alone = m.compute_update(&ctx, &a, &[]).unwrap();
        let with = m.compute_update(&ctx, &a, &[&hidden]).unwrap();
        assert_eq!(alone, with);
    }

    #[test]
    fn coincident_neighbor_stays_finite() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (2.0, 0.0), (5.0, 0.0));
        let b = agent(2, (2.0, 0.0), (5.0, 0.0));
        let u = model().compute_update(&ctx, &a, &[&b]).unwrap();
        assert!(u.is_finite());
    }

    #[test]
    fn does_not_overshoot_target() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (4.995, 0.0), (5.0, 0.0));
        let u = model().compute_update(&ctx, &a, &[]).unwrap();
        assert!(u.position.x <= 5.0 + 1e-12);
    }

    #[test]
    fn wall_pushes_agent_away() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        // 0.35 m from the top wall, walking parallel to it.
        let a = agent(1, (5.0, 0.65), (10.0, 0.65));
        let u = model().compute_update(&ctx, &a, &[]).unwrap();
        assert!(u.interaction.y < 0.0);
        assert!(u.velocity.y < 0.0);
    }

    #[test]
    fn desired_direction_relaxes_gradually() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let mut a = agent(1, (5.0, 0.0), (10.0, 0.0));
        a.desired_direction = Point::new(0.0, 1.0);
        let u = model().compute_update(&ctx, &a, &[]).unwrap();
        // tau = 0.5 s, dt = 0.01 s: 2 % of the way towards +x.
        assert!(u.desired_direction.y > 0.9);
        assert!(u.desired_direction.x > 0.0);
    }
}

// ── Social force model ────────────────────────────────────────────────────────

#[cfg(test)]
mod social_force {
    use ped_core::ProfileId;

    use super::helpers::{DT, agent, corridor};
    use crate::{
        PedestrianModel, SocialForceModel, SocialForceParameters, SocialForceProfile,
        StepContext,
    };

    fn model_with(profile: SocialForceProfile) -> SocialForceModel {
        SocialForceModel::with_profiles(SocialForceParameters::default(), [(ProfileId(1), profile)])
            .unwrap()
    }

    #[test]
    fn resting_agent_accelerates_towards_target() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.0), (5.0, 0.0));
        let u = model_with(SocialForceProfile::default()).compute_update(&ctx, &a, &[]).unwrap();
        // (0.8 m/s / 0.5 s) * 0.01 s; wall terms at 1 m are negligible.
        assert!((u.velocity.x - 0.016).abs() < 1e-3, "{}", u.velocity.x);
        assert!(u.velocity.y.abs() < 1e-9);
    }

    #[test]
    fn overlapping_agents_are_pushed_apart() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (5.0, 0.0), (10.0, 0.0));
        let b = agent(2, (5.4, 0.0), (10.0, 0.0));
        let m = model_with(SocialForceProfile::default());
        let ua = m.compute_update(&ctx, &a, &[&a, &b]).unwrap();
        let ub = m.compute_update(&ctx, &b, &[&a, &b]).unwrap();
        assert!(ua.interaction.x < 0.0);
        assert!(ub.interaction.x > 0.0);
        assert!((ua.interaction.x + ub.interaction.x).abs() < 1e-6);
    }

    #[test]
    fn head_on_neighbors_step_to_opposite_sides() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.0), (10.0, 0.0));
        let b = agent(2, (0.8, 0.0), (0.0, 0.0));
        let m = model_with(SocialForceProfile::default());
        let ua = m.compute_update(&ctx, &a, &[&a, &b]).unwrap();
        let ub = m.compute_update(&ctx, &b, &[&a, &b]).unwrap();
        assert!(ua.velocity.y > 0.0, "{}", ua.velocity);
        assert!(ub.velocity.y < 0.0, "{}", ub.velocity);
    }

    #[test]
    fn follower_is_not_pushed_sideways() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (5.0, 0.0), (10.0, 0.0));
        let b = agent(2, (5.8, 0.0), (10.0, 0.0));
        let m = model_with(SocialForceProfile::default());
        let ub = m.compute_update(&ctx, &b, &[&a, &b]).unwrap();
        assert!(ub.interaction.y.abs() < 1e-9);
    }

    #[test]
    fn deep_overlap_stays_finite() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let m = model_with(SocialForceProfile { force_distance: 1e-4, ..Default::default() });
        let a = agent(1, (5.0, 0.0), (10.0, 0.0));
        let b = agent(2, (5.0 + 1e-6, 0.0), (10.0, 0.0));
        let u = m.compute_update(&ctx, &a, &[&b]).unwrap();
        assert!(u.is_finite());
    }

    #[test]
    fn agent_at_target_decelerates() {
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let mut a = agent(1, (5.0, 0.0), (5.0, 0.0));
        a.velocity = ped_core::Point::new(0.5, 0.0);
        let u = model_with(SocialForceProfile::default()).compute_update(&ctx, &a, &[]).unwrap();
        assert!(u.velocity.x < 0.5);
    }
}

// ── Tagged dispatch ───────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use ped_core::ProfileId;

    use super::helpers::{DT, agent, corridor};
    use crate::{
        CollisionFreeSpeedModel, CollisionFreeSpeedParameters, CollisionFreeSpeedProfile,
        ModelKind, OperationalModel, PedestrianModel, SocialForceModel, SocialForceParameters,
        SocialForceProfile, StepContext,
    };

    #[test]
    fn enum_forwards_to_variant() {
        let cfs = CollisionFreeSpeedModel::with_profiles(
            CollisionFreeSpeedParameters::default(),
            [(ProfileId(1), CollisionFreeSpeedProfile::default())],
        )
        .unwrap();
        let geo = corridor();
        let ctx = StepContext::new(DT, &geo);
        let a = agent(1, (0.0, 0.0), (5.0, 0.0));
        let direct = cfs.compute_update(&ctx, &a, &[]).unwrap();

        let model = OperationalModel::from(cfs);
        assert_eq!(model.kind(), ModelKind::CollisionFreeSpeed);
        assert_eq!(model.cutoff_radius(), 4.0);
        assert_eq!(model.compute_update(&ctx, &a, &[]).unwrap(), direct);
    }

    #[test]
    fn profile_queries() {
        let sfm = SocialForceModel::with_profiles(
            SocialForceParameters::default(),
            [
                (ProfileId(1), SocialForceProfile::default()),
                (ProfileId(2), SocialForceProfile { radius: 0.25, ..Default::default() }),
            ],
        )
        .unwrap();
        let model = OperationalModel::from(sfm);
        assert_eq!(model.kind(), ModelKind::SocialForce);
        assert_eq!(model.profile_radius(ProfileId(2)), Some(0.25));
        assert!(!model.has_profile(ProfileId(3)));
        assert_eq!(model.max_radius(), 0.3);
        assert_eq!(model.cutoff_radius(), 2.5);
    }
}
