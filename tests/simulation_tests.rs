use chainlash::{
    SimConfig, SimError, SimEvent, Simulation, SpawnOptions, StepObserver, Target, Tier, Tuning,
    Vec2,
};
use chainlash::vec::Vec as _;

const OVERLAP_SLACK: f32 = 1.5;

fn sim() -> Simulation {
    Simulation::new(SimConfig::new().with_seed(11)).unwrap()
}

/// Launch a target into the resting tip from the left so they meet during
/// the next tick.
fn launch_at_tip(sim: &mut Simulation, tier: Tier, max_hp: f32) {
    let tip = sim.chain().tip();
    let gap = tip.radius + 20.0 + 6.0;
    let mut target = Target::with_max_hp(tip.pos - Vec2::new(gap, 0.0), 20.0, tier, max_hp);
    target.set_velocity(Vec2::new(8.0, 0.0));
    sim.insert_target(target);
}

fn assert_invariants(sim: &Simulation) {
    let chain = sim.chain();
    assert!(chain.anchor().is_fixed());
    assert!(chain.particles().iter().all(|p| p.inv_mass >= 0.0));

    let bounds = sim.bounds();
    for p in chain.particles().iter().skip(1) {
        assert!(p.pos.x.is_finite() && p.pos.y.is_finite());
        assert!(p.pos.x >= bounds.min.x + p.radius - 1e-3);
        assert!(p.pos.x <= bounds.max.x - p.radius + 1e-3);
        assert!(p.pos.y >= bounds.min.y + p.radius - 1e-3);
        assert!(p.pos.y <= bounds.max.y - p.radius + 1e-3);
    }
    let targets = sim.targets();
    for (i, a) in targets.iter().enumerate() {
        assert!(!a.is_broken());
        assert!(a.hp() >= 0.0 && a.hp() <= a.max_hp());
        assert!(a.body().inv_mass >= 0.0);
        for b in targets.iter().skip(i + 1) {
            let penetration = a.radius() + b.radius() - a.position().distance(b.position());
            assert!(penetration < OVERLAP_SLACK, "targets overlap by {}", penetration);
        }
    }
}

#[test]
fn invariants_hold_while_swinging() {
    let mut sim = sim();
    sim.reset_arena();

    let center = sim.bounds().center();
    for frame in 0..600 {
        let t = frame as f64 / 60.0;
        let angle = t as f32 * 7.0;
        let pos = center + Vec2::from_angle(angle).scale(260.0);
        sim.pointer(pos.x, pos.y, t);
        sim.advance(1.0 / 60.0);
        assert_invariants(&sim);
    }
    assert!(sim.tip_speed() >= 0.0);
}

#[test]
fn tuning_setters_are_idempotent_and_clamped() {
    let mut sim = sim();
    assert!(!sim.set_link_count(18));
    assert!(sim.set_link_count(100));
    assert_eq!(sim.tuning().link_count, 30);
    assert_eq!(sim.chain().len(), 30);
    assert!(!sim.set_link_count(100));

    assert!(!sim.set_tip_mass(6.8));
    assert!(!sim.set_tip_mass(f32::NAN));
    assert!(sim.set_stiffness(5.0));
    assert_eq!(sim.tuning().stiffness, 1.45);
    assert!(sim.set_grip(0.0));
    assert_eq!(sim.tuning().grip, 0.85);
    assert!(!sim.set_grip(-3.0));
}

#[test]
fn stepped_adjusters_round() {
    let mut sim = sim();
    assert!(sim.adjust_tip_mass(0.1));
    assert!((sim.tuning().tip_mass - 6.9).abs() < 1e-5);
    assert!((sim.chain().tip().inv_mass - 1.0 / sim.tuning().tip_mass).abs() < 1e-6);

    assert!(sim.adjust_stiffness(-0.05));
    assert!((sim.tuning().stiffness - 0.93).abs() < 1e-5);

    assert!(sim.adjust_link_count(-100));
    assert_eq!(sim.tuning().link_count, 10);
    assert!(!sim.adjust_link_count(-1));
}

#[test]
fn rebuild_keeps_the_arena() {
    let mut sim = sim();
    sim.reset_arena();
    let before: Vec<(Vec2<f32>, f32)> = sim.targets().iter().map(|t| (t.position(), t.hp())).collect();
    let tip_before = sim.chain().tip().pos;

    assert!(sim.set_link_count(24));
    assert!(sim.set_tip_mass(12.0));

    let after: Vec<(Vec2<f32>, f32)> = sim.targets().iter().map(|t| (t.position(), t.hp())).collect();
    assert_eq!(before, after);
    assert_eq!(sim.shattered_count(), 0);
    assert_eq!(sim.chain().len(), 24);
    assert_eq!(sim.chain().tip().pos, tip_before);
}

#[test]
fn overlapping_targets_separate() {
    let mut sim = sim();
    sim.insert_target(Target::with_max_hp(Vec2::new(1000.0, 150.0), 20.0, Tier::Soft, 100.0));
    sim.insert_target(Target::with_max_hp(Vec2::new(1036.0, 150.0), 20.0, Tier::Soft, 100.0));

    for _ in 0..120 {
        sim.tick();
        let t = sim.targets();
        let gap = t[0].position().distance(t[1].position()) - (t[0].radius() + t[1].radius());
        assert!(gap > -0.5, "residual overlap {}", -gap);
    }
}

#[test]
fn arena_reset_spawns_a_fair_mix() {
    for seed in 1..=8 {
        let mut sim = Simulation::new(SimConfig::new().with_seed(seed)).unwrap();
        sim.reset_arena();
        let targets = sim.targets();
        assert_eq!(targets.len(), 12, "seed {}", seed);

        let explosive = targets.iter().filter(|t| t.tier() == Tier::Explosive).count();
        let metallic = targets.iter().filter(|t| t.tier() == Tier::Metallic).count();
        assert_eq!(explosive, 1, "seed {}", seed);
        assert_eq!(metallic, 1, "seed {}", seed);

        let handle = sim.handle().position();
        for (i, a) in targets.iter().enumerate() {
            assert!(a.position().distance(handle) >= 170.0);
            for b in targets.iter().skip(i + 1) {
                assert!(a.position().distance(b.position()) >= a.radius() + b.radius() + 16.0);
            }
        }
    }
}

#[test]
fn spawn_reports_shortfall_in_tiny_arena() {
    let mut sim = Simulation::new(SimConfig::new().with_arena(120.0, 120.0)).unwrap();
    let placed = sim.spawn_targets(5, SpawnOptions::default());
    assert_eq!(placed, 0);
    assert_eq!(sim.live_target_count(), 0);
}

#[test]
fn tip_impact_emits_one_event_and_damages() {
    let mut sim = sim();
    launch_at_tip(&mut sim, Tier::Soft, 1000.0);
    sim.tick();

    let events = sim.drain_events();
    let impacts: Vec<&SimEvent> = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Impact { .. }))
        .collect();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].tier(), Tier::Soft);
    assert!(impacts[0].strength() > 15.0);

    let target = &sim.targets()[0];
    assert!(target.hp() < target.max_hp());
    assert!(sim.last_impact_strength() > 0.0);
    assert!(sim.rings().count() >= 1);
    assert!(sim.drain_events().is_empty());
}

#[test]
fn shatter_removes_target_and_spawns_effects() {
    let mut sim = sim();
    launch_at_tip(&mut sim, Tier::Soft, 5.0);
    sim.tick();

    assert_eq!(sim.events().len(), 2);
    let events = sim.drain_events();
    assert!(sim.events().is_empty());
    assert!(matches!(events[0], SimEvent::Impact { .. }));
    assert!(matches!(events[1], SimEvent::Shatter { explosive: false, .. }));
    assert_eq!(sim.shattered_count(), 1);
    assert_eq!(sim.live_target_count(), 0);
    assert!(sim.targets().is_empty());
    assert!(sim.debris().count() > 0);
    assert!(sim.camera_shake() > 0.0);
    assert!(sim.hit_stop_remaining() > 0.0);
}

#[test]
fn explosive_shatter_damages_neighbours() {
    let mut sim = sim();
    launch_at_tip(&mut sim, Tier::Explosive, 0.5);
    let bomb = sim.targets()[0].position();
    sim.insert_target(Target::with_max_hp(bomb - Vec2::new(60.0, 0.0), 20.0, Tier::Soft, 1000.0));
    sim.tick();

    let shatters: Vec<SimEvent> = sim
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SimEvent::Shatter { .. }))
        .collect();
    assert_eq!(shatters.len(), 1);
    assert!(matches!(shatters[0], SimEvent::Shatter { explosive: true, tier: Tier::Explosive, .. }));

    assert_eq!(sim.targets().len(), 1);
    let neighbour = &sim.targets()[0];
    assert!(neighbour.hp() < neighbour.max_hp());
}

#[test]
fn hit_stop_freezes_ticks_but_rings_age() {
    let mut sim = sim();
    launch_at_tip(&mut sim, Tier::Soft, 5.0);
    sim.tick();
    assert!(sim.hit_stop_remaining() > 0.0);

    let ticks_before = sim.tick_count();
    let alpha_before: f32 = sim.rings().map(|r| r.alpha).sum();
    assert_eq!(sim.advance(0.016), 0);
    assert_eq!(sim.tick_count(), ticks_before);
    let alpha_after: f32 = sim.rings().map(|r| r.alpha).sum();
    assert!(alpha_after < alpha_before);

    assert_eq!(sim.hit_stop_remaining(), 0.0);
    assert_eq!(sim.advance(0.016), 1);
}

#[test]
fn arena_reset_drops_pending_hit_stop() {
    let mut sim = sim();
    launch_at_tip(&mut sim, Tier::Soft, 5.0);
    sim.tick();
    assert!(sim.hit_stop_remaining() > 0.0);

    sim.reset_arena();
    assert_eq!(sim.hit_stop_remaining(), 0.0);
    assert_eq!(sim.shattered_count(), 0);
    assert_eq!(sim.advance(0.016), 1);
}

#[test]
fn resize_clamps_everything() {
    let mut sim = sim();
    sim.reset_arena();
    sim.resize(400.0, 300.0).unwrap();

    for p in sim.chain().particles() {
        assert!(p.pos.x <= 400.0 - p.radius + 1e-3 && p.pos.y <= 300.0 - p.radius + 1e-3);
        assert_eq!(p.velocity(), Vec2::new(0.0, 0.0));
    }
    for t in sim.targets() {
        assert!(t.position().x <= 400.0 - t.radius() + 1e-3);
        assert!(t.position().y <= 300.0 - t.radius() + 1e-3);
    }
    assert!(matches!(sim.resize(0.0, 100.0), Err(SimError::InvalidArena { .. })));
}

#[test]
fn invalid_configs_are_rejected() {
    let link = Tuning { link_count: 1, ..Tuning::default() };
    assert!(matches!(
        Simulation::new(SimConfig::new().with_tuning(link)).err(),
        Some(SimError::InvalidLinkCount { count: 1 })
    ));
    assert!(matches!(
        Simulation::new(SimConfig::new().with_iterations(0)).err(),
        Some(SimError::InvalidIterations)
    ));
    assert!(matches!(
        Simulation::new(SimConfig::new().with_arena(-1.0, 100.0)).err(),
        Some(SimError::InvalidArena { .. })
    ));
    assert!(matches!(
        Simulation::new(SimConfig::new().with_fixed_dt(0.0)).err(),
        Some(SimError::InvalidTimestep)
    ));
    let heavy = Tuning { tip_mass: 100.0, ..Tuning::default() };
    assert!(matches!(
        Simulation::new(SimConfig::new().with_tuning(heavy)).err(),
        Some(SimError::TuningOutOfRange { parameter: "tip_mass" })
    ));
}

#[derive(Default)]
struct Counter {
    integrations: usize,
    iterations: usize,
    shatters: usize,
    ticks: usize,
}

impl StepObserver for Counter {
    fn on_integrate(&mut self) {
        self.integrations += 1;
    }

    fn on_solver_iteration(&mut self, _iteration: usize) {
        self.iterations += 1;
    }

    fn on_shatter(&mut self, _index: usize) {
        self.shatters += 1;
    }

    fn on_tick_complete(&mut self) {
        self.ticks += 1;
    }
}

#[test]
fn observer_sees_every_phase() {
    let mut sim = sim();
    launch_at_tip(&mut sim, Tier::Soft, 5.0);
    let mut counter = Counter::default();
    sim.tick_with(&mut counter);
    sim.tick_with(&mut counter);

    assert_eq!(counter.integrations, 2);
    assert_eq!(counter.iterations, 20);
    assert_eq!(counter.shatters, 1);
    assert_eq!(counter.ticks, 2);
}
