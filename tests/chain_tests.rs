use chainlash::{Bounds, Chain, ChainConfig, ContactMaterial, Vec2};
use chainlash::vec::Vec as _;

fn straight_chain(links: usize) -> Chain<f32> {
    Chain::new(
        Vec2::new(640.0, 360.0),
        Vec2::new(-1.0, 0.0),
        links,
        6.8,
        0.98,
        ChainConfig::default(),
    )
}

#[test]
fn chain_anchor_fixed_and_tip_heavy() {
    let chain = straight_chain(18);
    assert_eq!(chain.len(), 18);
    assert!(chain.anchor().is_fixed());
    assert!(chain.particles().iter().all(|p| p.inv_mass >= 0.0));
    assert!((chain.tip().inv_mass - 1.0 / 6.8).abs() < 1e-6);

    let expected_radius = 8.4 * (1.16 + 6.8 * 0.055);
    assert!((chain.tip().radius - expected_radius).abs() < 1e-4);
    assert!(chain.tip().radius > chain.particle(5).radius);
}

#[test]
fn chain_links_start_at_rest_length() {
    let chain = straight_chain(12);
    for pair in chain.particles().windows(2) {
        assert!((pair[0].pos.distance(pair[1].pos) - 24.0).abs() < 1e-3);
    }
}

#[test]
fn chain_relaxes_back_to_rest_length() {
    let mut chain = straight_chain(12);
    chain.particle_mut(6).pos.y += 10.0;

    for _ in 0..200 {
        chain.solve_constraints();
    }

    for (i, pair) in chain.particles().windows(2).enumerate() {
        let d = pair[0].pos.distance(pair[1].pos);
        assert!((d - 24.0).abs() < 0.5, "link {} stretched to {}", i, d);
    }
    assert_eq!(chain.anchor().pos, Vec2::new(640.0, 360.0));
}

#[test]
fn chain_resample_keeps_tip_motion() {
    let bounds = Bounds::from_size(1280.0f32, 720.0);
    let mut chain = straight_chain(18);
    let tip = chain.tip_index();
    chain.particle_mut(tip).set_velocity(Vec2::new(5.0, -2.0));
    let old_tip = chain.tip().pos;

    let anchor = Vec2::new(650.0, 360.0);
    let rebuilt = chain.resample(24, 6.8, 0.98, anchor, &bounds);

    assert_eq!(rebuilt.len(), 24);
    assert_eq!(rebuilt.tip().pos, old_tip);
    assert_eq!(rebuilt.tip().velocity(), Vec2::new(5.0, -2.0));
    assert_eq!(rebuilt.anchor().pos, anchor);
    assert_eq!(rebuilt.anchor().velocity(), Vec2::new(0.0, 0.0));
    assert!(rebuilt.anchor().is_fixed());
}

#[test]
fn chain_resample_clamps_into_arena() {
    let chain = straight_chain(18);
    let small = Bounds::from_size(300.0f32, 300.0);
    let rebuilt = chain.resample(10, 6.8, 0.98, Vec2::new(150.0, 150.0), &small);
    for p in rebuilt.particles() {
        assert!(p.pos.x >= p.radius - 1e-4 && p.pos.x <= 300.0 - p.radius + 1e-4);
        assert!(p.pos.y >= p.radius - 1e-4 && p.pos.y <= 300.0 - p.radius + 1e-4);
    }
}

#[test]
fn chain_tip_mass_changes_in_place() {
    let mut chain = straight_chain(18);
    let before = chain.positions();
    chain.set_tip_mass(10.0);
    assert!((chain.tip().inv_mass - 0.1).abs() < 1e-6);
    assert!((chain.tip().drag - (0.989 + 10.0 * 0.00062)).abs() < 1e-6);
    assert_eq!(chain.positions(), before);
}

#[test]
fn chain_kick_links_weighted_down() {
    let mut chain = straight_chain(18);
    chain.kick_links(Vec2::new(6.0, 0.0), 6);
    assert!((chain.particle(1).velocity().x - 6.0).abs() < 1e-4);
    assert!((chain.particle(6).velocity().x - 1.0).abs() < 1e-4);
    assert_eq!(chain.particle(7).velocity(), Vec2::new(0.0, 0.0));
    assert_eq!(chain.anchor().velocity(), Vec2::new(0.0, 0.0));
}

#[test]
fn chain_self_collision_separates_distant_links() {
    let mut chain = straight_chain(12);
    let p2 = chain.particle(2).pos;
    chain.particle_mut(8).place(p2 + Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0));

    chain.collide_self(&ContactMaterial::chain_self());

    let a = chain.particle(2);
    let b = chain.particle(8);
    assert!(a.pos.distance(b.pos) >= a.radius + b.radius - 1e-3);
}

#[test]
fn chain_integrate_skips_anchor() {
    let mut chain = straight_chain(10);
    chain.pin_anchor(Vec2::new(700.0, 360.0), Vec2::new(690.0, 360.0));
    chain.particle_mut(3).set_velocity(Vec2::new(0.0, 2.0));
    chain.integrate();
    assert_eq!(chain.anchor().pos, Vec2::new(700.0, 360.0));
    assert!(chain.particle(3).velocity().y > 1.9);
}
