//! Benchmarks for the chainlash tick.

use criterion::{criterion_group, criterion_main, Criterion};
use chainlash::*;
use chainlash::damage::{resolve_strike, Strike};

fn swinging_sim(links: usize) -> Simulation {
    let tuning = Tuning { link_count: links, ..Tuning::default() };
    let mut sim = Simulation::new(SimConfig::new().with_seed(3).with_tuning(tuning)).unwrap();
    sim.reset_arena();
    sim
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("tick_18_links_12_targets_120_steps", |b| {
        b.iter(|| {
            let mut sim = swinging_sim(18);
            let center = sim.bounds().center();
            for step in 0..120 {
                let t = step as f64 / 120.0;
                let pos = center + Vec2::from_angle(t as f32 * 8.0).scale(240.0);
                sim.pointer(pos.x, pos.y, t);
                sim.tick();
            }
            sim.tip_speed()
        });
    });
}

fn bench_long_chain(c: &mut Criterion) {
    c.bench_function("tick_30_links_120_steps", |b| {
        b.iter(|| {
            let mut sim = swinging_sim(30);
            for _ in 0..120 {
                sim.tick();
            }
            sim.chain().positions()
        });
    });
}

fn bench_blast_chain_reaction(c: &mut Criterion) {
    c.bench_function("blast_reaction_16_explosives", |b| {
        b.iter(|| {
            let mut targets: std::vec::Vec<Target> = (0..16)
                .map(|i| Target::with_max_hp(Vec2::new(i as f32 * 50.0, 0.0), 20.0, Tier::Explosive, 0.5))
                .collect();
            let mut shatters = std::vec::Vec::new();
            let strike = Strike::direct(60.0, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 6.8);
            resolve_strike(&mut targets, 0, strike, &mut shatters);
            shatters.len()
        });
    });
}

criterion_group!(benches, bench_tick, bench_long_chain, bench_blast_chain_reaction);
criterion_main!(benches);
