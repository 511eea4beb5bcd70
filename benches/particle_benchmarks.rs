//! 粒子系统性能基准测试
//!
//! 测试发射、积分和过期移除的吞吐量

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use sprite_particles::config::EmitterConfig;
use sprite_particles::particles::{EmissionPolicy, Emitter, Rect};
use sprite_particles::render::InstanceRenderer;

fn bench_config() -> EmitterConfig {
    EmitterConfig::default()
        .with_seed(0xC0FFEE)
        .with_gravity(Vec2::new(0.0, -9.8))
        .with_velocity(Vec2::new(0.0, 12.0))
        .with_drag(0.02)
        .with_spawn_rect(Rect::new(-20.0, -20.0, 40.0, 40.0))
}

fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_spawn");

    for count in [100usize, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let mut emitter = Emitter::new(bench_config()).unwrap();
                black_box(emitter.spawn(count));
            });
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_update");

    for count in [100usize, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut emitter =
                Emitter::with_renderer(bench_config().with_lifetime(f32::MAX), InstanceRenderer::new())
                    .unwrap();
            emitter.spawn(count);

            b.iter(|| {
                black_box(emitter.update(1.0 / 60.0).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_steady_state(c: &mut Criterion) {
    c.bench_function("emitter_steady_state_rate_600", |b| {
        let config = bench_config()
            .with_lifetime(2.0)
            .with_emission(EmissionPolicy::Rate { per_second: 600.0 });
        let mut emitter = Emitter::with_renderer(config, InstanceRenderer::new()).unwrap();
        // 预热到稳定粒子数
        for _ in 0..180 {
            emitter.update(1.0 / 60.0).unwrap();
        }

        b.iter(|| {
            black_box(emitter.update(1.0 / 60.0).unwrap());
        });
    });
}

criterion_group!(benches, bench_spawn, bench_update, bench_steady_state);
criterion_main!(benches);
