use criterion::{
    BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};
use nalgebra::Vector3;
use std::sync::Arc;
use stf::{
    SpaceTimeFunction,
    implicit::{Ball, Capsule},
    space_time::{Sweep, Union},
    transform::{PolyBezier, Rotation},
};

/// A ball carried along a wavy sampled curve
fn swept_curve(samples: usize) -> Arc<dyn SpaceTimeFunction<3>> {
    let pts = (0..samples)
        .map(|i| {
            let x = i as f64 / (samples - 1) as f64;
            Vector3::new(x * 4.0, (x * 9.0).sin(), (x * 5.0).cos() * 0.5)
        })
        .collect();
    let path = PolyBezier::from_samples(pts, true).unwrap();
    Arc::new(Sweep::new(
        Arc::new(Ball::new(0.25, Vector3::zeros()).unwrap()),
        Arc::new(path),
    ))
}

/// A left-leaning chain of smooth unions over spinning capsules
fn union_tree(count: usize) -> Arc<dyn SpaceTimeFunction<3>> {
    let leaves = (0..count).map(|i| {
        let a = i as f64;
        let capsule = Capsule::new(
            0.1,
            Vector3::new(a * 0.3, 0.0, 0.0),
            Vector3::new(a * 0.3, 1.0, 0.0),
        )
        .unwrap();
        let spin = Rotation::about_axis(
            Vector3::new(a * 0.3, 0.5, 0.0),
            Vector3::new(1.0, a, 0.5),
            180.0,
        )
        .unwrap();
        Arc::new(Sweep::new(Arc::new(capsule), Arc::new(spin)))
            as Arc<dyn SpaceTimeFunction<3>>
    });
    leaves
        .reduce(|a, b| {
            Arc::new(Union::new(a, b, 0.05).unwrap())
                as Arc<dyn SpaceTimeFunction<3>>
        })
        .unwrap()
}

fn queries(n: usize) -> Vec<(Vector3<f64>, f64)> {
    (0..n)
        .map(|i| {
            let x = i as f64 / n as f64;
            (Vector3::new(x * 4.0, x.sin(), x.cos() - 0.5), x)
        })
        .collect()
}

fn run_bench(
    c: &mut Criterion,
    group_name: &'static str,
    make: fn(usize) -> Arc<dyn SpaceTimeFunction<3>>,
) {
    let qs = queries(256);
    let mut group = c.benchmark_group(group_name);
    for n in [4, 16, 64] {
        let f = make(n);
        group.bench_function(BenchmarkId::new("value", n), |b| {
            b.iter(|| {
                for (p, t) in &qs {
                    black_box(f.value(p, *t).unwrap());
                }
            })
        });
        group.bench_function(BenchmarkId::new("gradient", n), |b| {
            b.iter(|| {
                for (p, t) in &qs {
                    black_box(f.gradient(p, *t).unwrap());
                }
            })
        });
    }
}

pub fn curve_benches(c: &mut Criterion) {
    run_bench(c, "swept curve", swept_curve);
}

pub fn union_benches(c: &mut Criterion) {
    run_bench(c, "union tree", union_tree);
}

criterion_group!(benches, curve_benches, union_benches);
criterion_main!(benches);
