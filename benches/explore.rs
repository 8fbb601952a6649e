use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mwt::{
    compute_seed, BootstrapExplorer, ConstantActions, EpsilonGreedyExplorer, FixedPolicy,
    FullExplorer, GenericSampleWithoutReplacementExplorer, MemoryRecorder, MwtExplorer,
    PermutationExplorer, Prg, SoftmaxExplorer,
};
use std::hint::black_box;

fn bench_single_action(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_action");
    for &n in &[4u32, 64, 1024] {
        let scores: Vec<f64> = (0..n).map(|i| ((i * 37 + 11) % 101) as f64 / 50.0).collect();
        let eg = EpsilonGreedyExplorer::new(0.2).unwrap();
        let sm = SoftmaxExplorer::new(1.0).unwrap();

        group.bench_with_input(BenchmarkId::new("epsilon_greedy", n), &n, |b, &n| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let d = eg.choose(&mut Prg::new(seed), 1, n).unwrap();
                black_box(d);
            })
        });

        group.bench_with_input(BenchmarkId::new("softmax", n), &n, |b, &n| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let d = sm.choose(&mut Prg::new(seed), black_box(&scores), n).unwrap();
                black_box(d);
            })
        });
    }
    group.finish();
}

fn bench_rankings(c: &mut Criterion) {
    let mut group = c.benchmark_group("rankings");
    for &n in &[8u32, 64, 256] {
        let weights: Vec<f64> = (0..n).map(|i| 1.0 + (i % 7) as f64).collect();
        let swor = GenericSampleWithoutReplacementExplorer::new();
        let perm = PermutationExplorer::new();

        group.bench_with_input(BenchmarkId::new("permutation", n), &n, |b, &n| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(perm.explore(&mut Prg::new(seed), n).unwrap());
            })
        });

        group.bench_with_input(BenchmarkId::new("sample_without_replacement", n), &n, |b, &n| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(swor.choose(&mut Prg::new(seed), &weights, n).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap");
    let ex = BootstrapExplorer::<u32>::new();
    for &bags in &[4usize, 32, 256] {
        let values: Vec<u32> = (0..bags).map(|i| (i % 10) as u32 + 1).collect();
        group.bench_with_input(BenchmarkId::from_parameter(bags), &bags, |b, _| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(ex.choose(&mut Prg::new(seed), &values, 10).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_orchestrator(c: &mut Criterion) {
    let mwt = MwtExplorer::<u64, _, _, _>::builder(
        "bench",
        MemoryRecorder::<u64, u32, ()>::new(),
        EpsilonGreedyExplorer::new(0.1).unwrap(),
    )
    .policy(FixedPolicy::new(3u32))
    .num_actions(ConstantActions(10))
    .build()
    .unwrap();
    let keys: Vec<String> = (0..1024).map(|i| format!("event-{i}")).collect();

    c.bench_function("seed_derivation", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % keys.len();
            black_box(compute_seed("bench", black_box(&keys[i])));
        })
    });

    c.bench_function("decide", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % keys.len();
            black_box(mwt.decide(&keys[i], &(i as u64), None).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_single_action,
    bench_rankings,
    bench_bootstrap,
    bench_orchestrator
);
criterion_main!(benches);
