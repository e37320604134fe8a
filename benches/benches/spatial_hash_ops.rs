// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use spatial_hash::{Aabb, QueryResults, SpatialHash};

const CELL: f64 = 32.0;

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb::new(x as f64 * cell, y as f64 * cell, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, world: f64, size: f64) -> Vec<Aabb<f64>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * (world - size).max(1.0);
            let y = rng.next_f64() * (world - size).max(1.0);
            Aabb::new(x, y, size, size)
        })
        .collect()
}

fn filled(rects: &[Aabb<f64>]) -> SpatialHash<u32> {
    let mut hash = SpatialHash::with_capacity(CELL, rects.len());
    for (i, r) in rects.iter().enumerate() {
        hash.add(i as u32, r.x, r.y, r.w, r.h).unwrap();
    }
    hash
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_rects_n{n}"), |b| {
            b.iter_batched(
                || SpatialHash::<u32>::new(CELL),
                |mut hash| {
                    for (i, r) in rects.iter().enumerate() {
                        let _ = hash.add(i as u32, r.x, r.y, r.w, r.h);
                    }
                    black_box(hash.cell_count());
                },
                BatchSize::SmallInput,
            );
        });
    }
    let rects = gen_random_rects(4096, 2000.0, 48.0);
    group.bench_function("random_multi_cell", |b| {
        b.iter_batched(
            || SpatialHash::<u32>::new(CELL),
            |mut hash| {
                for (i, r) in rects.iter().enumerate() {
                    let _ = hash.add(i as u32, r.x, r.y, r.w, r.h);
                }
                black_box(hash.cell_count());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    let rects = gen_random_rects(4096, 2000.0, 8.0);
    group.throughput(Throughput::Elements(rects.len() as u64));

    // Jitter that mostly stays inside the current cells.
    group.bench_function("small_moves", |b| {
        let mut hash = filled(&rects);
        let mut phase = 0.0;
        b.iter(|| {
            phase = if phase == 0.0 { 0.5 } else { 0.0 };
            for (i, r) in rects.iter().enumerate() {
                let _ = hash.update(i as u32, r.x + phase, r.y + phase, r.w, r.h);
            }
        });
    });

    // Every update crosses into a different column of cells.
    group.bench_function("migrating_moves", |b| {
        let mut hash = filled(&rects);
        let mut offset = 0.0;
        b.iter(|| {
            offset = if offset == 0.0 { CELL } else { 0.0 };
            for (i, r) in rects.iter().enumerate() {
                let _ = hash.update(i as u32, r.x + offset, r.y, r.w, r.h);
            }
        });
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_random_rects(8192, 4000.0, 24.0);
    let probes = gen_random_rects(256, 4000.0, 200.0);
    let mut hash = filled(&rects);
    group.throughput(Throughput::Elements(probes.len() as u64));

    group.bench_function("internal_results", |b| {
        b.iter(|| {
            let mut total = 0;
            for p in &probes {
                total += hash.query(p.x, p.y, p.w, p.h).map_or(0, |hits| hits.len());
            }
            black_box(total);
        });
    });

    group.bench_function("caller_results_narrow_phase", |b| {
        let mut out = QueryResults::new();
        b.iter(|| {
            let mut total = 0;
            for p in &probes {
                if hash.query_into(p.x, p.y, p.w, p.h, |_| true, &mut out).is_ok() {
                    total += out
                        .iter()
                        .filter(|&&id| hash.get_bbox(id).is_some_and(|r| r.intersects(p)))
                        .count();
                }
            }
            black_box(total);
        });
    });

    group.bench_function("huge_region", |b| {
        b.iter(|| black_box(hash.query(-1e6, -1e6, 2e6, 2e6).map_or(0, |hits| hits.len())));
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let rects = gen_random_rects(2048, 2000.0, 40.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("remove_readd", |b| {
        let mut hash = filled(&rects);
        b.iter(|| {
            for (i, r) in rects.iter().enumerate() {
                let id = i as u32;
                let _ = hash.remove(id);
                let _ = hash.add(id, r.y, r.x, r.w, r.h);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_add, bench_update, bench_query, bench_churn);
criterion_main!(benches);
