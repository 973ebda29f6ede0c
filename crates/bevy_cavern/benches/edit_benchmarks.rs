//! Benchmarks for the terrain edit pipeline.
//!
//! Replays a digging pattern: random brushes working their way down from the
//! top of the map, the way a player tunnels into the ground.

use bevy_cavern::{Brush, CavernConfig, CellPos, EditRequest, SeedPattern, Terrain};
use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use rand::prelude::*;

// ============================================================================
// Edit Generators
// ============================================================================

/// Carving edits descending from the top row to the bottom row.
fn descending_digs(config: &CavernConfig, per_row: usize, seed: u64) -> Vec<EditRequest> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edits = Vec::new();
    for y in 0..config.height as i32 {
        for _ in 0..per_row {
            let x = rng.random_range(0..config.width as i32);
            let brush = Brush::ALL[rng.random_range(0..Brush::ALL.len())];
            edits.push(EditRequest::centered(CellPos::new(x, y), brush.mask(), true));
        }
    }
    edits
}

/// Mixed carve/fill edits anywhere on the map.
fn scattered_edits(config: &CavernConfig, count: usize, seed: u64) -> Vec<EditRequest> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let center = CellPos::new(
                rng.random_range(0..config.width as i32),
                rng.random_range(0..config.height as i32),
            );
            let brush = Brush::ALL[rng.random_range(0..Brush::ALL.len())];
            EditRequest::centered(center, brush.mask(), rng.random_bool(0.7))
        })
        .collect()
}

struct Case {
    name: &'static str,
    config: CavernConfig,
}

fn cases() -> Vec<Case> {
    let base = CavernConfig::for_chunk_counts(8, 8, 8);
    vec![
        Case {
            name: "rooms+chunks",
            config: base.clone(),
        },
        Case {
            name: "rooms",
            config: base.clone().with_tracking(true, false),
        },
        Case {
            name: "chunks",
            config: base.with_tracking(false, true),
        },
    ]
}

// ============================================================================
// Benchmark: Digging
// ============================================================================

fn bench_descending_digs(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit/descending_digs");
    group.sample_size(20);

    for case in cases() {
        let edits = descending_digs(&case.config, 2, 42);
        group.throughput(Throughput::Elements(edits.len() as u64));
        group.bench_with_input(BenchmarkId::new("apply", case.name), &edits, |b, edits| {
            b.iter_batched(
                || Terrain::new(case.config.clone()).expect("valid bench config"),
                |mut terrain| {
                    for edit in edits {
                        black_box(terrain.apply_edit(edit).expect("non-empty brush"));
                    }
                    terrain
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Mixed Edits On Noise
// ============================================================================

fn bench_scattered_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit/scattered");
    group.sample_size(20);

    for case in cases() {
        let config = case.config.with_seed(SeedPattern::Noise {
            density: 0.5,
            seed: 9,
        });
        let edits = scattered_edits(&config, 200, 7);
        group.throughput(Throughput::Elements(edits.len() as u64));
        group.bench_with_input(BenchmarkId::new("apply", case.name), &edits, |b, edits| {
            b.iter_batched(
                || Terrain::new(config.clone()).expect("valid bench config"),
                |mut terrain| {
                    for edit in edits {
                        black_box(terrain.apply_edit(edit).expect("non-empty brush"));
                    }
                    terrain
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Full Build
// ============================================================================

fn bench_initial_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit/initial_build");
    group.sample_size(20);

    for density in [0.3f32, 0.5, 0.7] {
        let config = CavernConfig::for_chunk_counts(8, 8, 8)
            .with_seed(SeedPattern::Noise { density, seed: 1 });
        group.bench_with_input(
            BenchmarkId::new("noise", format!("{density:.1}")),
            &config,
            |b, config| b.iter(|| Terrain::new(black_box(config.clone())).expect("valid config")),
        );
    }

    group.finish();
}

// ============================================================================
// Statistics Output
// ============================================================================

fn print_dig_stats(_c: &mut Criterion) {
    println!("\n=== Digging Statistics ===\n");
    println!(
        "{:<15} {:>8} {:>8} {:>10} {:>10}",
        "Case", "Edits", "Rooms", "Contours", "Points"
    );
    println!("{}", "-".repeat(55));

    for case in cases() {
        let edits = descending_digs(&case.config, 2, 42);
        let Ok(mut terrain) = Terrain::new(case.config.clone()) else {
            continue;
        };
        for edit in &edits {
            let _ = terrain.apply_edit(edit);
        }
        let contours: Vec<_> = terrain
            .regions()
            .iter()
            .flat_map(|(_, r)| r.contours().iter())
            .chain(terrain.chunks().iter().flat_map(|c| c.contours().iter()))
            .collect();
        let points: usize = contours.iter().map(|c| c.len()).sum();
        println!(
            "{:<15} {:>8} {:>8} {:>10} {:>10}",
            case.name,
            edits.len(),
            terrain.regions().len(),
            contours.len(),
            points
        );
    }
    println!();
}

criterion_group!(
    benches,
    print_dig_stats,
    bench_descending_digs,
    bench_scattered_edits,
    bench_initial_build
);
criterion_main!(benches);
