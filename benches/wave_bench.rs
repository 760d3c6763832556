use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_wave::prelude::*;

/// `n × n` grid with every boundary face in one `walls` patch.
fn grid(n: usize) -> FaceMesh {
    let id = |i: usize, j: usize| j * n + i;
    let mut internal = Vec::new();
    for j in 0..n {
        for i in 0..n - 1 {
            internal.push((id(i, j), id(i + 1, j)));
        }
    }
    for j in 0..n - 1 {
        for i in 0..n {
            internal.push((id(i, j), id(i, j + 1)));
        }
    }
    let boundary = (0..n)
        .map(|j| id(0, j))
        .chain((0..n).map(|j| id(n - 1, j)))
        .chain((0..n).map(|i| id(i, 0)))
        .chain((0..n).map(|i| id(i, n - 1)));
    FaceMesh::builder(n * n)
        .internal_faces(internal)
        .patch("walls", boundary, PatchKind::Ordinary)
        .build()
        .unwrap()
}

/// Random connected cell graph: a spanning tree plus `extra` random faces.
fn random_mesh(n: usize, extra: usize, seed: u64) -> FaceMesh {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut faces: Vec<(usize, usize)> = (1..n).map(|c| (rng.gen_range(0..c), c)).collect();
    while faces.len() < n - 1 + extra {
        let (a, b) = (rng.gen_range(0..n), rng.gen_range(0..n));
        if a != b {
            faces.push((a.min(b), a.max(b)));
        }
    }
    FaceMesh::builder(n)
        .internal_faces(faces)
        .patch("seed", [0], PatchKind::Ordinary)
        .build()
        .unwrap()
}

fn bench_hop_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("hop_count_grid");
    for &n in &[32usize, 128] {
        let mesh = grid(n);
        let seed = mesh.patches()[0].start();
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| {
                let mut td = ();
                let wave = MeshWave::new(
                    mesh,
                    &NoComm,
                    &[seed],
                    &[HopCount::new(0)],
                    &mut td,
                    WaveConfig::default(),
                    usize::MAX,
                )
                .unwrap();
                wave.n_evals()
            })
        });
    }
    group.finish();
}

fn bench_random_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("hop_count_random");
    for &n in &[1_000usize, 20_000] {
        let mesh = random_mesh(n, 2 * n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| {
                let mut td = ();
                let wave = MeshWave::new(
                    mesh,
                    &NoComm,
                    &[mesh.patches()[0].start()],
                    &[HopCount::new(0)],
                    &mut td,
                    WaveConfig::default(),
                    usize::MAX,
                )
                .unwrap();
                wave.n_unvisited_cells()
            })
        });
    }
    group.finish();
}

fn bench_wall_distance(c: &mut Criterion) {
    let n = 128;
    let mesh = grid(n);
    let cells = (0..n * n)
        .map(|k| [(k % n) as f64 + 0.5, (k / n) as f64 + 0.5, 0.0])
        .collect();
    let mut faces = Vec::with_capacity(mesh.n_faces());
    for j in 0..n {
        for i in 0..n - 1 {
            faces.push([i as f64 + 1.0, j as f64 + 0.5, 0.0]);
        }
    }
    for j in 0..n - 1 {
        for i in 0..n {
            faces.push([i as f64 + 0.5, j as f64 + 1.0, 0.0]);
        }
    }
    faces.extend((0..n).map(|j| [0.0, j as f64 + 0.5, 0.0]));
    faces.extend((0..n).map(|j| [n as f64, j as f64 + 0.5, 0.0]));
    faces.extend((0..n).map(|i| [i as f64 + 0.5, 0.0, 0.0]));
    faces.extend((0..n).map(|i| [i as f64 + 0.5, n as f64, 0.0]));
    let geometry = MeshGeometry::new(cells, faces);

    c.bench_function("wall_distance_grid_128", |b| {
        b.iter(|| {
            wall_distance(&mesh, &NoComm, &geometry, &[0], WaveConfig::default(), usize::MAX)
                .unwrap()
                .iterations
        })
    });
}

criterion_group!(benches, bench_hop_count, bench_random_graph, bench_wall_distance);
criterion_main!(benches);
