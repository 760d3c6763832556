#![allow(dead_code)]
use mesh_wave::prelude::*;
use std::collections::VecDeque;

/// `n` cells in a row with ordinary patches `left` and `right` at the ends.
pub fn chain(n: usize) -> FaceMesh {
    FaceMesh::builder(n)
        .internal_faces((0..n - 1).map(|c| (c, c + 1)))
        .patch("left", [0], PatchKind::Ordinary)
        .patch("right", [n - 1], PatchKind::Ordinary)
        .build()
        .unwrap()
}

/// `nx × ny` structured grid, cell `(i, j)` numbered `j * nx + i`, with
/// patches `west`, `east`, `south`, `north`.
pub fn grid(nx: usize, ny: usize) -> FaceMesh {
    let id = |i: usize, j: usize| j * nx + i;
    let mut internal = Vec::new();
    for j in 0..ny {
        for i in 0..nx - 1 {
            internal.push((id(i, j), id(i + 1, j)));
        }
    }
    for j in 0..ny - 1 {
        for i in 0..nx {
            internal.push((id(i, j), id(i, j + 1)));
        }
    }
    FaceMesh::builder(nx * ny)
        .internal_faces(internal)
        .patch("west", (0..ny).map(|j| id(0, j)), PatchKind::Ordinary)
        .patch("east", (0..ny).map(|j| id(nx - 1, j)), PatchKind::Ordinary)
        .patch("south", (0..nx).map(|i| id(i, 0)), PatchKind::Ordinary)
        .patch("north", (0..nx).map(|i| id(i, ny - 1)), PatchKind::Ordinary)
        .build()
        .unwrap()
}

/// Rank `rank`'s share of a chain of `n_ranks * k` cells. The left end
/// patch (`left` or a processor patch) comes before the right end patch.
pub fn split_chain(rank: usize, n_ranks: usize, k: usize) -> FaceMesh {
    let left = if rank == 0 {
        ("left".to_string(), PatchKind::Ordinary)
    } else {
        (
            format!("procBoundary{rank}to{}", rank - 1),
            PatchKind::Processor {
                neighbour_rank: rank - 1,
            },
        )
    };
    let right = if rank + 1 == n_ranks {
        ("right".to_string(), PatchKind::Ordinary)
    } else {
        (
            format!("procBoundary{rank}to{}", rank + 1),
            PatchKind::Processor {
                neighbour_rank: rank + 1,
            },
        )
    };
    FaceMesh::builder(k)
        .internal_faces((0..k - 1).map(|c| (c, c + 1)))
        .patch(left.0, [0], left.1)
        .patch(right.0, [k - 1], right.1)
        .build()
        .unwrap()
}

/// Unit-spaced centres along x for [`split_chain`] (or [`chain`] with
/// `rank = 0`, `n_ranks = 1`).
pub fn split_chain_geometry(rank: usize, k: usize) -> MeshGeometry {
    let x0 = (rank * k) as f64;
    let cells = (0..k).map(|c| [x0 + c as f64 + 0.5, 0.0, 0.0]).collect();
    let mut faces: Vec<[f64; 3]> = (0..k - 1).map(|c| [x0 + c as f64 + 1.0, 0.0, 0.0]).collect();
    faces.push([x0, 0.0, 0.0]);
    faces.push([x0 + k as f64, 0.0, 0.0]);
    MeshGeometry::new(cells, faces)
}

pub fn hops(info: &[HopCount]) -> Vec<Option<u32>> {
    info.iter().map(|h| h.distance()).collect()
}

pub fn unreached(n: usize) -> Vec<HopCount> {
    vec![HopCount::unreached(); n]
}

/// Breadth-first cell distances over undirected `edges`.
pub fn bfs_hops(n_cells: usize, edges: &[(usize, usize)], seed: usize) -> Vec<Option<u32>> {
    let mut adj = vec![Vec::new(); n_cells];
    for &(a, b) in edges {
        adj[a].push(b);
        adj[b].push(a);
    }
    let mut dist = vec![None; n_cells];
    dist[seed] = Some(0u32);
    let mut queue = VecDeque::from([seed]);
    while let Some(c) = queue.pop_front() {
        let d = dist[c].unwrap();
        for &n in &adj[c] {
            if dist[n].is_none() {
                dist[n] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    dist
}

/// Run `body` once per rank of a private `n`-rank universe, one thread each.
pub fn run_ranks<R, F>(n: usize, body: F) -> Vec<R>
where
    R: Send,
    F: Fn(&LocalComm) -> R + Sync,
{
    let comms = LocalComm::universe(n);
    let body = &body;
    std::thread::scope(|s| {
        let handles: Vec<_> = comms.iter().map(|c| s.spawn(move || body(c))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}
