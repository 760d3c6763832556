mod util;
use util::*;

use mesh_wave::prelude::*;
use serde::{Deserialize, Serialize};

/// A direction that must be rotated when it crosses a transformed coupling,
/// travelling with a hop count.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Arrow {
    dir: [f64; 3],
    hops: Option<u32>,
}

impl Arrow {
    fn seed(dir: [f64; 3]) -> Self {
        Self { dir, hops: Some(0) }
    }

    fn take_if_closer(&mut self, other: &Self, hops: Option<u32>) -> bool {
        match (self.hops, hops) {
            (_, None) => false,
            (Some(mine), Some(theirs)) if mine <= theirs => false,
            _ => {
                self.dir = other.dir;
                self.hops = hops;
                true
            }
        }
    }
}

impl WaveInfo<()> for Arrow {
    fn valid(&self, _td: &()) -> bool {
        self.hops.is_some()
    }

    fn same_geometry(&self, other: &Self, tol: f64, _td: &()) -> bool {
        self.hops == other.hops && self.dir.iter().zip(&other.dir).all(|(a, b)| (a - b).abs() <= tol)
    }

    fn transform(&mut self, rotation: &Rotation, _td: &mut ()) {
        self.dir = rotation.apply(&self.dir);
    }

    fn update_cell(&mut self, _: usize, _: usize, n: &Self, _: f64, _: &mut ()) -> bool {
        self.take_if_closer(n, n.hops)
    }

    fn update_face_from_cell(&mut self, _: usize, _: usize, n: &Self, _: f64, _: &mut ()) -> bool {
        self.take_if_closer(n, n.hops.map(|h| h + 1))
    }

    fn update_face(&mut self, _: usize, n: &Self, _: f64, _: &mut ()) -> bool {
        self.take_if_closer(n, n.hops)
    }

    fn equal(&self, other: &Self, _td: &()) -> bool {
        self == other
    }
}

fn close(a: &[f64; 3], b: &[f64; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
}

/// Chain of `n` cells whose two ends are a translational cyclic pair.
fn ring(n: usize) -> FaceMesh {
    FaceMesh::builder(n)
        .internal_faces((0..n - 1).map(|c| (c, c + 1)))
        .patch(
            "front",
            [0],
            PatchKind::Cyclic {
                neighbour_patch: 1,
                rotation: None,
            },
        )
        .patch(
            "back",
            [n - 1],
            PatchKind::Cyclic {
                neighbour_patch: 0,
                rotation: None,
            },
        )
        .build()
        .unwrap()
}

#[test]
fn cyclic_wraps_around() {
    let mesh = ring(6);
    let front = mesh.patches()[0].start();
    let mut faces = unreached(mesh.n_faces());
    let mut cells = unreached(mesh.n_cells());
    let mut td = ();
    let mut wave = FaceCellWave::with_seed(
        &mesh,
        &NoComm,
        &[front],
        &[HopCount::new(0)],
        &mut faces[..],
        &mut cells[..],
        &mut td,
        WaveConfig::default(),
        Some(0),
    )
    .unwrap();
    assert_eq!(wave.iterate(100).unwrap(), 2);
    wave.check_cyclic(0).unwrap();
    wave.check_cyclic(1).unwrap();
    assert!(wave.check_cyclic(2).is_err());
    drop(wave);
    assert_eq!(
        hops(&cells),
        vec![Some(0), Some(1), Some(2), Some(2), Some(1), Some(0)]
    );
    assert_eq!(faces[front + 1].distance(), Some(0));
}

#[test]
fn rotated_cyclic_transforms_values() {
    let r = Rotation::about_z(std::f64::consts::FRAC_PI_2);
    let mesh = FaceMesh::builder(2)
        .patch(
            "a",
            [0],
            PatchKind::Cyclic {
                neighbour_patch: 1,
                rotation: Some(r),
            },
        )
        .patch(
            "b",
            [1],
            PatchKind::Cyclic {
                neighbour_patch: 0,
                rotation: Some(r.transpose()),
            },
        )
        .build()
        .unwrap();
    let mut td = ();
    let mut wave = MeshWave::new(
        &mesh,
        &NoComm,
        &[1],
        &[Arrow::seed([1.0, 0.0, 0.0])],
        &mut td,
        WaveConfig::default().with_propagation_tol(1e-9),
        10,
    )
    .unwrap();

    let a = &wave.all_face_info()[0];
    assert_eq!(a.hops, Some(0));
    assert!(close(&a.dir, &r.apply(&[1.0, 0.0, 0.0])), "got {:?}", a.dir);
    assert!(close(&wave.all_cell_info()[0].dir, &[0.0, 1.0, 0.0]));
    assert!(close(&wave.all_cell_info()[1].dir, &[1.0, 0.0, 0.0]));
    wave.wave_mut().check_cyclic(0).unwrap();
    wave.wave_mut().check_cyclic(1).unwrap();
}

#[test]
fn rotated_ami_transforms_values() {
    let r = Rotation::about_z(std::f64::consts::FRAC_PI_2);
    let ami = |neighbour_patch, rotation| PatchKind::CyclicAmi {
        neighbour_patch,
        addressing: AmiAddressing::identity(1),
        rotation: Some(rotation),
    };
    let mesh = FaceMesh::builder(2)
        .patch("a", [0], ami(1, r))
        .patch("b", [1], ami(0, r.transpose()))
        .build()
        .unwrap();
    let mut td = ();
    let wave = MeshWave::new(
        &mesh,
        &NoComm,
        &[1],
        &[Arrow::seed([1.0, 0.0, 0.0])],
        &mut td,
        WaveConfig::default(),
        10,
    )
    .unwrap();

    let a = &wave.all_face_info()[0];
    assert_eq!(a.hops, Some(0));
    assert!(close(&a.dir, &[0.0, 1.0, 0.0]), "got {:?}", a.dir);
    assert!(close(&wave.all_cell_info()[0].dir, &[0.0, 1.0, 0.0]));
    assert!(close(&wave.all_cell_info()[1].dir, &[1.0, 0.0, 0.0]));
}

/// Two arms of a quarter-turn sector: arm A runs along x from a wall at
/// `x = 1` to cyclic face `a` at `x = 3`; arm B runs along y from cyclic
/// face `b` at `y = 3` to an open end at `y = 5`. Unrolled, B continues A.
fn quarter_sector() -> (FaceMesh, MeshGeometry) {
    let r = Rotation::about_z(std::f64::consts::FRAC_PI_2);
    let mesh = FaceMesh::builder(4)
        .internal_face(0, 1)
        .internal_face(2, 3)
        .patch("wall", [0], PatchKind::Ordinary)
        .patch(
            "a",
            [1],
            PatchKind::Cyclic {
                neighbour_patch: 2,
                rotation: Some(r.transpose()),
            },
        )
        .patch(
            "b",
            [2],
            PatchKind::Cyclic {
                neighbour_patch: 1,
                rotation: Some(r),
            },
        )
        .patch("outlet", [3], PatchKind::Ordinary)
        .build()
        .unwrap();
    let cells = vec![
        [1.5, 0.0, 0.0],
        [2.5, 0.0, 0.0],
        [0.0, 3.5, 0.0],
        [0.0, 4.5, 0.0],
    ];
    let faces = vec![
        [2.0, 0.0, 0.0],
        [0.0, 4.0, 0.0],
        [1.0, 0.0, 0.0],
        [3.0, 0.0, 0.0],
        [0.0, 3.0, 0.0],
        [0.0, 5.0, 0.0],
    ];
    (mesh, MeshGeometry::new(cells, faces))
}

#[test]
fn wall_distance_through_rotated_cyclic() {
    let (mesh, geometry) = quarter_sector();
    let d = wall_distance(&mesh, &NoComm, &geometry, &[0], WaveConfig::default(), 100).unwrap();
    assert_eq!(d.n_unvisited_cells, 0);
    for (got, want) in d.cell_distance.iter().zip([0.5, 1.5, 2.5, 3.5]) {
        assert!((got - want).abs() < 1e-12, "cell: got {got}, want {want}");
    }
    for (got, want) in d.face_distance.iter().zip([1.0, 3.0, 0.0, 2.0, 2.0, 4.0]) {
        assert!((got - want).abs() < 1e-12, "face: got {got}, want {want}");
    }
}

/// Cell 0 carries a wall and two AMI faces; cell 1 one AMI face fed by both.
fn ami_pair(weights_into_b: Vec<(usize, f64)>) -> FaceMesh {
    FaceMesh::builder(2)
        .patch("wall", [0], PatchKind::Ordinary)
        .patch(
            "amiA",
            [0, 0],
            PatchKind::CyclicAmi {
                neighbour_patch: 2,
                addressing: AmiAddressing::new(vec![vec![(0, 0.5)], vec![(0, 0.5)]]),
                rotation: None,
            },
        )
        .patch(
            "amiB",
            [1],
            PatchKind::CyclicAmi {
                neighbour_patch: 1,
                addressing: AmiAddressing::new(vec![weights_into_b]),
                rotation: None,
            },
        )
        .build()
        .unwrap()
}

#[test]
fn ami_interpolates_across_patches() {
    let mesh = ami_pair(vec![(0, 0.5), (1, 0.5)]);
    let mut td = ();
    let wave = MeshWave::new(
        &mesh,
        &NoComm,
        &[0],
        &[HopCount::new(0)],
        &mut td,
        WaveConfig::default(),
        10,
    )
    .unwrap();
    assert_eq!(hops(wave.all_cell_info()), vec![Some(0), Some(1)]);
    assert_eq!(hops(wave.all_face_info()), vec![Some(0), Some(1), Some(1), Some(1)]);
    assert_eq!(wave.n_unvisited_faces(), 0);
}

#[test]
fn ami_can_be_switched_off() {
    let mesh = ami_pair(vec![(0, 0.5), (1, 0.5)]);
    let mut td = ();
    let wave = MeshWave::new(
        &mesh,
        &NoComm,
        &[0],
        &[HopCount::new(0)],
        &mut td,
        WaveConfig::default().with_cyclic_ami(false),
        10,
    )
    .unwrap();
    assert_eq!(wave.n_unvisited_cells(), 1);
    assert_eq!(wave.all_cell_info()[1].distance(), None);
}

#[test]
fn zero_weight_sources_carry_nothing() {
    let mesh = ami_pair(vec![(0, 0.0)]);
    let mut td = ();
    let wave = MeshWave::new(
        &mesh,
        &NoComm,
        &[0],
        &[HopCount::new(0)],
        &mut td,
        WaveConfig::default(),
        10,
    )
    .unwrap();
    assert_eq!(wave.all_cell_info()[1].distance(), None);
}
