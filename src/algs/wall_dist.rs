//! Distance from every cell and face to the nearest wall face.
//!
//! A [`WallPoint`] remembers the nearest wall point found so far (its
//! origin) and the squared distance to it. Crossing a coupling moves the
//! origin into the frame of the receiving face: relative to the sending
//! face centre on the way out, rotated if needed, and re-anchored on the
//! receiving face centre on the way in.

use crate::algs::communicator::Communicator;
use crate::algs::wave::{MeshWave, WaveConfig, WaveInfo};
use crate::data::scalar_range::ScalarRange;
use crate::mesh_error::MeshWaveError;
use crate::topology::patch::BoundaryPatch;
use crate::topology::poly_mesh::PolyMesh;
use crate::topology::rotation::{Rotation, Vector};
use serde::{Deserialize, Serialize};

const SMALL: f64 = 1e-15;

#[inline]
fn dist_sqr(a: &Vector, b: &Vector) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Cell and face centres, indexed like the mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    pub cell_centres: Vec<Vector>,
    pub face_centres: Vec<Vector>,
}

impl MeshGeometry {
    pub fn new(cell_centres: Vec<Vector>, face_centres: Vec<Vector>) -> Self {
        Self {
            cell_centres,
            face_centres,
        }
    }

    pub fn check<M: PolyMesh>(&self, mesh: &M) -> Result<(), MeshWaveError> {
        if self.cell_centres.len() != mesh.n_cells() {
            return Err(MeshWaveError::LengthMismatch {
                what: "cell centres",
                expected: mesh.n_cells(),
                found: self.cell_centres.len(),
            });
        }
        if self.face_centres.len() != mesh.n_faces() {
            return Err(MeshWaveError::LengthMismatch {
                what: "face centres",
                expected: mesh.n_faces(),
                found: self.face_centres.len(),
            });
        }
        Ok(())
    }
}

/// Nearest wall point and squared distance to it. The default value is
/// unreached.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallPoint {
    origin: Vector,
    dist_sqr: f64,
}

impl Default for WallPoint {
    fn default() -> Self {
        Self {
            origin: [f64::MAX; 3],
            dist_sqr: -1.0,
        }
    }
}

impl WallPoint {
    pub fn new(origin: Vector, dist_sqr: f64) -> Self {
        Self { origin, dist_sqr }
    }

    pub fn origin(&self) -> &Vector {
        &self.origin
    }

    pub fn dist_sqr(&self) -> f64 {
        self.dist_sqr
    }

    /// Distance to the nearest wall, if reached.
    pub fn distance(&self) -> Option<f64> {
        self.is_valid().then(|| self.dist_sqr.sqrt())
    }

    #[inline]
    fn is_valid(&self) -> bool {
        self.dist_sqr > -SMALL
    }

    /// Take `other`'s origin if it is closer to `pt` by more than the
    /// relative tolerance.
    fn update(&mut self, pt: &Vector, other: &WallPoint, tol: f64) -> bool {
        let d2 = dist_sqr(pt, &other.origin);
        if !self.is_valid() {
            self.dist_sqr = d2;
            self.origin = other.origin;
            return true;
        }
        let diff = self.dist_sqr - d2;
        if diff < 0.0 {
            return false;
        }
        if diff < SMALL || (self.dist_sqr > SMALL && diff / self.dist_sqr < tol) {
            return false;
        }
        self.dist_sqr = d2;
        self.origin = other.origin;
        true
    }
}

impl<'g> WaveInfo<&'g MeshGeometry> for WallPoint {
    fn valid(&self, _td: &&'g MeshGeometry) -> bool {
        self.is_valid()
    }

    fn same_geometry(&self, other: &Self, tol: f64, _td: &&'g MeshGeometry) -> bool {
        let diff = (self.dist_sqr - other.dist_sqr).abs();
        diff < SMALL || (self.dist_sqr > SMALL && diff / self.dist_sqr < tol)
    }

    fn leave_domain(&mut self, patch: &BoundaryPatch, patch_face: usize, td: &mut &'g MeshGeometry) {
        let c = &td.face_centres[patch.mesh_face(patch_face)];
        for (o, x) in self.origin.iter_mut().zip(c) {
            *o -= x;
        }
    }

    fn enter_domain(&mut self, patch: &BoundaryPatch, patch_face: usize, td: &mut &'g MeshGeometry) {
        let c = &td.face_centres[patch.mesh_face(patch_face)];
        for (o, x) in self.origin.iter_mut().zip(c) {
            *o += x;
        }
    }

    fn transform(&mut self, rotation: &Rotation, _td: &mut &'g MeshGeometry) {
        self.origin = rotation.apply(&self.origin);
    }

    fn update_cell(
        &mut self,
        cell: usize,
        _neighbour_face: usize,
        neighbour_info: &Self,
        tol: f64,
        td: &mut &'g MeshGeometry,
    ) -> bool {
        self.update(&td.cell_centres[cell], neighbour_info, tol)
    }

    fn update_face_from_cell(
        &mut self,
        face: usize,
        _neighbour_cell: usize,
        neighbour_info: &Self,
        tol: f64,
        td: &mut &'g MeshGeometry,
    ) -> bool {
        self.update(&td.face_centres[face], neighbour_info, tol)
    }

    fn update_face(
        &mut self,
        face: usize,
        neighbour_info: &Self,
        tol: f64,
        td: &mut &'g MeshGeometry,
    ) -> bool {
        self.update(&td.face_centres[face], neighbour_info, tol)
    }

    fn equal(&self, other: &Self, _td: &&'g MeshGeometry) -> bool {
        self == other
    }
}

/// Result of [`wall_distance`]. Unreached entries hold `f64::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct WallDistance {
    pub cell_distance: Vec<f64>,
    pub face_distance: Vec<f64>,
    pub iterations: usize,
    pub n_unvisited_cells: usize,
    pub n_unvisited_faces: usize,
}

/// Distance from every cell and face to the nearest face of `wall_patches`.
pub fn wall_distance<M, C>(
    mesh: &M,
    comm: &C,
    geometry: &MeshGeometry,
    wall_patches: &[usize],
    config: WaveConfig,
    max_iter: usize,
) -> Result<WallDistance, MeshWaveError>
where
    M: PolyMesh,
    C: Communicator,
{
    geometry.check(mesh)?;
    let patches = mesh.patches();
    let mut seed_faces = Vec::new();
    for &p in wall_patches {
        let patch = patches.get(p).ok_or(MeshWaveError::PatchOutOfRange {
            patch: p,
            n_patches: patches.len(),
        })?;
        seed_faces.extend(patch.faces.iter());
    }
    let seed_infos: Vec<WallPoint> = seed_faces
        .iter()
        .map(|&f| WallPoint::new(geometry.face_centres[f], 0.0))
        .collect();

    let mut td = geometry;
    let mut wave = MeshWave::new(mesh, comm, &seed_faces, &seed_infos, &mut td, config, 0)?;
    let iterations = wave.iterate(max_iter)?;
    if wave.n_unvisited_cells() > 0 {
        log::warn!(
            "[rank {}] wall distance: {} of {} cells not reached from any wall",
            comm.rank(),
            wave.n_unvisited_cells(),
            mesh.n_cells()
        );
    }

    let to_distance = |w: &WallPoint| w.distance().unwrap_or(f64::INFINITY);
    Ok(WallDistance {
        cell_distance: wave.all_cell_info().iter().map(to_distance).collect(),
        face_distance: wave.all_face_info().iter().map(to_distance).collect(),
        iterations,
        n_unvisited_cells: wave.n_unvisited_cells(),
        n_unvisited_faces: wave.n_unvisited_faces(),
    })
}

/// Cells whose distance lies in `range`, ascending.
pub fn cells_within(distances: &[f64], range: &ScalarRange) -> Vec<usize> {
    distances
        .iter()
        .enumerate()
        .filter(|(_, d)| range.contains(**d))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::NoComm;
    use crate::topology::patch::PatchKind;
    use crate::topology::poly_mesh::FaceMesh;

    /// Unit cells along x; face `c` of the interior sits at `x = c + 1`.
    fn bar(n: usize) -> (FaceMesh, MeshGeometry) {
        let mesh = FaceMesh::builder(n)
            .internal_faces((0..n - 1).map(|c| (c, c + 1)))
            .patch("left", [0], PatchKind::Ordinary)
            .patch("right", [n - 1], PatchKind::Ordinary)
            .build()
            .unwrap();
        let cells = (0..n).map(|c| [c as f64 + 0.5, 0.0, 0.0]).collect();
        let mut faces: Vec<Vector> = (0..n - 1).map(|c| [c as f64 + 1.0, 0.0, 0.0]).collect();
        faces.push([0.0, 0.0, 0.0]);
        faces.push([n as f64, 0.0, 0.0]);
        (mesh, MeshGeometry::new(cells, faces))
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn distance_from_one_wall() {
        let (mesh, geom) = bar(4);
        let d = wall_distance(&mesh, &NoComm, &geom, &[0], WaveConfig::default(), 100).unwrap();
        assert!(close(&d.cell_distance, &[0.5, 1.5, 2.5, 3.5]));
        assert!(close(&d.face_distance, &[1.0, 2.0, 3.0, 0.0, 4.0]));
        assert_eq!(d.n_unvisited_cells, 0);
    }

    #[test]
    fn nearest_of_two_walls() {
        let (mesh, geom) = bar(4);
        let d = wall_distance(&mesh, &NoComm, &geom, &[0, 1], WaveConfig::default(), 100).unwrap();
        assert!(close(&d.cell_distance, &[0.5, 1.5, 1.5, 0.5]));
    }

    #[test]
    fn no_walls_leaves_everything_unreached() {
        let (mesh, geom) = bar(3);
        let d = wall_distance(&mesh, &NoComm, &geom, &[], WaveConfig::default(), 100).unwrap();
        assert_eq!(d.n_unvisited_cells, 3);
        assert!(d.cell_distance.iter().all(|x| x.is_infinite()));
        assert_eq!(d.iterations, 0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let (mesh, mut geom) = bar(3);
        assert_eq!(
            wall_distance(&mesh, &NoComm, &geom, &[7], WaveConfig::default(), 10).unwrap_err(),
            MeshWaveError::PatchOutOfRange { patch: 7, n_patches: 2 }
        );
        geom.cell_centres.pop();
        assert!(matches!(
            wall_distance(&mesh, &NoComm, &geom, &[0], WaveConfig::default(), 10),
            Err(MeshWaveError::LengthMismatch { what: "cell centres", .. })
        ));
    }

    #[test]
    fn select_cells_by_distance() {
        let d = [0.5, 1.5, 2.5, 3.5];
        assert_eq!(cells_within(&d, &ScalarRange::between(1.0, 3.0)), vec![1, 2]);
        assert_eq!(cells_within(&d, &ScalarRange::GreaterEq(3.0)), vec![3]);
        assert!(cells_within(&d, &ScalarRange::None).is_empty());
    }

    #[test]
    fn coupling_reanchors_origin() {
        let mut td: &MeshGeometry = &MeshGeometry::new(vec![], vec![[1.0, 0.0, 0.0], [5.0, 0.0, 0.0]]);
        let a = BoundaryPatch::ordinary("a", 0, 1);
        let b = BoundaryPatch::ordinary("b", 1, 1);
        let mut w = WallPoint::new([0.0, 0.0, 0.0], 1.0);
        w.leave_domain(&a, 0, &mut td);
        w.transform(&Rotation::about_z(std::f64::consts::PI), &mut td);
        w.enter_domain(&b, 0, &mut td);
        assert!((w.origin()[0] - 6.0).abs() < 1e-12);
        assert!(w.origin()[1].abs() < 1e-12);
    }
}
