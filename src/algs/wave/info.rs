//! The payload contract flooded across the mesh by the wave engine.

use crate::topology::patch::BoundaryPatch;
use crate::topology::rotation::Rotation;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Information carried by cells and faces during a wave.
///
/// `TD` is caller-defined tracking data threaded through every callback
/// (geometry, per-algorithm state); the engine never looks inside it.
///
/// The `update_*` methods merge a neighbour's information into `self` and
/// return `true` only if `self` changed by more than `tol` as judged by the
/// payload. The engine marks an entity dirty exactly when they return `true`,
/// so termination relies on updates being monotone improvements.
///
/// Values crossing a processor boundary are serialised, hence the serde
/// bounds.
pub trait WaveInfo<TD>: Clone + Serialize + DeserializeOwned {
    /// Has information reached this slot?
    fn valid(&self, td: &TD) -> bool;

    /// Geometric agreement of two values within `tol`; used by consistency
    /// checks on coupled faces.
    fn same_geometry(&self, other: &Self, _tol: f64, td: &TD) -> bool {
        self.equal(other, td)
    }

    /// Convert to the frame of the coupling before leaving through
    /// `patch_face` of `patch`.
    fn leave_domain(&mut self, _patch: &BoundaryPatch, _patch_face: usize, _td: &mut TD) {}

    /// Convert back to mesh coordinates after entering through
    /// `patch_face` of `patch`.
    fn enter_domain(&mut self, _patch: &BoundaryPatch, _patch_face: usize, _td: &mut TD) {}

    /// Apply the rotation of a transformed coupling.
    fn transform(&mut self, rotation: &Rotation, td: &mut TD);

    /// Merge information from `neighbour_face` into cell `cell`.
    fn update_cell(
        &mut self,
        cell: usize,
        neighbour_face: usize,
        neighbour_info: &Self,
        tol: f64,
        td: &mut TD,
    ) -> bool;

    /// Merge information from `neighbour_cell` into face `face`.
    fn update_face_from_cell(
        &mut self,
        face: usize,
        neighbour_cell: usize,
        neighbour_info: &Self,
        tol: f64,
        td: &mut TD,
    ) -> bool;

    /// Merge information arriving for the same face (coupled counterpart,
    /// explicit connection, or AMI combination).
    fn update_face(&mut self, face: usize, neighbour_info: &Self, tol: f64, td: &mut TD) -> bool;

    /// Exact equality as far as propagation is concerned.
    fn equal(&self, other: &Self, td: &TD) -> bool;
}
