//! `FaceCellWave`: breadth-first propagation of [`WaveInfo`] over the cells
//! and faces of a (possibly partitioned) mesh.
//!
//! One iteration is two half-steps:
//!
//! 1. **face → cell**: every changed face offers its value to its owner and,
//!    for internal faces, its neighbour cell;
//! 2. **cell → face**: every changed cell offers its value to all of its
//!    faces, after which coupled faces (explicit connections, processor,
//!    cyclic and cyclic-AMI patches) exchange with their counterparts.
//!
//! Each half-step drains its input set and ends with a global sum of its
//! output set, so every rank takes the same decision to continue or stop.
//! Unreached entities are left invalid and counted, never reported as errors.

use super::config::{GEOM_TOL, WaveConfig};
use super::info::WaveInfo;
use super::links::FaceLinks;
use crate::algs::communicator::{Communicator, NoComm};
use crate::algs::exchange::{exchange_bytes, global_sum};
use crate::algs::wire::{WireKind, decode_tagged, encode_tagged};
use crate::data::changed_set::ChangedSet;
use crate::data::tagged::TaggedInfo;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshWaveError;
use crate::topology::patch::PatchKind;
use crate::topology::poly_mesh::{FaceMesh, PolyMesh, validate_mesh};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// The wave engine.
///
/// `S` is the storage of the per-face and per-cell values: borrowed slices
/// by default, or owned vectors (see [`MeshWave`](super::MeshWave)). The
/// engine mutates them in place; callers read results back through
/// [`all_face_info`](Self::all_face_info) / [`all_cell_info`](Self::all_cell_info)
/// or by reclaiming the storage.
pub struct FaceCellWave<'a, T, TD, M = FaceMesh, C = NoComm, S = &'a mut [T]>
where
    T: WaveInfo<TD>,
    M: PolyMesh,
    C: Communicator,
    S: AsRef<[T]> + AsMut<[T]>,
{
    mesh: &'a M,
    comm: &'a C,
    config: WaveConfig,
    face_info: S,
    cell_info: S,
    td: &'a mut TD,
    links: FaceLinks,
    changed_faces: ChangedSet,
    changed_cells: ChangedSet,
    has_cyclic_patches: bool,
    has_cyclic_ami_patches: bool,
    has_processor_patches: bool,
    n_evals: usize,
    n_unvisited_cells: usize,
    n_unvisited_faces: usize,
    // Local failure held back until the next reduction, so every rank
    // learns about it in the same collective.
    pending_error: Option<MeshWaveError>,
    _info: PhantomData<T>,
}

/// Added to a rank's contribution to signal failure; far above any count.
const FAILURE_FLAG: u64 = 1 << 48;

/// Run `update` on `slot` and keep the dirty set and unvisited counter in
/// step with its outcome.
fn tracked_update<T, TD>(
    index: usize,
    slot: &mut T,
    td: &mut TD,
    changed: &mut ChangedSet,
    n_unvisited: &mut usize,
    n_evals: &mut usize,
    update: impl FnOnce(&mut T, &mut TD) -> bool,
) -> bool
where
    T: WaveInfo<TD>,
{
    *n_evals += 1;
    let was_valid = slot.valid(td);
    let updated = update(slot, td);
    if updated {
        changed.mark(index);
    }
    if !was_valid && slot.valid(td) {
        *n_unvisited = n_unvisited.saturating_sub(1);
    }
    updated
}

impl<'a, T, TD, M, C, S> FaceCellWave<'a, T, TD, M, C, S>
where
    T: WaveInfo<TD>,
    M: PolyMesh,
    C: Communicator,
    S: AsRef<[T]> + AsMut<[T]>,
{
    /// Bind storage to a mesh. Nothing is seeded or propagated.
    ///
    /// `face_info` and `cell_info` must hold one value per face and cell;
    /// their current contents are kept (invalid values count as unvisited).
    pub fn new(
        mesh: &'a M,
        comm: &'a C,
        face_info: S,
        cell_info: S,
        td: &'a mut TD,
        config: WaveConfig,
    ) -> Result<Self, MeshWaveError> {
        config.validate()?;
        validate_mesh(mesh)?;
        let n_faces = mesh.n_faces();
        let n_cells = mesh.n_cells();
        if face_info.as_ref().len() != n_faces {
            return Err(MeshWaveError::LengthMismatch {
                what: "face info",
                expected: n_faces,
                found: face_info.as_ref().len(),
            });
        }
        if cell_info.as_ref().len() != n_cells {
            return Err(MeshWaveError::LengthMismatch {
                what: "cell info",
                expected: n_cells,
                found: cell_info.as_ref().len(),
            });
        }

        let mut has_cyclic_patches = false;
        let mut has_cyclic_ami_patches = false;
        let mut has_processor_patches = false;
        for patch in mesh.patches() {
            match patch.kind {
                PatchKind::Ordinary => {}
                PatchKind::Cyclic { .. } => has_cyclic_patches = true,
                PatchKind::CyclicAmi { .. } => has_cyclic_ami_patches = true,
                PatchKind::Processor { neighbour_rank } => {
                    has_processor_patches = true;
                    if neighbour_rank == comm.rank() {
                        return Err(MeshWaveError::SelfProcessorPatch {
                            patch: patch.name.clone(),
                            rank: neighbour_rank,
                        });
                    }
                    if comm.is_parallel() && neighbour_rank >= comm.size() {
                        return Err(MeshWaveError::CommError {
                            neighbor: neighbour_rank,
                            detail: format!(
                                "processor patch `{}` faces a rank outside a communicator of size {}",
                                patch.name,
                                comm.size()
                            ),
                        });
                    }
                }
            }
        }

        let (n_unvisited_faces, n_unvisited_cells) = {
            let td = &*td;
            (
                face_info.as_ref().iter().filter(|f| !f.valid(td)).count(),
                cell_info.as_ref().iter().filter(|c| !c.valid(td)).count(),
            )
        };

        log::debug!(
            "[rank {}] FaceCellWave over {n_cells} cells, {n_faces} faces (cyclic: {has_cyclic_patches}, AMI: {has_cyclic_ami_patches}, processor: {has_processor_patches})",
            comm.rank()
        );

        Ok(Self {
            mesh,
            comm,
            config,
            face_info,
            cell_info,
            td,
            links: FaceLinks::default(),
            changed_faces: ChangedSet::with_capacity(n_faces),
            changed_cells: ChangedSet::with_capacity(n_cells),
            has_cyclic_patches,
            has_cyclic_ami_patches,
            has_processor_patches,
            n_evals: 0,
            n_unvisited_cells,
            n_unvisited_faces,
            pending_error: None,
            _info: PhantomData,
        })
    }

    /// Bind storage, seed `seed_faces` and iterate.
    ///
    /// `max_iter`: `None` binds only (no seeding, no iteration); `Some(0)`
    /// seeds without iterating; `Some(n)` seeds then runs up to `n`
    /// iterations.
    #[allow(clippy::too_many_arguments)]
    pub fn with_seed(
        mesh: &'a M,
        comm: &'a C,
        seed_faces: &[usize],
        seed_infos: &[T],
        face_info: S,
        cell_info: S,
        td: &'a mut TD,
        config: WaveConfig,
        max_iter: Option<usize>,
    ) -> Result<Self, MeshWaveError> {
        Self::with_connections(
            mesh,
            comm,
            &[],
            seed_faces,
            seed_infos,
            face_info,
            cell_info,
            td,
            config,
            max_iter,
        )
    }

    /// As [`with_seed`](Self::with_seed), additionally treating every pair
    /// in `explicit_connections` as two faces that exchange information
    /// directly (baffles).
    #[allow(clippy::too_many_arguments)]
    pub fn with_connections(
        mesh: &'a M,
        comm: &'a C,
        explicit_connections: &[(usize, usize)],
        seed_faces: &[usize],
        seed_infos: &[T],
        face_info: S,
        cell_info: S,
        td: &'a mut TD,
        config: WaveConfig,
        max_iter: Option<usize>,
    ) -> Result<Self, MeshWaveError> {
        let mut wave = Self::new(mesh, comm, face_info, cell_info, td, config)?;
        wave.links = FaceLinks::new(mesh.n_faces(), explicit_connections)?;
        if seed_faces.len() != seed_infos.len() {
            return Err(MeshWaveError::LengthMismatch {
                what: "seed infos",
                expected: seed_faces.len(),
                found: seed_infos.len(),
            });
        }
        if let Some(max_iter) = max_iter {
            wave.set_face_infos(seed_faces, seed_infos)?;
            if max_iter > 0 {
                wave.iterate(max_iter)?;
            }
        }
        Ok(wave)
    }

    // ----- seeding -----------------------------------------------------

    /// Seed one face. Faces that already hold valid information are left
    /// alone (first writer wins); returns whether the seed was taken.
    pub fn set_face_info(&mut self, face: usize, info: &T) -> Result<bool, MeshWaveError> {
        let n_faces = self.mesh.n_faces();
        if face >= n_faces {
            return Err(MeshWaveError::FaceOutOfRange { face, n_faces });
        }
        let td = &mut *self.td;
        let slot = &mut self.face_info.as_mut()[face];
        if slot.valid(td) {
            return Ok(false);
        }
        *slot = info.clone();
        if slot.valid(td) {
            self.n_unvisited_faces = self.n_unvisited_faces.saturating_sub(1);
        }
        self.changed_faces.mark(face);
        Ok(true)
    }

    /// Seed a batch of faces; indices are checked before anything is
    /// written. Returns how many seeds were taken.
    pub fn set_face_infos(&mut self, faces: &[usize], infos: &[T]) -> Result<usize, MeshWaveError> {
        if faces.len() != infos.len() {
            return Err(MeshWaveError::LengthMismatch {
                what: "seed infos",
                expected: faces.len(),
                found: infos.len(),
            });
        }
        let n_faces = self.mesh.n_faces();
        if let Some(&face) = faces.iter().find(|&&f| f >= n_faces) {
            return Err(MeshWaveError::FaceOutOfRange { face, n_faces });
        }
        let mut taken = 0;
        for (&face, info) in faces.iter().zip(infos) {
            if self.set_face_info(face, info)? {
                taken += 1;
            }
        }
        Ok(taken)
    }

    /// Mark every cell that already holds valid information as changed, so
    /// the next iteration pushes it to its faces.
    pub fn mark_valid_cells_changed(&mut self) -> usize {
        let td = &*self.td;
        let mut n = 0;
        for (cell, info) in self.cell_info.as_ref().iter().enumerate() {
            if info.valid(td) && self.changed_cells.mark(cell) {
                n += 1;
            }
        }
        n
    }

    // ----- half-steps --------------------------------------------------

    /// Propagate every changed face to its adjacent cells. Returns the
    /// global number of changed cells.
    pub fn face_to_cell(&mut self) -> Result<usize, MeshWaveError> {
        let mesh = self.mesh;
        let owner = mesh.face_owner();
        let neighbour = mesh.face_neighbour();
        let n_internal = mesh.n_internal_faces();
        let tol = self.config.propagation_tol;

        let faces = self.changed_faces.drain();
        let face_info = self.face_info.as_ref();
        let cell_info = self.cell_info.as_mut();
        let td = &mut *self.td;
        for &face in &faces {
            let info = &face_info[face];
            let nbr = (face < n_internal).then(|| neighbour[face]);
            for cell in std::iter::once(owner[face]).chain(nbr) {
                let slot = &mut cell_info[cell];
                if slot.equal(info, td) {
                    continue;
                }
                tracked_update(
                    cell,
                    slot,
                    td,
                    &mut self.changed_cells,
                    &mut self.n_unvisited_cells,
                    &mut self.n_evals,
                    |s, td| s.update_cell(cell, face, info, tol, td),
                );
            }
        }

        let local = self.changed_cells.len();
        log::trace!(
            "[rank {}] face_to_cell: {} faces -> {} changed cells",
            self.comm.rank(),
            faces.len(),
            local
        );
        self.reduce_changed(local)
    }

    /// Propagate every changed cell to its faces, then exchange across
    /// coupled faces. Returns the global number of changed faces.
    pub fn cell_to_face(&mut self) -> Result<usize, MeshWaveError> {
        let mesh = self.mesh;
        let tol = self.config.propagation_tol;

        let cells = self.changed_cells.drain();
        {
            let cell_info = self.cell_info.as_ref();
            let face_info = self.face_info.as_mut();
            let td = &mut *self.td;
            for &cell in &cells {
                let info = &cell_info[cell];
                for &face in mesh.cell_faces(cell) {
                    let slot = &mut face_info[face];
                    if slot.equal(info, td) {
                        continue;
                    }
                    tracked_update(
                        face,
                        slot,
                        td,
                        &mut self.changed_faces,
                        &mut self.n_unvisited_faces,
                        &mut self.n_evals,
                        |s, td| s.update_face_from_cell(face, cell, info, tol, td),
                    );
                }
            }
        }

        self.exchange_coupled_faces();

        let local = self.changed_faces.len();
        log::trace!(
            "[rank {}] cell_to_face: {} cells -> {} changed faces",
            self.comm.rank(),
            cells.len(),
            local
        );
        self.reduce_changed(local)
    }

    /// Run up to `max_iter` face→cell / cell→face iterations and return how
    /// many ran to completion with changes on both halves.
    ///
    /// Faces that are already dirty are first pushed across couplings and
    /// into their cells; that opening half-step is not counted. A call on a
    /// converged wave returns 0, as does `max_iter == 0`.
    pub fn iterate(&mut self, max_iter: usize) -> Result<usize, MeshWaveError> {
        if max_iter == 0 {
            return Ok(0);
        }
        self.exchange_coupled_faces();
        let mut n_cells = self.face_to_cell()?;

        let mut iter = 0;
        while iter < max_iter && n_cells > 0 {
            let n_faces = self.cell_to_face()?;
            if n_faces == 0 {
                break;
            }
            n_cells = self.face_to_cell()?;
            if n_cells == 0 {
                break;
            }
            iter += 1;
            log::debug!(
                "[rank {}] wave iteration {iter}: {n_faces} changed faces, {n_cells} changed cells",
                self.comm.rank()
            );
        }

        log::debug!(
            "[rank {}] wave stopped after {iter} iterations: {} evaluations, {} unvisited cells, {} unvisited faces",
            self.comm.rank(),
            self.n_evals,
            self.n_unvisited_cells,
            self.n_unvisited_faces
        );
        Ok(iter)
    }

    /// Global sum of a changed-entity count. A failure recorded on any rank
    /// since the last reduction makes every rank return an error: the
    /// failing rank its own, the others [`MeshWaveError::PeerFailure`].
    fn reduce_changed(&mut self, local: usize) -> Result<usize, MeshWaveError> {
        let flag = if self.pending_error.is_some() { FAILURE_FLAG } else { 0 };
        let total = global_sum(self.comm, self.config.reduce_tag(), local as u64 + flag)?;
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        if total >= FAILURE_FLAG {
            return Err(MeshWaveError::PeerFailure {
                failed_ranks: (total / FAILURE_FLAG) as usize,
            });
        }
        Ok(total as usize)
    }

    // ----- couplings ---------------------------------------------------

    fn exchange_coupled_faces(&mut self) {
        self.handle_explicit_connections();
        if self.has_processor_patches && self.comm.is_parallel() {
            if let Err(err) = self.handle_proc_patches() {
                log::error!("[rank {}] processor exchange failed: {err}", self.comm.rank());
                self.pending_error.get_or_insert(err);
            }
        }
        if self.has_cyclic_patches {
            self.handle_cyclic_patches();
        }
        if self.has_cyclic_ami_patches && self.config.handle_cyclic_ami {
            self.handle_ami_cyclic_patches();
        }
    }

    /// Merge incoming values into their mesh faces (`id` is the mesh face).
    /// Values equal to the current one are skipped. Returns how many faces
    /// changed.
    fn merge_face_info(&mut self, incoming: Vec<TaggedInfo<T>>) -> usize {
        let tol = self.config.propagation_tol;
        let face_info = self.face_info.as_mut();
        let td = &mut *self.td;
        let mut n_changed = 0;
        for TaggedInfo { id: face, info } in incoming {
            let slot = &mut face_info[face];
            if slot.equal(&info, td) {
                continue;
            }
            let updated = tracked_update(
                face,
                slot,
                td,
                &mut self.changed_faces,
                &mut self.n_unvisited_faces,
                &mut self.n_evals,
                |s, td| s.update_face(face, &info, tol, td),
            );
            if updated {
                n_changed += 1;
            }
        }
        n_changed
    }

    /// Changed faces of patch `patch_index` with their current values,
    /// tagged with patch-local face numbers.
    fn changed_patch_faces(&self, patch_index: usize) -> Vec<TaggedInfo<T>> {
        let patch = &self.mesh.patches()[patch_index];
        let face_info = self.face_info.as_ref();
        (0..patch.size())
            .filter_map(|i| {
                let face = patch.mesh_face(i);
                self.changed_faces
                    .contains(face)
                    .then(|| TaggedInfo::new(i, face_info[face].clone()))
            })
            .collect()
    }

    fn handle_explicit_connections(&mut self) {
        if self.links.is_empty() {
            return;
        }
        let face_info = self.face_info.as_ref();
        let links = &self.links;
        let transfers: Vec<TaggedInfo<T>> = self
            .changed_faces
            .as_slice()
            .iter()
            .flat_map(|&face| {
                links
                    .linked(face)
                    .iter()
                    .map(move |&other| TaggedInfo::new(other, face_info[face].clone()))
            })
            .collect();
        let n_sent = transfers.len();
        let n_changed = self.merge_face_info(transfers);
        log::trace!("explicit connections: {n_sent} transfers, {n_changed} faces changed");
    }

    /// Send changed processor-patch faces to the neighbouring ranks and
    /// merge what they sent. Collective over every rank; nothing is merged
    /// if any frame is bad.
    fn handle_proc_patches(&mut self) -> Result<(), MeshWaveError> {
        let mesh = self.mesh;
        let patches = mesh.patches();

        let mut outgoing: BTreeMap<usize, Vec<u8>> = BTreeMap::new();
        let mut encode_err = None;
        for (idx, patch) in patches.iter().enumerate() {
            let PatchKind::Processor { neighbour_rank } = &patch.kind else {
                continue;
            };
            let mut records = self.changed_patch_faces(idx);
            let td = &mut *self.td;
            for rec in &mut records {
                rec.info.leave_domain(patch, rec.id, td);
            }
            // An empty frame still goes out so the peer is not left waiting.
            let frame = encode_tagged(WireKind::PatchFaces, &records).unwrap_or_else(|err| {
                encode_err.get_or_insert(err);
                Vec::new()
            });
            outgoing.insert(*neighbour_rank, frame);
        }

        let incoming = exchange_bytes(&outgoing, self.comm, self.config.patch_tag())?;
        if let Some(err) = encode_err {
            return Err(err);
        }

        let mut received = Vec::new();
        for patch in patches {
            let PatchKind::Processor { neighbour_rank } = &patch.kind else {
                continue;
            };
            let nbr = *neighbour_rank;
            let bytes = incoming.get(&nbr).ok_or_else(|| MeshWaveError::CommError {
                neighbor: nbr,
                detail: format!("no data for processor patch `{}`", patch.name),
            })?;
            let records: Vec<TaggedInfo<T>> = decode_tagged(nbr, WireKind::PatchFaces, bytes)?;
            let td = &mut *self.td;
            for TaggedInfo { id, mut info } in records {
                if id >= patch.size() {
                    return Err(MeshWaveError::WireDecode {
                        neighbor: nbr,
                        reason: format!(
                            "face {id} outside processor patch `{}` of {} faces",
                            patch.name,
                            patch.size()
                        ),
                    });
                }
                info.enter_domain(patch, id, td);
                received.push(TaggedInfo::new(patch.mesh_face(id), info));
            }
        }
        let n_received = received.len();
        let n_changed = self.merge_face_info(received);
        log::trace!(
            "[rank {}] processor patches: received {n_received}, {n_changed} faces changed",
            self.comm.rank()
        );
        Ok(())
    }

    /// Transfer changed faces across every cyclic pair. All transfers are
    /// gathered before any is merged, so a value never echoes back within
    /// the same call.
    fn handle_cyclic_patches(&mut self) {
        let mesh = self.mesh;
        let patches = mesh.patches();
        let mut incoming = Vec::new();
        for patch in patches {
            let PatchKind::Cyclic {
                neighbour_patch,
                rotation,
            } = &patch.kind
            else {
                continue;
            };
            let nbr = &patches[*neighbour_patch];
            let records = self.changed_patch_faces(*neighbour_patch);
            let td = &mut *self.td;
            for TaggedInfo { id, mut info } in records {
                info.leave_domain(nbr, id, td);
                if let Some(rotation) = rotation {
                    info.transform(rotation, td);
                }
                info.enter_domain(patch, id, td);
                incoming.push(TaggedInfo::new(patch.mesh_face(id), info));
            }
        }
        let n_changed = self.merge_face_info(incoming);
        log::trace!("cyclic patches: {n_changed} faces changed");
    }

    /// Interpolate neighbour values onto every cyclic-AMI face. Each face
    /// folds its valid, positively weighted sources with
    /// [`WaveInfo::update_face`], starting from a copy of the first.
    fn handle_ami_cyclic_patches(&mut self) {
        let mesh = self.mesh;
        let patches = mesh.patches();
        let tol = self.config.propagation_tol;
        let mut incoming = Vec::new();
        for patch in patches {
            let PatchKind::CyclicAmi {
                neighbour_patch,
                addressing,
                rotation,
            } = &patch.kind
            else {
                continue;
            };
            let nbr = &patches[*neighbour_patch];
            let face_info = self.face_info.as_ref();
            let td = &mut *self.td;

            let mut sent: Vec<T> = (0..nbr.size())
                .map(|i| face_info[nbr.mesh_face(i)].clone())
                .collect();
            for (i, info) in sent.iter_mut().enumerate() {
                info.leave_domain(nbr, i, td);
            }

            for i in 0..patch.size() {
                let face = patch.mesh_face(i);
                let mut combined: Option<T> = None;
                for &(src, weight) in addressing.sources_of(i) {
                    if weight <= 0.0 {
                        continue;
                    }
                    let Some(value) = sent.get(src) else {
                        continue;
                    };
                    if !value.valid(td) {
                        continue;
                    }
                    if let Some(acc) = combined.as_mut() {
                        acc.update_face(face, value, tol, td);
                    } else {
                        combined = Some(value.clone());
                    }
                }
                if let Some(mut info) = combined {
                    if let Some(rotation) = rotation {
                        info.transform(rotation, td);
                    }
                    info.enter_domain(patch, i, td);
                    incoming.push(TaggedInfo::new(face, info));
                }
            }
        }
        let n_changed = self.merge_face_info(incoming);
        log::trace!("cyclic AMI patches: {n_changed} faces changed");
    }

    // ----- checks ------------------------------------------------------

    /// Check that both sides of cyclic patch `patch_index` agree: equally
    /// valid, and geometrically the same within [`GEOM_TOL`] once the
    /// neighbour's value is mapped across. Meaningful after convergence.
    pub fn check_cyclic(&mut self, patch_index: usize) -> Result<(), MeshWaveError> {
        let mesh = self.mesh;
        let patches = mesh.patches();
        let patch = patches.get(patch_index).ok_or_else(|| {
            MeshWaveError::InvariantViolation(format!("no patch {patch_index}"))
        })?;
        let PatchKind::Cyclic {
            neighbour_patch,
            rotation,
        } = &patch.kind
        else {
            return Err(MeshWaveError::InvariantViolation(format!(
                "patch `{}` is not cyclic",
                patch.name
            )));
        };
        let nbr = &patches[*neighbour_patch];
        let face_info = self.face_info.as_ref();
        let td = &mut *self.td;
        for i in 0..patch.size() {
            let mine = &face_info[patch.mesh_face(i)];
            let theirs = &face_info[nbr.mesh_face(i)];
            let (a, b) = (mine.valid(td), theirs.valid(td));
            if a != b {
                return Err(MeshWaveError::InvariantViolation(format!(
                    "cyclic `{}` face {i}: valid on one side only",
                    patch.name
                )));
            }
            if !a {
                continue;
            }
            let mut mapped = theirs.clone();
            mapped.leave_domain(nbr, i, td);
            if let Some(rotation) = rotation {
                mapped.transform(rotation, td);
            }
            mapped.enter_domain(patch, i, td);
            if !mine.same_geometry(&mapped, GEOM_TOL, td) {
                return Err(MeshWaveError::InvariantViolation(format!(
                    "cyclic `{}` face {i}: values differ from `{}`",
                    patch.name, nbr.name
                )));
            }
        }
        Ok(())
    }

    // ----- accessors ---------------------------------------------------

    pub fn mesh(&self) -> &'a M {
        self.mesh
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn all_face_info(&self) -> &[T] {
        self.face_info.as_ref()
    }

    pub fn all_cell_info(&self) -> &[T] {
        self.cell_info.as_ref()
    }

    /// Tracking data shared with the payload callbacks.
    pub fn data(&self) -> &TD {
        &*self.td
    }

    /// Explicit connections as given at construction.
    pub fn explicit_connections(&self) -> &[(usize, usize)] {
        self.links.pairs()
    }

    /// Faces currently waiting to be propagated.
    pub fn changed_faces(&self) -> &[usize] {
        self.changed_faces.as_slice()
    }

    /// Cells currently waiting to be propagated.
    pub fn changed_cells(&self) -> &[usize] {
        self.changed_cells.as_slice()
    }

    /// Payload update calls made so far.
    pub fn n_evals(&self) -> usize {
        self.n_evals
    }

    pub fn n_unvisited_cells(&self) -> usize {
        self.n_unvisited_cells
    }

    pub fn n_unvisited_faces(&self) -> usize {
        self.n_unvisited_faces
    }

    /// Give the storage back: `(face_info, cell_info)`.
    pub fn into_storage(self) -> (S, S) {
        (self.face_info, self.cell_info)
    }
}

impl<'a, T, TD, M, C, S> DebugInvariants for FaceCellWave<'a, T, TD, M, C, S>
where
    T: WaveInfo<TD>,
    M: PolyMesh,
    C: Communicator,
    S: AsRef<[T]> + AsMut<[T]>,
{
    fn validate_invariants(&self) -> Result<(), MeshWaveError> {
        self.changed_faces.validate_invariants()?;
        self.changed_cells.validate_invariants()?;
        if self.changed_faces.capacity() != self.mesh.n_faces()
            || self.changed_cells.capacity() != self.mesh.n_cells()
        {
            return Err(MeshWaveError::InvariantViolation(
                "changed sets sized for a different mesh".into(),
            ));
        }
        let td = &*self.td;
        let faces = self.face_info.as_ref().iter().filter(|f| !f.valid(td)).count();
        let cells = self.cell_info.as_ref().iter().filter(|c| !c.valid(td)).count();
        if faces != self.n_unvisited_faces || cells != self.n_unvisited_cells {
            return Err(MeshWaveError::InvariantViolation(format!(
                "unvisited counters ({} faces, {} cells) disagree with storage ({faces}, {cells})",
                self.n_unvisited_faces, self.n_unvisited_cells
            )));
        }
        Ok(())
    }
}
