//! `MeshWave`: a [`FaceCellWave`] that owns its face and cell storage.

use super::config::WaveConfig;
use super::face_cell_wave::FaceCellWave;
use super::info::WaveInfo;
use crate::algs::communicator::{Communicator, NoComm};
use crate::mesh_error::MeshWaveError;
use crate::topology::poly_mesh::{FaceMesh, PolyMesh};

/// Allocates one `T::default()` (expected to be invalid) per face and per
/// cell, seeds, and runs the wave at construction.
pub struct MeshWave<'a, T, TD, M = FaceMesh, C = NoComm>
where
    T: WaveInfo<TD> + Default,
    M: PolyMesh,
    C: Communicator,
{
    wave: FaceCellWave<'a, T, TD, M, C, Vec<T>>,
}

impl<'a, T, TD, M, C> MeshWave<'a, T, TD, M, C>
where
    T: WaveInfo<TD> + Default,
    M: PolyMesh,
    C: Communicator,
{
    /// Seed `seed_faces` and run up to `max_iter` iterations.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mesh: &'a M,
        comm: &'a C,
        seed_faces: &[usize],
        seed_infos: &[T],
        td: &'a mut TD,
        config: WaveConfig,
        max_iter: usize,
    ) -> Result<Self, MeshWaveError> {
        Self::with_connections(mesh, comm, &[], seed_faces, seed_infos, td, config, max_iter)
    }

    /// As [`new`](Self::new) with explicit face-to-face connections.
    #[allow(clippy::too_many_arguments)]
    pub fn with_connections(
        mesh: &'a M,
        comm: &'a C,
        explicit_connections: &[(usize, usize)],
        seed_faces: &[usize],
        seed_infos: &[T],
        td: &'a mut TD,
        config: WaveConfig,
        max_iter: usize,
    ) -> Result<Self, MeshWaveError> {
        let wave = FaceCellWave::with_connections(
            mesh,
            comm,
            explicit_connections,
            seed_faces,
            seed_infos,
            vec![T::default(); mesh.n_faces()],
            vec![T::default(); mesh.n_cells()],
            td,
            config,
            Some(max_iter),
        )?;
        Ok(Self { wave })
    }

    /// Warm start from existing cell values: every valid entry of
    /// `all_cell_info` is propagated alongside the seeds.
    #[allow(clippy::too_many_arguments)]
    pub fn with_cell_info(
        mesh: &'a M,
        comm: &'a C,
        seed_faces: &[usize],
        seed_infos: &[T],
        all_cell_info: Vec<T>,
        td: &'a mut TD,
        config: WaveConfig,
        max_iter: usize,
    ) -> Result<Self, MeshWaveError> {
        let mut wave = FaceCellWave::new(
            mesh,
            comm,
            vec![T::default(); mesh.n_faces()],
            all_cell_info,
            td,
            config,
        )?;
        wave.set_face_infos(seed_faces, seed_infos)?;
        let warm = wave.mark_valid_cells_changed();
        log::debug!("MeshWave warm start from {warm} valid cells");
        wave.iterate(max_iter)?;
        Ok(Self { wave })
    }

    /// Continue propagating; see [`FaceCellWave::iterate`].
    pub fn iterate(&mut self, max_iter: usize) -> Result<usize, MeshWaveError> {
        self.wave.iterate(max_iter)
    }

    pub fn all_face_info(&self) -> &[T] {
        self.wave.all_face_info()
    }

    pub fn all_cell_info(&self) -> &[T] {
        self.wave.all_cell_info()
    }

    pub fn n_unvisited_cells(&self) -> usize {
        self.wave.n_unvisited_cells()
    }

    pub fn n_unvisited_faces(&self) -> usize {
        self.wave.n_unvisited_faces()
    }

    pub fn n_evals(&self) -> usize {
        self.wave.n_evals()
    }

    pub fn data(&self) -> &TD {
        self.wave.data()
    }

    pub fn wave(&self) -> &FaceCellWave<'a, T, TD, M, C, Vec<T>> {
        &self.wave
    }

    pub fn wave_mut(&mut self) -> &mut FaceCellWave<'a, T, TD, M, C, Vec<T>> {
        &mut self.wave
    }

    /// `(face_info, cell_info)`.
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        self.wave.into_storage()
    }
}
