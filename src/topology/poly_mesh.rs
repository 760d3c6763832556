//! Face-addressed polyhedral mesh topology.
//!
//! Faces `0..n_internal_faces` are internal and have both an owner and a
//! neighbour cell; the remaining faces are boundary faces with an owner only,
//! partitioned into [`BoundaryPatch`]es that tile the boundary range in order.
//!
//! [`PolyMesh`] is the read-only accessor the wave engine consumes;
//! [`FaceMesh`] is the in-memory implementation, assembled through
//! [`FaceMeshBuilder`] which validates every index before handing out a mesh.

use crate::mesh_error::MeshWaveError;
use crate::topology::patch::{BoundaryPatch, PatchKind};
use hashbrown::HashMap;
use itertools::Itertools;

/// Read-only topology accessor.
pub trait PolyMesh {
    fn n_cells(&self) -> usize;
    fn n_faces(&self) -> usize;
    fn n_internal_faces(&self) -> usize;
    /// Owner cell of every face.
    fn face_owner(&self) -> &[usize];
    /// Neighbour cell of every internal face.
    fn face_neighbour(&self) -> &[usize];
    /// Faces of `cell`, ascending.
    fn cell_faces(&self, cell: usize) -> &[usize];
    fn patches(&self) -> &[BoundaryPatch];

    #[inline]
    fn is_internal_face(&self, face: usize) -> bool {
        face < self.n_internal_faces()
    }

    /// Index of the patch holding boundary face `face`.
    fn which_patch(&self, face: usize) -> Option<usize> {
        if self.is_internal_face(face) || face >= self.n_faces() {
            return None;
        }
        let patches = self.patches();
        let idx = patches.partition_point(|p| p.faces.end_value() <= face);
        (idx < patches.len() && patches[idx].faces.contains(face)).then_some(idx)
    }
}

/// In-memory face-addressed mesh with precomputed cell→face addressing.
#[derive(Clone, Debug)]
pub struct FaceMesh {
    n_cells: usize,
    owner: Vec<usize>,
    neighbour: Vec<usize>,
    patches: Vec<BoundaryPatch>,
    // CSR: faces of cell c are cell_face_list[cell_face_offsets[c]..cell_face_offsets[c + 1]]
    cell_face_offsets: Vec<usize>,
    cell_face_list: Vec<usize>,
}

impl FaceMesh {
    /// Build and validate a mesh. `neighbour.len()` is the number of
    /// internal faces.
    pub fn new(
        n_cells: usize,
        owner: Vec<usize>,
        neighbour: Vec<usize>,
        patches: Vec<BoundaryPatch>,
    ) -> Result<Self, MeshWaveError> {
        validate_faces(n_cells, &owner, &neighbour)?;
        validate_patches(owner.len(), neighbour.len(), &patches)?;

        let mut counts = vec![0usize; n_cells + 1];
        for &c in owner.iter().chain(neighbour.iter()) {
            counts[c + 1] += 1;
        }
        for c in 0..n_cells {
            counts[c + 1] += counts[c];
        }
        let offsets = counts;
        let mut cursor = offsets.clone();
        let mut list = vec![0usize; owner.len() + neighbour.len()];
        // Visiting faces in order keeps each cell's face list sorted.
        for f in 0..owner.len() {
            let o = owner[f];
            list[cursor[o]] = f;
            cursor[o] += 1;
            if let Some(&n) = neighbour.get(f) {
                list[cursor[n]] = f;
                cursor[n] += 1;
            }
        }

        log::debug!(
            "FaceMesh: {} cells, {} faces ({} internal), {} patches",
            n_cells,
            owner.len(),
            neighbour.len(),
            patches.len()
        );

        Ok(Self {
            n_cells,
            owner,
            neighbour,
            patches,
            cell_face_offsets: offsets,
            cell_face_list: list,
        })
    }

    pub fn builder(n_cells: usize) -> FaceMeshBuilder {
        FaceMeshBuilder::new(n_cells)
    }

    /// Patch by name.
    pub fn find_patch(&self, name: &str) -> Option<usize> {
        self.patches.iter().position(|p| p.name == name)
    }
}

impl PolyMesh for FaceMesh {
    #[inline]
    fn n_cells(&self) -> usize {
        self.n_cells
    }
    #[inline]
    fn n_faces(&self) -> usize {
        self.owner.len()
    }
    #[inline]
    fn n_internal_faces(&self) -> usize {
        self.neighbour.len()
    }
    #[inline]
    fn face_owner(&self) -> &[usize] {
        &self.owner
    }
    #[inline]
    fn face_neighbour(&self) -> &[usize] {
        &self.neighbour
    }
    #[inline]
    fn cell_faces(&self, cell: usize) -> &[usize] {
        &self.cell_face_list[self.cell_face_offsets[cell]..self.cell_face_offsets[cell + 1]]
    }
    #[inline]
    fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }
}

/// Check the addressing of any [`PolyMesh`]: owner and neighbour lists match
/// the face counts, every index is in range, patches tile the boundary, and
/// coupled patches are paired consistently.
pub fn validate_mesh<M: PolyMesh + ?Sized>(mesh: &M) -> Result<(), MeshWaveError> {
    let n_faces = mesh.n_faces();
    let n_internal = mesh.n_internal_faces();
    let owner = mesh.face_owner();
    let neighbour = mesh.face_neighbour();
    if owner.len() != n_faces {
        return Err(MeshWaveError::LengthMismatch {
            what: "face owner list",
            expected: n_faces,
            found: owner.len(),
        });
    }
    if neighbour.len() != n_internal {
        return Err(MeshWaveError::LengthMismatch {
            what: "face neighbour list",
            expected: n_internal,
            found: neighbour.len(),
        });
    }
    validate_faces(mesh.n_cells(), owner, neighbour)?;
    validate_patches(n_faces, n_internal, mesh.patches())?;
    for cell in 0..mesh.n_cells() {
        if let Some(&face) = mesh.cell_faces(cell).iter().find(|&&f| f >= n_faces) {
            return Err(MeshWaveError::FaceOutOfRange { face, n_faces });
        }
    }
    Ok(())
}

fn validate_faces(n_cells: usize, owner: &[usize], neighbour: &[usize]) -> Result<(), MeshWaveError> {
    if neighbour.len() > owner.len() {
        return Err(MeshWaveError::LengthMismatch {
            what: "face neighbour list (internal faces) vs owner list",
            expected: owner.len(),
            found: neighbour.len(),
        });
    }
    if let Some(&cell) = owner.iter().find(|&&c| c >= n_cells) {
        return Err(MeshWaveError::CellOutOfRange { cell, n_cells });
    }
    for (face, (&o, &n)) in owner.iter().zip(neighbour).enumerate() {
        if n >= n_cells {
            return Err(MeshWaveError::CellOutOfRange { cell: n, n_cells });
        }
        if n == o {
            return Err(MeshWaveError::InvalidNeighbour {
                face,
                owner: o,
                neighbour: n,
            });
        }
    }
    Ok(())
}

fn validate_patches(
    n_faces: usize,
    n_internal: usize,
    patches: &[BoundaryPatch],
) -> Result<(), MeshWaveError> {
    let mut expected = n_internal;
    for p in patches {
        if p.start() != expected {
            return Err(MeshWaveError::PatchLayout {
                patch: p.name.clone(),
                start: p.start(),
                expected,
            });
        }
        expected = p.faces.end_value();
    }
    if expected != n_faces {
        return Err(MeshWaveError::PatchCoverage {
            covered: expected,
            n_faces,
        });
    }

    for (idx, p) in patches.iter().enumerate() {
        match &p.kind {
            PatchKind::Ordinary | PatchKind::Processor { .. } => {}
            PatchKind::Cyclic {
                neighbour_patch, ..
            } => {
                let nbr = neighbour_of(p, *neighbour_patch, patches)?;
                if !matches!(&nbr.kind, PatchKind::Cyclic { neighbour_patch: back, .. } if *back == idx)
                {
                    return Err(MeshWaveError::CyclicMismatch {
                        patch: p.name.clone(),
                        neighbour: nbr.name.clone(),
                        reason: "neighbour is not a cyclic patch pointing back",
                    });
                }
                if nbr.size() != p.size() {
                    return Err(MeshWaveError::CyclicMismatch {
                        patch: p.name.clone(),
                        neighbour: nbr.name.clone(),
                        reason: "patch sizes differ",
                    });
                }
            }
            PatchKind::CyclicAmi {
                neighbour_patch,
                addressing,
                ..
            } => {
                let nbr = neighbour_of(p, *neighbour_patch, patches)?;
                if !nbr.kind.is_cyclic_ami() {
                    return Err(MeshWaveError::CyclicMismatch {
                        patch: p.name.clone(),
                        neighbour: nbr.name.clone(),
                        reason: "neighbour is not a cyclic AMI patch",
                    });
                }
                if addressing.len() != p.size() {
                    return Err(MeshWaveError::AmiAddressing {
                        patch: p.name.clone(),
                        reason: format!(
                            "{} addressing rows for {} faces",
                            addressing.len(),
                            p.size()
                        ),
                    });
                }
                let bad = addressing
                    .sources
                    .iter()
                    .flatten()
                    .find(|(src, w)| *src >= nbr.size() || !w.is_finite() || *w < 0.0);
                if let Some((src, w)) = bad {
                    return Err(MeshWaveError::AmiAddressing {
                        patch: p.name.clone(),
                        reason: format!(
                            "source face {src} (weight {w}) invalid for neighbour of {} faces",
                            nbr.size()
                        ),
                    });
                }
            }
        }
    }

    let mut by_rank: HashMap<usize, &str> = HashMap::new();
    for p in patches {
        if let PatchKind::Processor { neighbour_rank } = p.kind {
            if let Some(first) = by_rank.insert(neighbour_rank, &p.name) {
                return Err(MeshWaveError::DuplicateProcessorNeighbour {
                    rank: neighbour_rank,
                    first: first.to_string(),
                    second: p.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn neighbour_of<'p>(
    patch: &BoundaryPatch,
    neighbour: usize,
    patches: &'p [BoundaryPatch],
) -> Result<&'p BoundaryPatch, MeshWaveError> {
    patches
        .get(neighbour)
        .ok_or_else(|| MeshWaveError::MissingNeighbourPatch {
            patch: patch.name.clone(),
            neighbour,
        })
}

/// Incremental assembly of a [`FaceMesh`].
///
/// Internal faces are added with [`internal_face`](Self::internal_face);
/// each [`patch`](Self::patch) call appends a patch whose faces are the
/// owner cells given, in order. Patch indices follow call order, so a cyclic
/// pair can reference a patch added later.
#[derive(Clone, Debug, Default)]
pub struct FaceMeshBuilder {
    n_cells: usize,
    internal: Vec<(usize, usize)>,
    patches: Vec<(String, Vec<usize>, PatchKind)>,
}

impl FaceMeshBuilder {
    pub fn new(n_cells: usize) -> Self {
        Self {
            n_cells,
            ..Default::default()
        }
    }

    pub fn internal_face(mut self, owner: usize, neighbour: usize) -> Self {
        self.internal.push((owner, neighbour));
        self
    }

    pub fn internal_faces<I: IntoIterator<Item = (usize, usize)>>(mut self, faces: I) -> Self {
        self.internal.extend(faces);
        self
    }

    pub fn patch(
        mut self,
        name: impl Into<String>,
        owners: impl IntoIterator<Item = usize>,
        kind: PatchKind,
    ) -> Self {
        self.patches
            .push((name.into(), owners.into_iter().collect(), kind));
        self
    }

    /// Validate and build. Internal faces keep their insertion order.
    pub fn build(self) -> Result<FaceMesh, MeshWaveError> {
        if let Some(dup) = self
            .patches
            .iter()
            .map(|(name, _, _)| name.as_str())
            .duplicates()
            .next()
        {
            return Err(MeshWaveError::DuplicatePatchName(dup.to_string()));
        }
        let (mut owner, neighbour): (Vec<usize>, Vec<usize>) = self.internal.into_iter().unzip();
        let mut patches = Vec::with_capacity(self.patches.len());
        for (name, owners, kind) in self.patches {
            let start = owner.len();
            patches.push(BoundaryPatch::new(name, start, owners.len(), kind));
            owner.extend(owners);
        }
        FaceMesh::new(self.n_cells, owner, neighbour, patches)
    }
}
