//! Boundary patches and their coupling kinds.
//!
//! A patch is a named, contiguous run of boundary faces. Coupled kinds say
//! where the information leaving a patch face re-enters the mesh:
//!
//! | kind         | counterpart of patch face `i`                           |
//! |--------------|---------------------------------------------------------|
//! | `Ordinary`   | none (true domain boundary)                             |
//! | `Processor`  | face `i` of the neighbour rank's patch facing this rank |
//! | `Cyclic`     | face `i` of `neighbour_patch` on this rank              |
//! | `CyclicAmi`  | weighted set of faces of `neighbour_patch`              |

use crate::data::label_range::LabelRange;
use crate::topology::rotation::Rotation;
use serde::{Deserialize, Serialize};

/// Interpolation addressing for an AMI patch: for every face of the patch,
/// the contributing faces of the neighbour patch (patch-local numbering)
/// and their weights.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AmiAddressing {
    pub sources: Vec<Vec<(usize, f64)>>,
}

impl AmiAddressing {
    pub fn new(sources: Vec<Vec<(usize, f64)>>) -> Self {
        Self { sources }
    }

    /// One-to-one addressing with unit weights.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).map(|i| vec![(i, 1.0)]).collect())
    }

    /// Contributions to patch face `i`.
    #[inline]
    pub fn sources_of(&self, i: usize) -> &[(usize, f64)] {
        self.sources.get(i).map_or(&[], |v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PatchKind {
    Ordinary,
    Processor {
        neighbour_rank: usize,
    },
    /// `rotation` maps values arriving from the neighbour patch into this
    /// patch's frame; `None` means a translational (parallel) cyclic.
    Cyclic {
        neighbour_patch: usize,
        rotation: Option<Rotation>,
    },
    CyclicAmi {
        neighbour_patch: usize,
        addressing: AmiAddressing,
        rotation: Option<Rotation>,
    },
}

impl PatchKind {
    pub fn is_coupled(&self) -> bool {
        !matches!(self, PatchKind::Ordinary)
    }

    pub fn is_processor(&self) -> bool {
        matches!(self, PatchKind::Processor { .. })
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self, PatchKind::Cyclic { .. })
    }

    pub fn is_cyclic_ami(&self) -> bool {
        matches!(self, PatchKind::CyclicAmi { .. })
    }

    /// Neighbour patch index for same-rank couplings.
    pub fn neighbour_patch(&self) -> Option<usize> {
        match self {
            PatchKind::Cyclic {
                neighbour_patch, ..
            }
            | PatchKind::CyclicAmi {
                neighbour_patch, ..
            } => Some(*neighbour_patch),
            _ => None,
        }
    }

    /// Rotation applied to values entering this patch, if non-parallel.
    pub fn rotation(&self) -> Option<&Rotation> {
        match self {
            PatchKind::Cyclic { rotation, .. } | PatchKind::CyclicAmi { rotation, .. } => {
                rotation.as_ref()
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPatch {
    pub name: String,
    pub faces: LabelRange,
    pub kind: PatchKind,
}

impl BoundaryPatch {
    pub fn new(name: impl Into<String>, start: usize, size: usize, kind: PatchKind) -> Self {
        Self {
            name: name.into(),
            faces: LabelRange::new(start, size),
            kind,
        }
    }

    pub fn ordinary(name: impl Into<String>, start: usize, size: usize) -> Self {
        Self::new(name, start, size, PatchKind::Ordinary)
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.faces.start()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.faces.size()
    }

    /// Mesh face of patch face `i`.
    #[inline]
    pub fn mesh_face(&self, i: usize) -> usize {
        self.faces.start() + i
    }

    #[inline]
    pub fn is_coupled(&self) -> bool {
        self.kind.is_coupled()
    }
}
