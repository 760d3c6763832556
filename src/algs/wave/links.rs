//! Explicit face-to-face connections (baffles) as an adjacency graph.

use crate::mesh_error::MeshWaveError;

/// Undirected face links in CSR form: `linked(f)` lists every face that
/// exchanges information directly with `f`.
#[derive(Clone, Debug, Default)]
pub struct FaceLinks {
    offsets: Vec<usize>,
    targets: Vec<usize>,
    pairs: Vec<(usize, usize)>,
}

impl FaceLinks {
    pub fn new(n_faces: usize, pairs: &[(usize, usize)]) -> Result<Self, MeshWaveError> {
        for &(a, b) in pairs {
            for f in [a, b] {
                if f >= n_faces {
                    return Err(MeshWaveError::FaceOutOfRange { face: f, n_faces });
                }
            }
            if a == b {
                return Err(MeshWaveError::SelfConnection { face: a });
            }
        }
        if pairs.is_empty() {
            return Ok(Self::default());
        }
        let mut offsets = vec![0usize; n_faces + 1];
        for &(a, b) in pairs {
            offsets[a + 1] += 1;
            offsets[b + 1] += 1;
        }
        for f in 0..n_faces {
            offsets[f + 1] += offsets[f];
        }
        let mut cursor = offsets.clone();
        let mut targets = vec![0usize; 2 * pairs.len()];
        for &(a, b) in pairs {
            targets[cursor[a]] = b;
            cursor[a] += 1;
            targets[cursor[b]] = a;
            cursor[b] += 1;
        }
        Ok(Self {
            offsets,
            targets,
            pairs: pairs.to_vec(),
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn linked(&self, face: usize) -> &[usize] {
        match (self.offsets.get(face), self.offsets.get(face + 1)) {
            (Some(&s), Some(&e)) => &self.targets[s..e],
            _ => &[],
        }
    }

    /// The connection list as given.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }
}
