//! `Rotation`: a 3×3 rotation tensor for transformed cyclic couplings.
//!
//! Row-major storage; `apply` computes `R · v`.

use serde::{Deserialize, Serialize};

pub type Vector = [f64; 3];

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rotation(pub [[f64; 3]; 3]);

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation {
    pub const fn identity() -> Self {
        Rotation([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Right-handed rotation by `angle` radians about the z axis.
    pub fn about_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Rotation([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    #[inline]
    pub fn apply(&self, v: &Vector) -> Vector {
        let r = &self.0;
        [
            r[0][0] * v[0] + r[0][1] * v[1] + r[0][2] * v[2],
            r[1][0] * v[0] + r[1][1] * v[1] + r[1][2] * v[2],
            r[2][0] * v[0] + r[2][1] * v[1] + r[2][2] * v[2],
        ]
    }

    /// Inverse of a proper rotation.
    pub fn transpose(&self) -> Self {
        let r = &self.0;
        let mut t = [[0.0; 3]; 3];
        for (i, row) in t.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = r[j][i];
            }
        }
        Rotation(t)
    }

    /// `self · other` (apply `other` first).
    pub fn compose(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (0..3).map(|k| a[i][k] * b[k][j]).sum();
            }
        }
        Rotation(m)
    }

    /// Every entry within `tol` of the identity.
    pub fn is_identity(&self, tol: f64) -> bool {
        let id = Self::identity();
        self.0
            .iter()
            .flatten()
            .zip(id.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}
