//! Per-instance wave configuration.

use crate::algs::communicator::CommTag;
use crate::mesh_error::MeshWaveError;
use serde::{Deserialize, Serialize};

/// Geometric tolerance for coupled-face consistency checks.
pub const GEOM_TOL: f64 = 1e-6;

/// Knobs for one [`FaceCellWave`](super::FaceCellWave).
///
/// `propagation_tol` is handed to every payload update. The default suits
/// ordinary cell/face/processor propagation; waves across non-parallel
/// (rotated) cyclics usually need a much tighter value to converge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub propagation_tol: f64,
    /// Exchange across cyclic AMI patches. Turning this off skips the
    /// interpolation entirely.
    pub handle_cyclic_ami: bool,
    /// First of the three message tags reserved by the wave.
    pub comm_tag: u16,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            propagation_tol: 0.01,
            handle_cyclic_ami: true,
            comm_tag: 0x5A00,
        }
    }
}

impl WaveConfig {
    pub fn with_propagation_tol(mut self, tol: f64) -> Self {
        self.propagation_tol = tol;
        self
    }

    pub fn with_cyclic_ami(mut self, enabled: bool) -> Self {
        self.handle_cyclic_ami = enabled;
        self
    }

    pub fn with_comm_tag(mut self, tag: u16) -> Self {
        self.comm_tag = tag;
        self
    }

    pub fn validate(&self) -> Result<(), MeshWaveError> {
        if !self.propagation_tol.is_finite() || self.propagation_tol < 0.0 {
            return Err(MeshWaveError::InvalidTolerance(self.propagation_tol.to_string()));
        }
        Ok(())
    }

    pub(crate) fn reduce_tag(&self) -> CommTag {
        CommTag(self.comm_tag)
    }

    /// Two tags: sizes, then payload.
    pub(crate) fn patch_tag(&self) -> CommTag {
        CommTag(self.comm_tag).offset(1)
    }
}
