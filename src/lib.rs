#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-wave
//!
//! mesh-wave floods information across the cells and faces of an
//! unstructured, face-addressed finite-volume mesh, breadth first, until
//! nothing changes. The payload decides what "better" means (hop counts,
//! nearest-wall distance, region labels); the engine decides who talks to
//! whom and when.
//!
//! ## Features
//! - [`FaceCellWave`](algs::wave::FaceCellWave): face→cell / cell→face
//!   propagation with dirty-set bookkeeping and unvisited counters
//! - Couplings: processor patches (across ranks), cyclic and rotated cyclic
//!   patches, cyclic AMI patches and explicit face-to-face connections
//! - Pluggable communication backends (serial, threaded ranks, MPI)
//! - A ready-made wall-distance client
//!
//! ## Determinism
//!
//! Changed entities are processed in the order they were first marked, and
//! every continue/stop decision is taken on a global sum, so all ranks run
//! the same number of iterations.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! mesh-wave = "0.3"
//! # Optional features:
//! # features = ["mpi-support"]
//! ```

//! Public prelude for mesh-wave.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::communicator::{CommTag, Communicator, LocalComm, NoComm};
    pub use crate::algs::wall_dist::{MeshGeometry, WallPoint, wall_distance};
    pub use crate::algs::wave::{FaceCellWave, HopCount, MeshWave, WaveConfig, WaveInfo};
    pub use crate::data::{LabelRange, ScalarRange, TaggedInfo};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshWaveError;
    pub use crate::topology::{
        AmiAddressing, BoundaryPatch, FaceMesh, FaceMeshBuilder, PatchKind, PolyMesh, Rotation,
    };
}
