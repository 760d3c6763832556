//! MeshWaveError: Unified error type for mesh-wave public APIs
//!
//! Every variant describes a configuration or communication failure. These
//! indicate caller misuse (bad indices, inconsistent patch data) or a broken
//! peer, never a convergence shortfall; unvisited cells and faces are reported
//! through counters instead.

use thiserror::Error;

/// Unified error type for mesh-wave operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshWaveError {
    /// A face index lies outside `0..n_faces`.
    #[error("face {face} out of range (mesh has {n_faces} faces)")]
    FaceOutOfRange { face: usize, n_faces: usize },
    /// A cell index lies outside `0..n_cells`.
    #[error("cell {cell} out of range (mesh has {n_cells} cells)")]
    CellOutOfRange { cell: usize, n_cells: usize },
    /// Two lists that must be parallel have different lengths.
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Internal face without a neighbour, or neighbour equal to the owner.
    #[error("internal face {face} has invalid neighbour {neighbour} (owner {owner})")]
    InvalidNeighbour {
        face: usize,
        owner: usize,
        neighbour: usize,
    },
    /// Boundary patches must tile `n_internal_faces..n_faces` in order.
    #[error("patch `{patch}` starts at face {start}, expected {expected}")]
    PatchLayout {
        patch: String,
        start: usize,
        expected: usize,
    },
    /// Two patches share a name.
    #[error("duplicate patch name `{0}`")]
    DuplicatePatchName(String),
    /// A patch index lies outside the mesh's patch list.
    #[error("patch {patch} out of range (mesh has {n_patches} patches)")]
    PatchOutOfRange { patch: usize, n_patches: usize },
    /// Boundary patches do not cover every boundary face.
    #[error("boundary patches cover faces up to {covered}, mesh has {n_faces}")]
    PatchCoverage { covered: usize, n_faces: usize },
    /// A coupled patch names a neighbour patch that does not exist.
    #[error("patch `{patch}` refers to missing neighbour patch {neighbour}")]
    MissingNeighbourPatch { patch: String, neighbour: usize },
    /// Cyclic partners must point at each other and have the same size.
    #[error("cyclic patch `{patch}` is not paired consistently with `{neighbour}`: {reason}")]
    CyclicMismatch {
        patch: String,
        neighbour: String,
        reason: &'static str,
    },
    /// AMI addressing row count or source face index is invalid.
    #[error("AMI patch `{patch}`: {reason}")]
    AmiAddressing { patch: String, reason: String },
    /// More than one processor patch faces the same neighbour rank.
    #[error("processor patches `{first}` and `{second}` both face rank {rank}")]
    DuplicateProcessorNeighbour {
        rank: usize,
        first: String,
        second: String,
    },
    /// Processor patch pointing back at the local rank.
    #[error("processor patch `{patch}` faces its own rank {rank}")]
    SelfProcessorPatch { patch: String, rank: usize },
    /// An explicit connection links a face to itself.
    #[error("explicit connection links face {face} to itself")]
    SelfConnection { face: usize },
    /// Propagation tolerance must be finite and non-negative.
    #[error("invalid propagation tolerance {0}")]
    InvalidTolerance(String),
    /// Receive failed or delivered an unexpected amount of data.
    #[error("communication with rank {neighbor} failed: {detail}")]
    CommError { neighbor: usize, detail: String },
    /// Another rank failed during a collective step; this rank stops too.
    #[error("{failed_ranks} other rank(s) failed during the wave")]
    PeerFailure { failed_ranks: usize },
    /// Internal bookkeeping disagrees with itself (debug checks only).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// Records could not be serialised for sending.
    #[error("wire encode error: {0}")]
    WireEncode(String),
    /// Wire frame could not be decoded.
    #[error("wire decode error from rank {neighbor}: {reason}")]
    WireDecode { neighbor: usize, reason: String },
}
