//! Mesh topology: face-addressed cells, boundary patches and the
//! transformations attached to coupled patches.
//!
//! Most users build a [`FaceMesh`] through [`FaceMeshBuilder`] and hand it
//! to the wave engine through the [`PolyMesh`] trait.

pub mod patch;
pub mod poly_mesh;
pub mod rotation;

pub use patch::{AmiAddressing, BoundaryPatch, PatchKind};
pub use poly_mesh::{FaceMesh, FaceMeshBuilder, PolyMesh, validate_mesh};
pub use rotation::{Rotation, Vector};
