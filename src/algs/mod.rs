//! Re-export public algorithms.

pub mod communicator;
pub mod exchange;
pub mod wall_dist;
pub mod wave;
pub mod wire;

pub use wall_dist::{MeshGeometry, WallDistance, WallPoint, cells_within, wall_distance};
pub use wave::{FaceCellWave, MeshWave, WaveConfig, WaveInfo};
