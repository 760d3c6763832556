//! Wave propagation of user payloads across cells and faces.
//!
//! [`FaceCellWave`] is the engine; [`MeshWave`] wraps it with owned
//! storage. Payloads implement [`WaveInfo`].

pub mod config;
pub mod face_cell_wave;
pub mod hop_count;
pub mod info;
pub mod links;
pub mod mesh_wave;

pub use config::{GEOM_TOL, WaveConfig};
pub use face_cell_wave::FaceCellWave;
pub use hop_count::HopCount;
pub use info::WaveInfo;
pub use mesh_wave::MeshWave;
