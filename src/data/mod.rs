//! Data module: index sets, ranges and tagged records used by the wave
//! engine and its clients.

pub mod bit_set;
pub mod changed_set;
pub mod label_range;
pub mod scalar_range;
pub mod tagged;

pub use bit_set::BitSet;
pub use changed_set::ChangedSet;
pub use label_range::LabelRange;
pub use scalar_range::ScalarRange;
pub use tagged::TaggedInfo;
