//! `HopCount`: the simplest useful payload, the number of face crossings
//! from the nearest seed.

use super::info::WaveInfo;
use crate::topology::rotation::Rotation;
use serde::{Deserialize, Serialize};

/// Hops from the nearest seed face. A face seeded with `0` gives its owner
/// cell `0`, the next face `1`, the next cell `1`, and so on. Unreached
/// slots hold no distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HopCount {
    hops: Option<u32>,
}

impl HopCount {
    pub const fn new(hops: u32) -> Self {
        Self { hops: Some(hops) }
    }

    pub const fn unreached() -> Self {
        Self { hops: None }
    }

    #[inline]
    pub fn distance(&self) -> Option<u32> {
        self.hops
    }

    fn improve(&mut self, candidate: Option<u32>) -> bool {
        match (self.hops, candidate) {
            (_, None) => false,
            (Some(current), Some(c)) if current <= c => false,
            (_, c) => {
                self.hops = c;
                true
            }
        }
    }
}

impl<TD> WaveInfo<TD> for HopCount {
    fn valid(&self, _td: &TD) -> bool {
        self.hops.is_some()
    }

    fn transform(&mut self, _rotation: &Rotation, _td: &mut TD) {}

    fn update_cell(
        &mut self,
        _cell: usize,
        _neighbour_face: usize,
        neighbour_info: &Self,
        _tol: f64,
        _td: &mut TD,
    ) -> bool {
        self.improve(neighbour_info.hops)
    }

    fn update_face_from_cell(
        &mut self,
        _face: usize,
        _neighbour_cell: usize,
        neighbour_info: &Self,
        _tol: f64,
        _td: &mut TD,
    ) -> bool {
        self.improve(neighbour_info.hops.map(|h| h.saturating_add(1)))
    }

    fn update_face(&mut self, _face: usize, neighbour_info: &Self, _tol: f64, _td: &mut TD) -> bool {
        self.improve(neighbour_info.hops)
    }

    fn equal(&self, other: &Self, _td: &TD) -> bool {
        self == other
    }
}
