//! `TaggedInfo`: an `(id, info)` pair carried across a coupling.
//!
//! The id is a face index in whichever numbering the sender and receiver
//! agreed on (mesh face for explicit connections, patch-local face for
//! coupled patches). Records are plain values; a batch is one `Vec`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedInfo<T> {
    pub id: usize,
    pub info: T,
}

impl<T> TaggedInfo<T> {
    #[inline]
    pub fn new(id: usize, info: T) -> Self {
        Self { id, info }
    }

    pub fn into_parts(self) -> (usize, T) {
        (self.id, self.info)
    }
}

impl<T> From<(usize, T)> for TaggedInfo<T> {
    fn from((id, info): (usize, T)) -> Self {
        Self { id, info }
    }
}

/// Order by id first, then by info.
impl<T: PartialOrd> PartialOrd for TaggedInfo<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.id.cmp(&other.id) {
            Ordering::Equal => self.info.partial_cmp(&other.info),
            ord => Some(ord),
        }
    }
}

impl<T: Ord> Ord for TaggedInfo<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.info.cmp(&other.info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_id_then_info() {
        let mut v = vec![
            TaggedInfo::new(2, 'a'),
            TaggedInfo::new(1, 'z'),
            TaggedInfo::new(2, 'A'),
        ];
        v.sort();
        let ids: Vec<_> = v.iter().map(|t| (t.id, t.info)).collect();
        assert_eq!(ids, vec![(1, 'z'), (2, 'A'), (2, 'a')]);
    }

    #[test]
    fn float_payload_partial_order() {
        let a = TaggedInfo::new(0, f64::NAN);
        let b = TaggedInfo::new(0, 1.0);
        assert_eq!(a.partial_cmp(&b), None);
        assert!(TaggedInfo::new(0, 5.0) < TaggedInfo::new(1, 0.0));
    }
}
