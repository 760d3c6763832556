//! Fixed, versioned, little-endian wire framing for coupled-patch exchange.
//!
//! A frame is a [`WireHdr`] followed by a [`WireCount`] and a `bincode`
//! body holding the records. Fixed-size records are `bytemuck::Pod` so they
//! can be cast to and from byte slices without copies.

use crate::data::tagged::TaggedInfo;
use crate::mesh_error::MeshWaveError;
use bytemuck::{Pod, Zeroable};
use serde::Serialize;
use serde::de::DeserializeOwned;
use static_assertions::const_assert_eq;
use std::mem::size_of;

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

pub fn cast_slice_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// What a frame carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum WireKind {
    /// Changed processor-patch faces, patch-local ids.
    PatchFaces = 1,
}

// ===== Common records ======================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,  // = WIRE_VERSION.to_le()
    pub kind_le: u16,     // WireKind
    pub reserved_le: u32, // future use; keep zero
}

impl WireHdr {
    pub fn new(kind: WireKind) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: (kind as u16).to_le(),
            reserved_le: 0,
        }
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
}

/// Record count (or byte count for size stages).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32,
}

impl WireCount {
    pub const ZERO: WireCount = WireCount { n_le: 0 };

    /// Fails if `n` does not fit the 32-bit field.
    pub fn new(n: usize) -> Result<Self, MeshWaveError> {
        let n = u32::try_from(n)
            .map_err(|_| MeshWaveError::WireEncode(format!("count {n} exceeds the 32-bit wire field")))?;
        Ok(Self { n_le: n.to_le() })
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// 64-bit partial sum carried by reductions.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireSum {
    pub v_le: u64,
}

impl WireSum {
    pub fn new(v: u64) -> Self {
        Self { v_le: v.to_le() }
    }
    pub fn get(&self) -> u64 {
        u64::from_le(self.v_le)
    }
}

const_assert_eq!(size_of::<WireHdr>(), 8);
const_assert_eq!(size_of::<WireCount>(), 4);
const_assert_eq!(size_of::<WireSum>(), 8);

const PREFIX: usize = size_of::<WireHdr>() + size_of::<WireCount>();

pub fn expect_exact_len(neighbor: usize, actual: usize, expected: usize) -> Result<(), MeshWaveError> {
    if actual == expected {
        Ok(())
    } else {
        Err(MeshWaveError::CommError {
            neighbor,
            detail: format!("expected {expected} bytes, got {actual}"),
        })
    }
}

/// Frame a batch of tagged records.
pub fn encode_tagged<T: Serialize>(
    kind: WireKind,
    records: &[TaggedInfo<T>],
) -> Result<Vec<u8>, MeshWaveError> {
    let body = bincode::serialize(records).map_err(|e| MeshWaveError::WireEncode(e.to_string()))?;
    let count = WireCount::new(records.len())?;
    let mut out = Vec::with_capacity(PREFIX + body.len());
    out.extend_from_slice(cast_slice(std::slice::from_ref(&WireHdr::new(kind))));
    out.extend_from_slice(cast_slice(std::slice::from_ref(&count)));
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a frame produced by [`encode_tagged`] on rank `neighbor`.
pub fn decode_tagged<T: DeserializeOwned>(
    neighbor: usize,
    kind: WireKind,
    bytes: &[u8],
) -> Result<Vec<TaggedInfo<T>>, MeshWaveError> {
    let fail = |reason: String| MeshWaveError::WireDecode { neighbor, reason };
    if bytes.len() < PREFIX {
        return Err(fail(format!("frame of {} bytes is shorter than its header", bytes.len())));
    }
    let hdr: WireHdr = bytemuck::pod_read_unaligned(&bytes[..size_of::<WireHdr>()]);
    if hdr.version() != WIRE_VERSION {
        return Err(fail(format!(
            "wire version {} (expected {WIRE_VERSION})",
            hdr.version()
        )));
    }
    if hdr.kind() != kind as u16 {
        return Err(fail(format!("frame kind {} (expected {})", hdr.kind(), kind as u16)));
    }
    let count: WireCount = bytemuck::pod_read_unaligned(&bytes[size_of::<WireHdr>()..PREFIX]);
    let records: Vec<TaggedInfo<T>> =
        bincode::deserialize(&bytes[PREFIX..]).map_err(|e| fail(e.to_string()))?;
    if records.len() != count.get() {
        return Err(fail(format!(
            "header announces {} records, body holds {}",
            count.get(),
            records.len()
        )));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_frame_round_trip() {
        let recs = vec![TaggedInfo::new(3, 1.5f64), TaggedInfo::new(0, -2.0)];
        let bytes = encode_tagged(WireKind::PatchFaces, &recs).unwrap();
        let back: Vec<TaggedInfo<f64>> = decode_tagged(1, WireKind::PatchFaces, &bytes).unwrap();
        assert_eq!(back, recs);
    }

    #[test]
    fn empty_frame_is_header_plus_length() {
        let bytes = encode_tagged::<u32>(WireKind::PatchFaces, &[]).unwrap();
        let back: Vec<TaggedInfo<u32>> = decode_tagged(0, WireKind::PatchFaces, &bytes).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn rejects_short_and_versioned_frames() {
        assert!(matches!(
            decode_tagged::<u8>(2, WireKind::PatchFaces, &[1, 2, 3]),
            Err(MeshWaveError::WireDecode { neighbor: 2, .. })
        ));
        let mut bytes = encode_tagged(WireKind::PatchFaces, &[TaggedInfo::new(1, 7u8)]).unwrap();
        bytes[0] = 99;
        assert!(decode_tagged::<u8>(0, WireKind::PatchFaces, &bytes).is_err());
    }

    #[test]
    fn count_mismatch_detected() {
        let mut bytes = encode_tagged(WireKind::PatchFaces, &[TaggedInfo::new(1, 7u8)]).unwrap();
        bytes[8] = 5;
        assert!(decode_tagged::<u8>(0, WireKind::PatchFaces, &bytes).is_err());
    }

    #[test]
    fn oversized_count_is_an_encode_error() {
        assert_eq!(WireCount::new(7).unwrap().get(), 7);
        assert_eq!(WireCount::new(u32::MAX as usize).unwrap().get(), u32::MAX as usize);
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            WireCount::new(u32::MAX as usize + 1),
            Err(MeshWaveError::WireEncode(_))
        ));
    }

    #[test]
    fn version_guard() {
        let hdr = WireHdr::new(WireKind::PatchFaces);
        assert_eq!(hdr.version(), WIRE_VERSION);
        assert_eq!(hdr.kind(), 1);
        assert_eq!(WireSum::new(u64::MAX).get(), u64::MAX);
    }
}
