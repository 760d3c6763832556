//! Stage 1 of a neighbour exchange: tell each neighbour how many bytes
//! (or records) to expect.
//!
//! All functions take a typed [`CommTag`] and guarantee that every
//! send/receive handle is drained before returning, even if an error occurs.

use crate::algs::communicator::{CommTag, Communicator, Wait};
use crate::algs::wire::{WireCount, cast_slice, cast_slice_mut};
use crate::mesh_error::MeshWaveError;
use std::collections::BTreeMap;

/// Send `counts[nbr]` to every neighbour and receive theirs.
/// Returns `nbr → count` once all receives have completed.
pub fn exchange_sizes_symmetric<C>(
    counts: &BTreeMap<usize, usize>,
    comm: &C,
    tag: CommTag,
) -> Result<BTreeMap<usize, usize>, MeshWaveError>
where
    C: Communicator,
{
    // 1) post all receives
    let mut recv_size: BTreeMap<usize, (C::RecvHandle, WireCount)> = BTreeMap::new();
    for &nbr in counts.keys() {
        let mut cnt = WireCount::ZERO;
        let h = comm.irecv(
            nbr,
            tag.as_u16(),
            cast_slice_mut(std::slice::from_mut(&mut cnt)),
        );
        recv_size.insert(nbr, (h, cnt));
    }

    // 2) post all sends; a count that does not fit goes out as zero so the
    //    neighbour still gets its message
    let mut maybe_err = None;
    let mut pending_sends = Vec::with_capacity(counts.len());
    for (&nbr, &n) in counts {
        let count = WireCount::new(n).unwrap_or_else(|err| {
            maybe_err.get_or_insert(err);
            WireCount::ZERO
        });
        pending_sends.push(comm.isend(nbr, tag.as_u16(), cast_slice(std::slice::from_ref(&count))));
    }

    // 3) wait for all recvs, collect counts (but do not early-return)
    let mut sizes_in = BTreeMap::new();
    for (nbr, (h, mut cnt)) in recv_size {
        match h.wait() {
            Some(data) if data.len() == std::mem::size_of::<WireCount>() => {
                if maybe_err.is_none() {
                    cast_slice_mut(std::slice::from_mut(&mut cnt)).copy_from_slice(&data);
                    sizes_in.insert(nbr, cnt.get());
                }
            }
            Some(data) if maybe_err.is_none() => {
                maybe_err = Some(MeshWaveError::CommError {
                    neighbor: nbr,
                    detail: format!(
                        "expected {} bytes for size header, got {}",
                        std::mem::size_of::<WireCount>(),
                        data.len()
                    ),
                });
            }
            None if maybe_err.is_none() => {
                maybe_err = Some(MeshWaveError::CommError {
                    neighbor: nbr,
                    detail: format!("failed to receive size from rank {nbr}"),
                });
            }
            _ => {} // already have an error; just drain
        }
    }

    // 4) always drain all send handles before returning
    for send in pending_sends {
        let _ = send.wait();
    }

    match maybe_err {
        Some(err) => Err(err),
        None => Ok(sizes_in),
    }
}
