//! All-ranks reductions built from point-to-point messages.

use crate::algs::communicator::{CommTag, Communicator, Wait};
use crate::algs::wire::{WireSum, cast_slice, cast_slice_mut};
use crate::mesh_error::MeshWaveError;

/// Sum `local` over every rank; all ranks receive the same total.
///
/// Every rank sends its contribution to every other rank, so the result is
/// independent of arrival order. Collective: all ranks must call it with the
/// same `tag`.
pub fn global_sum<C: Communicator>(comm: &C, tag: CommTag, local: u64) -> Result<u64, MeshWaveError> {
    if !comm.is_parallel() {
        return Ok(local);
    }
    let me = comm.rank();
    let peers: Vec<usize> = (0..comm.size()).filter(|&r| r != me).collect();

    let recvs: Vec<_> = peers
        .iter()
        .map(|&p| {
            let mut slot = WireSum::new(0);
            (p, comm.irecv(p, tag.as_u16(), cast_slice_mut(std::slice::from_mut(&mut slot))))
        })
        .collect();
    let msg = WireSum::new(local);
    let sends: Vec<_> = peers
        .iter()
        .map(|&p| comm.isend(p, tag.as_u16(), cast_slice(std::slice::from_ref(&msg))))
        .collect();

    let mut total = local;
    let mut maybe_err = None;
    for (p, h) in recvs {
        match h.wait() {
            Some(data) if data.len() == std::mem::size_of::<WireSum>() => {
                let mut slot = WireSum::new(0);
                cast_slice_mut(std::slice::from_mut(&mut slot)).copy_from_slice(&data);
                total += slot.get();
            }
            other => {
                if maybe_err.is_none() {
                    maybe_err = Some(MeshWaveError::CommError {
                        neighbor: p,
                        detail: format!(
                            "reduction expected {} bytes, got {:?}",
                            std::mem::size_of::<WireSum>(),
                            other.map(|d| d.len())
                        ),
                    });
                }
            }
        }
    }
    for s in sends {
        let _ = s.wait();
    }
    match maybe_err {
        Some(e) => Err(e),
        None => Ok(total),
    }
}
