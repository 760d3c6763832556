//! Stage 2 of a neighbour exchange: ship variable-length byte payloads.

use super::size_exchange::exchange_sizes_symmetric;
use crate::algs::communicator::{CommTag, Communicator, Wait};
use crate::algs::wire::{WireCount, expect_exact_len};
use crate::mesh_error::MeshWaveError;
use std::collections::BTreeMap;

/// Send `outgoing[nbr]` to every neighbour and return what each neighbour
/// sent back. Uses `tag` for the size stage and `tag + 1` for the payload.
///
/// Every rank must list the same neighbour pairs (if rank `a` lists `b`,
/// rank `b` lists `a`), otherwise the exchange blocks.
pub fn exchange_bytes<C>(
    outgoing: &BTreeMap<usize, Vec<u8>>,
    comm: &C,
    tag: CommTag,
) -> Result<BTreeMap<usize, Vec<u8>>, MeshWaveError>
where
    C: Communicator,
{
    // A frame too large to announce is replaced by an empty one so the
    // neighbour still completes both stages; the error is returned at the end.
    let mut oversized = None;
    let payloads: BTreeMap<usize, &[u8]> = outgoing
        .iter()
        .map(|(&nbr, bytes)| match WireCount::new(bytes.len()) {
            Ok(_) => (nbr, bytes.as_slice()),
            Err(err) => {
                oversized.get_or_insert(err);
                (nbr, &[][..])
            }
        })
        .collect();
    let counts: BTreeMap<usize, usize> = payloads.iter().map(|(&n, b)| (n, b.len())).collect();
    let sizes_in = exchange_sizes_symmetric(&counts, comm, tag)?;
    let data_tag = tag.offset(1);

    let mut recv_data = BTreeMap::new();
    for (&nbr, &len) in &sizes_in {
        let mut buffer = vec![0u8; len];
        let h = comm.irecv(nbr, data_tag.as_u16(), &mut buffer);
        recv_data.insert(nbr, (h, len));
    }
    let pending_sends: Vec<_> = payloads
        .iter()
        .map(|(&nbr, bytes)| comm.isend(nbr, data_tag.as_u16(), bytes))
        .collect();

    let mut out = BTreeMap::new();
    let mut maybe_err = oversized;
    for (nbr, (h, len)) in recv_data {
        let res = h
            .wait()
            .ok_or_else(|| MeshWaveError::CommError {
                neighbor: nbr,
                detail: format!("failed to receive payload from rank {nbr}"),
            })
            .and_then(|raw| expect_exact_len(nbr, raw.len(), len).map(|_| raw));
        match res {
            Ok(raw) => {
                out.insert(nbr, raw);
            }
            Err(e) if maybe_err.is_none() => maybe_err = Some(e),
            Err(_) => {}
        }
    }
    for send in pending_sends {
        let _ = send.wait();
    }
    match maybe_err {
        Some(err) => Err(err),
        None => Ok(out),
    }
}
