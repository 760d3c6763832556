//! Point-to-point and collective byte exchanges over a [`Communicator`].
//!
//! Every exchange is symmetric: each rank posts a receive from and a send to
//! every listed neighbour, even when it has nothing to say, so peers never
//! wait on a message that is not coming.
//!
//! [`Communicator`]: crate::algs::communicator::Communicator

pub mod data_exchange;
pub mod reduction;
pub mod size_exchange;

pub use data_exchange::exchange_bytes;
pub use reduction::global_sum;
pub use size_exchange::exchange_sizes_symmetric;
