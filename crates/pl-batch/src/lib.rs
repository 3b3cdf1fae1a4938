//! `pl-batch` — multi-item transfer policies over a bound buffer.
//!
//! A strategy owns a default batch size and a reference to exactly one
//! buffer.  [`StoreBatch`] moves discrete parts by issuing one `get`/`put`
//! per item and joining on an all-resolved barrier; [`ContainerBatch`]
//! delegates to the container's single atomic quantity operation.  The
//! closed [`BatchStrategy`] enum is the surface stations program against.

pub mod batch;
pub mod container;
pub mod store;
pub mod strategy;


pub use batch::Batch;
pub use container::ContainerBatch;
pub use store::StoreBatch;
pub use strategy::BatchStrategy;
