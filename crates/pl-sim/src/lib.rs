//! `pl-sim` — the assembled production-line simulation framework.
//!
//! [`Simulation`] is the front door: it owns the scheduler and the injected
//! observability sink, and hands out buffers, parts, and stations wired to
//! both.  The underlying layers are re-exported so a consumer needs only
//! this crate.
//!
//! ```no_run
//! use pl_sim::{BufferSpec, LocationId, SimTime, Simulation};
//!
//! let mut sim = Simulation::new();
//! let staging = sim
//!     .store_buffer(&BufferSpec::new(LocationId(0), "staging").with_capacity(10.0))
//!     .unwrap();
//! # let _ = staging;
//! sim.run_until(SimTime(20.0)).unwrap();
//! ```

pub mod sim;

#[cfg(test)]
mod tests;

pub use pl_batch::{Batch, BatchStrategy, ContainerBatch, StoreBatch};
pub use pl_buffer::{ContainerBuffer, StoreBuffer};
pub use pl_core::{
    BufferSpec, FlowError, FlowResult, LocationId, Part, PartId, PartSpec, ProcessSpec,
    RetryPolicy, SimSink, SimTime, Sink, StationState, TaskId, TokenId,
};
pub use pl_kernel::{EventScheduler, ProcessHandle, SimHandle, Timeout, Trigger, Wait, join_all};
pub use pl_resource::{ResourcePool, Token};
pub use pl_station::{ProcessStation, StationProbe};

pub use sim::Simulation;
