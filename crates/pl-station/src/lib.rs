//! `pl-station` — the cyclic consumer/producer driving a production line.
//!
//! A [`ProcessStation`] perpetually pulls a batch through its input strategy,
//! claims one pool slot per unit, holds them for a fixed simulated duration,
//! pushes the batch through its output strategy, and releases the slots.
//! Failures anywhere in the cycle are caught at the station boundary and the
//! cycle restarts from `Idle` after a configurable backoff.

pub mod station;


pub use station::{ProcessStation, StationProbe};
