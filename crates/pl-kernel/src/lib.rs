//! `pl-kernel` — the discrete-event scheduling kernel.
//!
//! # Execution model
//!
//! Execution is single-threaded and cooperative.  Units of work are plain
//! Rust futures registered with [`EventScheduler::spawn`]; the scheduler
//! maintains the simulated clock and a priority queue of pending wakes keyed
//! by `(time, sequence)`.  A sequence counter assigned at scheduling time
//! breaks ties between wakes at the same simulated instant, so two events
//! scheduled for the same time always execute in the order they were
//! scheduled — runs are reproducible.
//!
//! Exactly one task runs at a time and runs uninterrupted to its next
//! suspension point.  Suspension happens only by awaiting one of the kernel's
//! handles:
//!
//! | Handle                    | Suspension point                           |
//! |---------------------------|--------------------------------------------|
//! | [`Timeout`]               | a simulated delay                          |
//! | [`Wait`] / [`Trigger`]    | a buffer operation or resource request     |
//! | [`JoinAll`] (`join_all`)  | a barrier over concurrently issued waits   |
//!
//! Wakes are delivered through the scheduler's own queue, not through the
//! std waker machinery — tasks are polled with a no-op waker, and whichever
//! component resolves a `Wait` schedules the owning task explicitly.  That
//! keeps the resolution order fully deterministic.
//!
//! # Cancellation
//!
//! [`EventScheduler::interrupt`] flags a process and schedules an immediate
//! wake.  The in-flight suspension handle observes the flag at its next poll
//! and resolves to `Err(FlowError::Interrupted)`.  Side effects that occurred
//! before delivery (items already removed from a buffer, tokens already
//! granted) are not undone; that is a documented design property of the
//! system, not an oversight.

pub mod handle;
pub mod join;
pub mod scheduler;
pub mod timeout;
pub mod wait;
mod wake;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use handle::{ProcessHandle, SimHandle};
pub use join::{JoinAll, join_all};
pub use scheduler::EventScheduler;
pub use timeout::Timeout;
pub use wait::{Trigger, Wait};
