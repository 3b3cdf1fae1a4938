//! `pl-core` — foundational types for the `prodline` production-line
//! simulation framework.
//!
//! This crate is a dependency of every other `pl-*` crate.  It intentionally
//! has no `pl-*` dependencies and minimal external ones (only `thiserror` and
//! `rustc-hash`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `PartId`, `LocationId`, `TaskId`, `TokenId`            |
//! | [`time`]   | `SimTime` — the simulated clock scalar                 |
//! | [`error`]  | `FlowError`, `FlowResult`                              |
//! | [`spec`]   | `BufferSpec`, `PartSpec`, `ProcessSpec`, `RetryPolicy` |
//! | [`part`]   | `Part` — the unit of work moving through the line      |
//! | [`sink`]   | `SimSink` observability trait, `Sink` handle           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.  |

pub mod error;
pub mod ids;
pub mod part;
pub mod sink;
pub mod spec;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FlowError, FlowResult};
pub use ids::{LocationId, PartId, TaskId, TokenId};
pub use part::Part;
pub use sink::{NoopSink, SimSink, Sink, StationState};
pub use spec::{BufferSpec, Metadata, PartSpec, ProcessSpec, RetryPolicy};
pub use time::SimTime;
