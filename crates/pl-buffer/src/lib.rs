//! `pl-buffer` — blocking queues built on the scheduling kernel.
//!
//! Two buffer kinds, matching the two ways material moves through a line:
//!
//! | Type                | Holds            | Granularity                     |
//! |---------------------|------------------|---------------------------------|
//! | [`StoreBuffer`]     | discrete `Part`s | one item per get/put            |
//! | [`ContainerBuffer`] | a numeric level  | an arbitrary quantity, atomic   |
//!
//! Both are cheap cloneable handles over shared state; all suspension goes
//! through the kernel's `Wait`/`Trigger` pairs, and pending operations are
//! served strictly FIFO per list.

pub mod container;
pub mod store;

#[cfg(test)]
mod tests;

pub use container::ContainerBuffer;
pub use store::StoreBuffer;
