//! `pl-resource` — a counting pool of interchangeable capacity slots.
//!
//! A [`ResourcePool`] holds a fixed number of slots.  `request` suspends the
//! caller until a slot is free and resolves to a [`Token`] proving the grant;
//! `release` returns the slot and, if anyone is waiting, hands it to the
//! oldest waiter in the same scheduler step.

pub mod pool;

#[cfg(test)]
mod tests;

pub use pool::{ResourcePool, Token};
