//! Framework error type.
//!
//! The first four variants are raised synchronously at call time, before any
//! suspension, so callers can handle them without side effects having
//! occurred.  `Interrupted` is different: it is delivered asynchronously to a
//! suspended process at its next resumption, and side effects that happened
//! before delivery (removed buffer items, granted tokens) are *not* undone.

use thiserror::Error;

/// The error taxonomy shared by all `pl-*` crates.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A delay was negative or non-finite.
    #[error("invalid delay: {0}")]
    InvalidDelay(f64),

    /// A quantity or batch count was not strictly positive (or not integral
    /// where an item count was required).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(f64),

    /// A batch strategy was invoked with no buffer attached.
    #[error("batch strategy has no buffer bound")]
    UnboundBuffer,

    /// A resource token was released more than once.
    #[error("resource token released twice")]
    DoubleRelease,

    /// A suspended process was cancelled; observed at its next resumption.
    #[error("interrupted while suspended")]
    Interrupted,

    /// A specification record failed validation, or a component was wired up
    /// inconsistently.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pl-*` crates.
pub type FlowResult<T> = Result<T, FlowError>;
