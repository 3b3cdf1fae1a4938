//! Injectable observability sink.
//!
//! Components emit observational notices (level changes, batch completions,
//! token grants, caught interruptions) to a [`Sink`] handed to them at
//! construction.  The sink is write-only from the core's perspective: its
//! absence, or anything an implementation does with the notices, must not
//! affect simulation results.  Implementations must not call back into
//! simulation objects.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{LocationId, SimTime};

/// The phase a process station is currently in.
///
/// One full cycle is `Idle → AwaitingInput → AwaitingResource → Processing →
/// AwaitingOutput → Idle`; a caught failure returns the station to `Idle`
/// after its backoff.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StationState {
    Idle,
    AwaitingInput,
    AwaitingResource,
    Processing,
    AwaitingOutput,
}

impl fmt::Display for StationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StationState::Idle => "idle",
            StationState::AwaitingInput => "awaiting-input",
            StationState::AwaitingResource => "awaiting-resource",
            StationState::Processing => "processing",
            StationState::AwaitingOutput => "awaiting-output",
        };
        f.write_str(s)
    }
}

/// Callbacks invoked by simulation components at observable moments.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimSink {
    /// A buffer's size or level changed.
    fn buffer_level_changed(&mut self, _at: SimTime, _buffer: LocationId, _level: f64) {}

    /// A batch operation (get or put) against `buffer` completed in full.
    fn batch_completed(&mut self, _at: SimTime, _buffer: LocationId, _units: usize) {}

    /// A resource pool granted a slot.  `held` is the count after the grant.
    fn token_granted(&mut self, _at: SimTime, _pool: &str, _held: usize) {}

    /// A resource pool slot was released.  `held` is the count after the
    /// release (before any same-step handover to a waiter).
    fn token_released(&mut self, _at: SimTime, _pool: &str, _held: usize) {}

    /// A station caught an interruption while suspended and will restart.
    fn interruption_caught(&mut self, _at: SimTime, _station: &str) {}

    /// A station's cycle failed with an unanticipated error and will restart.
    fn station_error(&mut self, _at: SimTime, _station: &str, _message: &str) {}

    /// A station exhausted its retry limit and will not run again.  Without
    /// this notice a sink-only observer cannot tell a stopped station from
    /// one parked awaiting input.
    fn station_stopped(&mut self, _at: SimTime, _station: &str, _failures: u32) {}

    /// A station moved to a new cycle phase.
    fn station_state_changed(&mut self, _at: SimTime, _station: &str, _state: StationState) {}
}

/// A [`SimSink`] that does nothing.
pub struct NoopSink;

impl SimSink for NoopSink {}

/// Cloneable handle to an optional shared sink.
///
/// `Sink::none()` is the safe default: every emit becomes a no-op.
#[derive(Clone, Default)]
pub struct Sink(Option<Rc<RefCell<dyn SimSink>>>);

impl Sink {
    /// Wrap a sink implementation for injection into components.
    pub fn new(sink: impl SimSink + 'static) -> Self {
        Sink(Some(Rc::new(RefCell::new(sink))))
    }

    /// Share an already-wrapped sink.
    pub fn shared(sink: Rc<RefCell<dyn SimSink>>) -> Self {
        Sink(Some(sink))
    }

    /// The absent sink.
    pub fn none() -> Self {
        Sink(None)
    }

    /// Invoke `f` on the sink if one is attached.
    #[inline]
    pub fn emit(&self, f: impl FnOnce(&mut dyn SimSink)) {
        if let Some(sink) = &self.0 {
            f(&mut *sink.borrow_mut());
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() { "Sink(attached)" } else { "Sink(none)" })
    }
}
