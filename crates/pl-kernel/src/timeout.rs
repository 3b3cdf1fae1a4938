//! Simulated-delay future.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pl_core::{FlowResult, SimTime};

use crate::handle::SimHandle;

/// Resolves once the simulated clock reaches `fire_at`.
///
/// Created via [`SimHandle::timeout`]; the target instant is fixed at
/// creation.  The wake is armed at the first poll, so even a zero delay
/// suspends the awaiting process for exactly one scheduler step.  Must be
/// awaited promptly from inside a spawned process.
pub struct Timeout {
    sched: SimHandle,
    fire_at: SimTime,
    armed: bool,
}

impl Timeout {
    pub(crate) fn new(sched: SimHandle, fire_at: SimTime) -> Self {
        Self {
            sched,
            fire_at,
            armed: false,
        }
    }

    /// The instant this timeout resolves at.
    pub fn fire_at(&self) -> SimTime {
        self.fire_at
    }
}

impl Future for Timeout {
    type Output = FlowResult<()>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Err(e) = this.sched.check_interrupt() {
            return Poll::Ready(Err(e));
        }
        if !this.armed {
            this.armed = true;
            this.sched.schedule_current_at(this.fire_at);
            return Poll::Pending;
        }
        if this.sched.now() >= this.fire_at {
            Poll::Ready(Ok(()))
        } else {
            Poll::Pending
        }
    }
}
