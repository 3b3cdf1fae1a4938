//! `Wait`/`Trigger` — the explicit awaited handle behind every buffer and
//! resource suspension point.
//!
//! A component that may need to suspend a caller creates a pair: the caller
//! awaits the [`Wait`]; the component keeps the [`Trigger`] in its pending
//! queue and fires it when the operation can complete.  Firing fills the
//! shared slot and schedules the owning task to resume at the current
//! simulated time.
//!
//! The owning task is bound lazily, at the first poll — a `Wait` may be
//! created (and even resolved) before the caller first awaits it, which is
//! exactly what happens when an operation completes immediately.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use pl_core::{FlowResult, TaskId};

use crate::handle::SimHandle;

struct Shared<T> {
    value: RefCell<Option<T>>,
    waiting: Cell<Option<TaskId>>,
}

/// A pending operation's awaitable side.
///
/// Resolves to `Ok(value)` when the owning component fires the paired
/// [`Trigger`], or to `Err(FlowError::Interrupted)` if the awaiting process
/// is cancelled first.  Must be awaited from inside a spawned process.
pub struct Wait<T> {
    sched: SimHandle,
    shared: Rc<Shared<T>>,
}

impl<T> std::fmt::Debug for Wait<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wait")
            .field("resolved", &self.shared.value.borrow().is_some())
            .finish_non_exhaustive()
    }
}

/// A pending operation's resolution side, held by the component that will
/// complete it.
pub struct Trigger<T> {
    sched: SimHandle,
    shared: Rc<Shared<T>>,
}

impl<T> Wait<T> {
    /// A suspended pair: the `Wait` stays pending until the `Trigger` fires.
    pub fn new(sched: &SimHandle) -> (Wait<T>, Trigger<T>) {
        let shared = Rc::new(Shared {
            value: RefCell::new(None),
            waiting: Cell::new(None),
        });
        (
            Wait {
                sched: sched.clone(),
                shared: shared.clone(),
            },
            Trigger {
                sched: sched.clone(),
                shared,
            },
        )
    }

    /// An already-resolved `Wait`: the operation completed at issue time.
    pub fn ready(sched: &SimHandle, value: T) -> Wait<T> {
        Wait {
            sched: sched.clone(),
            shared: Rc::new(Shared {
                value: RefCell::new(Some(value)),
                waiting: Cell::new(None),
            }),
        }
    }
}

impl<T> Trigger<T> {
    /// Complete the operation.  If a task is suspended on the paired `Wait`,
    /// it is scheduled to resume at the current simulated time.
    pub fn fire(self, value: T) {
        *self.shared.value.borrow_mut() = Some(value);
        if let Some(task) = self.shared.waiting.get() {
            self.sched.resume(task);
        }
    }
}

impl<T> Future for Wait<T> {
    type Output = FlowResult<T>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Err(e) = this.sched.check_interrupt() {
            return Poll::Ready(Err(e));
        }
        if let Some(value) = this.shared.value.borrow_mut().take() {
            return Poll::Ready(Ok(value));
        }
        this.shared.waiting.set(this.sched.current());
        Poll::Pending
    }
}
