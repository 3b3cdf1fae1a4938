//! The join barrier.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pl_core::FlowResult;

/// Await a fixed set of concurrently issued operations; resolve only once
/// every one of them has resolved.
///
/// Results come back in **issue order** (the order of `children`), not
/// resolution order, and the barrier fires at the simulated time of the last
/// child's resolution.  The first child to fail short-circuits the barrier:
/// values already produced by other children are dropped on the spot, which
/// is how a cancelled batch strands items it had already drained.
pub fn join_all<F, T>(children: Vec<F>) -> JoinAll<F, T>
where
    F: Future<Output = FlowResult<T>> + Unpin,
    T: Unpin,
{
    JoinAll {
        slots: children.into_iter().map(Slot::Running).collect(),
    }
}

enum Slot<F, T> {
    Running(F),
    Done(T),
}

/// Future returned by [`join_all`].
pub struct JoinAll<F, T> {
    slots: Vec<Slot<F, T>>,
}

impl<F, T> Future for JoinAll<F, T>
where
    F: Future<Output = FlowResult<T>> + Unpin,
    T: Unpin,
{
    type Output = FlowResult<Vec<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut pending = 0usize;
        for slot in this.slots.iter_mut() {
            if let Slot::Running(fut) = slot {
                match Pin::new(fut).poll(cx) {
                    Poll::Ready(Ok(value)) => *slot = Slot::Done(value),
                    Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                    Poll::Pending => pending += 1,
                }
            }
        }
        if pending > 0 {
            return Poll::Pending;
        }
        let values = std::mem::take(&mut this.slots)
            .into_iter()
            .map(|slot| match slot {
                Slot::Done(value) => value,
                Slot::Running(_) => unreachable!("no slot can still be running"),
            })
            .collect();
        Poll::Ready(Ok(values))
    }
}
