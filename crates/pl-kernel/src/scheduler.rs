//! The executor: owns the task table and drives the run loop.

use std::future::Future;
use std::task::{Context, Waker};

use rustc_hash::FxHashMap;

use pl_core::{FlowError, FlowResult, SimTime, TaskId};

use crate::handle::{LocalFuture, ProcessHandle, SimHandle};

/// Maintains simulated time and a time-ordered queue of pending resumptions;
/// the execution substrate for everything else.
///
/// Tasks are polled with a no-op waker: all wakes flow through the kernel's
/// own `(time, sequence)` queue, so execution order is fully determined by
/// scheduling order.  A wake for a task that has already finished is ignored.
pub struct EventScheduler {
    handle: SimHandle,
    tasks: FxHashMap<TaskId, LocalFuture>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self {
            handle: SimHandle::new(),
            tasks: FxHashMap::default(),
        }
    }

    /// A cloneable handle for constructing components and spawning from
    /// inside running processes.
    pub fn handle(&self) -> SimHandle {
        self.handle.clone()
    }

    /// The current simulated time.
    pub fn now(&self) -> SimTime {
        self.handle.now()
    }

    /// Register a cooperative process; see [`SimHandle::spawn`].
    pub fn spawn(&mut self, fut: impl Future<Output = ()> + 'static) -> ProcessHandle {
        let process = self.handle.spawn(fut);
        self.adopt_spawned();
        process
    }

    /// Deliver a cancellation to `process` at its next resumption.
    pub fn interrupt(&self, process: &ProcessHandle) {
        self.handle.interrupt(process);
    }

    /// Whether `process` has been spawned and has not yet run to completion.
    pub fn is_active(&self, process: &ProcessHandle) -> bool {
        self.tasks.contains_key(&process.id())
            || self
                .handle
                .0
                .borrow()
                .spawned
                .iter()
                .any(|(id, _)| *id == process.id())
    }

    /// Drain and execute wakes in non-decreasing `(time, sequence)` order
    /// until the next wake would exceed `limit`; afterwards the clock reads
    /// exactly `limit`.
    ///
    /// Wakes scheduled for `limit` itself do run.  A `limit` in the past is
    /// `InvalidDelay`.
    pub fn run_until(&mut self, limit: SimTime) -> FlowResult<()> {
        if limit < self.now() {
            return Err(FlowError::InvalidDelay(limit.0));
        }
        loop {
            self.adopt_spawned();
            let popped = {
                let mut s = self.handle.0.borrow_mut();
                match s.heap.pop_within(limit) {
                    Some((at, task)) => {
                        s.now = at;
                        s.current = Some(task);
                        Some((at, task))
                    }
                    None => None,
                }
            };
            let Some((at, task)) = popped else { break };
            if let Some(fut) = self.tasks.get_mut(&task) {
                log::trace!("{at}: waking {task}");
                let mut cx = Context::from_waker(Waker::noop());
                if fut.as_mut().poll(&mut cx).is_ready() {
                    self.tasks.remove(&task);
                    // A flag that was never delivered dies with the task.
                    self.handle.0.borrow_mut().interrupted.remove(&task);
                }
            }
            self.handle.0.borrow_mut().current = None;
        }
        let mut s = self.handle.0.borrow_mut();
        if limit > s.now {
            s.now = limit;
        }
        s.current = None;
        Ok(())
    }

    fn adopt_spawned(&mut self) {
        let spawned = std::mem::take(&mut self.handle.0.borrow_mut().spawned);
        for (id, fut) in spawned {
            self.tasks.insert(id, fut);
        }
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
