//! Shared scheduler state and the cloneable `SimHandle`.
//!
//! The scheduler's mutable state lives behind a single `Rc<RefCell<..>>`.
//! Components (buffers, pools, stations) hold a [`SimHandle`] clone and use
//! it to read the clock, schedule wakes, and spawn processes.  Borrows are
//! always short: no handle method holds the borrow across user code.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use pl_core::{FlowError, FlowResult, SimTime, TaskId};

use crate::timeout::Timeout;
use crate::wake::WakeHeap;

pub(crate) type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

pub(crate) struct SchedState {
    pub(crate) now: SimTime,
    pub(crate) heap: WakeHeap,
    /// The task currently being polled, if any.
    pub(crate) current: Option<TaskId>,
    /// Tasks with an undelivered interrupt.
    pub(crate) interrupted: FxHashSet<TaskId>,
    /// Tasks spawned but not yet adopted by the executor.
    pub(crate) spawned: Vec<(TaskId, LocalFuture)>,
    next_task: u64,
}

impl SchedState {
    fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            heap: WakeHeap::default(),
            current: None,
            interrupted: FxHashSet::default(),
            spawned: Vec::new(),
            next_task: 0,
        }
    }
}

/// Identifies a spawned process; the target of [`SimHandle::interrupt`].
#[derive(Copy, Clone, Debug)]
pub struct ProcessHandle {
    id: TaskId,
}

impl ProcessHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }
}

/// Cloneable handle to the scheduler, injected into every component at
/// construction.
#[derive(Clone)]
pub struct SimHandle(pub(crate) Rc<RefCell<SchedState>>);

impl SimHandle {
    pub(crate) fn new() -> Self {
        SimHandle(Rc::new(RefCell::new(SchedState::new())))
    }

    /// The current simulated time.
    pub fn now(&self) -> SimTime {
        self.0.borrow().now
    }

    /// A future that resolves `delay` simulated units from now.
    ///
    /// Fails synchronously with `InvalidDelay` for a negative or non-finite
    /// delay.  A zero delay still suspends the awaiting process for one
    /// scheduler step.
    pub fn timeout(&self, delay: SimTime) -> FlowResult<Timeout> {
        if !delay.is_valid_delay() {
            return Err(FlowError::InvalidDelay(delay.0));
        }
        let fire_at = self.now().after(delay);
        Ok(Timeout::new(self.clone(), fire_at))
    }

    /// Register a cooperative process.  It is first polled at the current
    /// simulated time, after everything already scheduled for this instant.
    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) -> ProcessHandle {
        let mut s = self.0.borrow_mut();
        let id = TaskId(s.next_task);
        s.next_task += 1;
        s.spawned.push((id, Box::pin(fut)));
        let at = s.now;
        s.heap.push(at, id);
        ProcessHandle { id }
    }

    /// Flag `process` for cancellation and schedule an immediate wake.
    ///
    /// The interrupt is delivered the next time the process would resume;
    /// side effects that already occurred stay in place.  Interrupting a
    /// finished process is a no-op.
    pub fn interrupt(&self, process: &ProcessHandle) {
        let mut s = self.0.borrow_mut();
        s.interrupted.insert(process.id);
        let at = s.now;
        s.heap.push(at, process.id);
    }

    /// Schedule `task` to resume at the current simulated time.
    ///
    /// Called by suspension-point owners (buffers, pools) when they resolve
    /// a [`Wait`][crate::Wait]; not intended for user code.
    pub fn resume(&self, task: TaskId) {
        let mut s = self.0.borrow_mut();
        let at = s.now;
        s.heap.push(at, task);
    }

    /// Consume a pending interrupt for the currently running task.
    ///
    /// Suspension handles call this at every poll so cancellation is
    /// observed at the next resumption, whatever the task was waiting on.
    pub fn check_interrupt(&self) -> FlowResult<()> {
        let mut s = self.0.borrow_mut();
        let Some(current) = s.current else {
            return Ok(());
        };
        if s.interrupted.remove(&current) {
            Err(FlowError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// The task currently being polled.  `None` outside the executor's poll.
    pub(crate) fn current(&self) -> Option<TaskId> {
        self.0.borrow().current
    }

    /// Schedule the currently running task at `at` (clamped to now).
    pub(crate) fn schedule_current_at(&self, at: SimTime) {
        let mut s = self.0.borrow_mut();
        if let Some(task) = s.current {
            let at = at.max(s.now);
            s.heap.push(at, task);
        }
    }

    /// Number of wakes still queued.  Diagnostic only.
    pub fn pending_wakes(&self) -> usize {
        self.0.borrow().heap.len()
    }
}
