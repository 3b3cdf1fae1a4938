//! Numeric-level buffer, atomic in the requested quantity.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use pl_core::{BufferSpec, FlowError, FlowResult, LocationId, Sink};
use pl_kernel::{SimHandle, Trigger, Wait};

struct PendingGet {
    amount: f64,
    trigger: Trigger<f64>,
}

struct PendingPut {
    amount: f64,
    trigger: Trigger<()>,
}

struct ContainerInner {
    id: LocationId,
    name: String,
    capacity: Option<f64>,
    level: f64,
    pending_gets: VecDeque<PendingGet>,
    pending_puts: VecDeque<PendingPut>,
    sched: SimHandle,
    sink: Sink,
}

impl ContainerInner {
    fn room_for(&self, amount: f64) -> bool {
        self.capacity.is_none_or(|cap| cap - self.level >= amount)
    }

    fn emit_level(&self) {
        let at = self.sched.now();
        let (id, level) = (self.id, self.level);
        self.sink.emit(|s| s.buffer_level_changed(at, id, level));
    }

    /// Serve pending operations until no further progress is possible.
    ///
    /// Strict FIFO per list: the front request blocks everything behind it
    /// even if a later, smaller request could be satisfied.  Serving one list
    /// may unblock the other, so the loop alternates until fixpoint.
    fn settle(&mut self) {
        loop {
            if self
                .pending_gets
                .front()
                .is_some_and(|g| g.amount <= self.level)
            {
                if let Some(get) = self.pending_gets.pop_front() {
                    self.level -= get.amount;
                    self.emit_level();
                    get.trigger.fire(get.amount);
                    continue;
                }
            }
            if self
                .pending_puts
                .front()
                .is_some_and(|p| self.room_for(p.amount))
            {
                if let Some(put) = self.pending_puts.pop_front() {
                    self.level += put.amount;
                    self.emit_level();
                    put.trigger.fire(());
                    continue;
                }
            }
            break;
        }
    }
}

fn validate_amount(amount: f64) -> FlowResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FlowError::InvalidQuantity(amount));
    }
    Ok(())
}

/// A numeric level with an optional upper-bound capacity.
///
/// Unlike [`StoreBuffer`][crate::StoreBuffer], each operation is a single
/// indivisible step with respect to the quantity requested: a `get(n)`
/// decrements the level by `n` all at once or not at all — no partial
/// grants.
#[derive(Clone)]
pub struct ContainerBuffer {
    inner: Rc<RefCell<ContainerInner>>,
}

impl std::fmt::Debug for ContainerBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ContainerBuffer")
            .field("name", &inner.name)
            .field("capacity", &inner.capacity)
            .field("level", &inner.level)
            .finish_non_exhaustive()
    }
}

impl ContainerBuffer {
    pub fn new(sched: SimHandle, sink: Sink, spec: &BufferSpec) -> FlowResult<Self> {
        spec.validate()?;
        Ok(Self {
            inner: Rc::new(RefCell::new(ContainerInner {
                id: spec.id,
                name: spec.name.clone(),
                capacity: spec.capacity,
                level: spec.initial_level,
                pending_gets: VecDeque::new(),
                pending_puts: VecDeque::new(),
                sched,
                sink,
            })),
        })
    }

    /// Atomically take `amount` from the level, suspending until
    /// `level >= amount`.  Resolves to the amount taken.
    ///
    /// Fails synchronously with `InvalidQuantity` unless `amount` is finite
    /// and `> 0`.
    pub fn get(&self, amount: f64) -> FlowResult<Wait<f64>> {
        validate_amount(amount)?;
        let mut b = self.inner.borrow_mut();
        if b.pending_gets.is_empty() && b.level >= amount {
            b.level -= amount;
            log::debug!("{}: {amount} taken from {}", b.sched.now(), b.name);
            b.emit_level();
            b.settle();
            Ok(Wait::ready(&b.sched, amount))
        } else {
            let (wait, trigger) = Wait::new(&b.sched);
            b.pending_gets.push_back(PendingGet { amount, trigger });
            Ok(wait)
        }
    }

    /// Atomically add `amount` to the level, suspending until
    /// `capacity - level >= amount`.
    ///
    /// Fails synchronously with `InvalidQuantity` unless `amount` is finite
    /// and `> 0`.
    pub fn put(&self, amount: f64) -> FlowResult<Wait<()>> {
        validate_amount(amount)?;
        let mut b = self.inner.borrow_mut();
        if b.pending_puts.is_empty() && b.room_for(amount) {
            b.level += amount;
            log::debug!("{}: {amount} placed into {}", b.sched.now(), b.name);
            b.emit_level();
            b.settle();
            Ok(Wait::ready(&b.sched, ()))
        } else {
            let (wait, trigger) = Wait::new(&b.sched);
            b.pending_puts.push_back(PendingPut { amount, trigger });
            Ok(wait)
        }
    }

    /// Emit a batch-completion notice against this buffer.  Called by batch
    /// strategies; not intended for user code.
    pub fn note_batch(&self, units: usize) {
        let b = self.inner.borrow();
        let at = b.sched.now();
        let id = b.id;
        b.sink.emit(|s| s.batch_completed(at, id, units));
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> LocationId {
        self.inner.borrow().id
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn capacity(&self) -> Option<f64> {
        self.inner.borrow().capacity
    }

    /// Current level.
    pub fn level(&self) -> f64 {
        self.inner.borrow().level
    }

    /// Number of suspended `get` requests.
    pub fn waiting_gets(&self) -> usize {
        self.inner.borrow().pending_gets.len()
    }

    /// Number of suspended `put` requests.
    pub fn waiting_puts(&self) -> usize {
        self.inner.borrow().pending_puts.len()
    }
}
