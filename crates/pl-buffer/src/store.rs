//! FIFO object buffer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use pl_core::{BufferSpec, FlowError, FlowResult, LocationId, Part, PartId, Sink};
use pl_kernel::{SimHandle, Trigger, Wait};

struct PendingPut {
    item: Part,
    trigger: Trigger<()>,
}

struct StoreInner {
    id: LocationId,
    name: String,
    capacity: Option<usize>,
    items: VecDeque<Part>,
    pending_gets: VecDeque<Trigger<Part>>,
    pending_puts: VecDeque<PendingPut>,
    sched: SimHandle,
    sink: Sink,
}

impl StoreInner {
    fn has_room(&self) -> bool {
        self.capacity.is_none_or(|cap| self.items.len() < cap)
    }

    /// Record arrival and append.  The level-change notice is emitted by the
    /// caller, which knows whether the item only passed through.
    fn admit(&mut self, mut item: Part) {
        item.visit(self.id);
        self.items.push_back(item);
    }

    fn emit_level(&self) {
        let at = self.sched.now();
        let (id, level) = (self.id, self.items.len() as f64);
        self.sink.emit(|s| s.buffer_level_changed(at, id, level));
    }
}

/// An ordered queue of [`Part`]s with an optional upper-bound capacity.
///
/// `get` and `put` complete immediately when they can; otherwise the caller
/// suspends in a FIFO pending list.  Each operation resolves independently of
/// any other concurrently pending operation — there is no cross-operation
/// atomicity at this layer.
///
/// The buffer appends its [`LocationId`] to a part's path when the part is
/// admitted (including a direct hand-off to a waiting getter).
#[derive(Clone)]
pub struct StoreBuffer {
    inner: Rc<RefCell<StoreInner>>,
}

impl std::fmt::Debug for StoreBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StoreBuffer")
            .field("name", &inner.name)
            .field("capacity", &inner.capacity)
            .field("len", &inner.items.len())
            .finish_non_exhaustive()
    }
}

impl StoreBuffer {
    /// Build from a validated spec.  Store capacities must be whole numbers
    /// and store buffers start empty; `initial_level` is a container concept.
    pub fn new(sched: SimHandle, sink: Sink, spec: &BufferSpec) -> FlowResult<Self> {
        spec.validate()?;
        let capacity = match spec.capacity {
            Some(cap) if cap.fract() != 0.0 => {
                return Err(FlowError::Config(format!(
                    "store buffer {:?}: capacity must be a whole number, got {cap}",
                    spec.name
                )));
            }
            Some(cap) => Some(cap as usize),
            None => None,
        };
        if spec.initial_level != 0.0 {
            return Err(FlowError::Config(format!(
                "store buffer {:?}: must start empty (initial level {})",
                spec.name, spec.initial_level
            )));
        }
        Ok(Self {
            inner: Rc::new(RefCell::new(StoreInner {
                id: spec.id,
                name: spec.name.clone(),
                capacity,
                items: VecDeque::new(),
                pending_gets: VecDeque::new(),
                pending_puts: VecDeque::new(),
                sched,
                sink,
            })),
        })
    }

    /// Remove and return the oldest item.
    ///
    /// Completes at the current simulated time if an item is available;
    /// otherwise suspends until a matching `put` arrives.  Pending gets are
    /// served strictly in the order they were issued.
    pub fn get(&self) -> Wait<Part> {
        let mut b = self.inner.borrow_mut();
        if let Some(part) = b.items.pop_front() {
            // The freed slot admits the oldest pending put in the same step.
            if let Some(pending) = b.pending_puts.pop_front() {
                b.admit(pending.item);
                pending.trigger.fire(());
            }
            b.emit_level();
            log::debug!("{}: {} taken from {}", b.sched.now(), part, b.name);
            Wait::ready(&b.sched, part)
        } else {
            let (wait, trigger) = Wait::new(&b.sched);
            b.pending_gets.push_back(trigger);
            wait
        }
    }

    /// Append an item.
    ///
    /// Completes at the current simulated time while below capacity (or when
    /// a getter is already waiting, in which case the item passes straight
    /// through); otherwise suspends until a `get` frees capacity.  Pending
    /// puts are served strictly FIFO.
    pub fn put(&self, item: Part) -> Wait<()> {
        let mut b = self.inner.borrow_mut();
        if let Some(getter) = b.pending_gets.pop_front() {
            let mut item = item;
            item.visit(b.id);
            log::debug!("{}: {} handed through {}", b.sched.now(), item, b.name);
            getter.fire(item);
            Wait::ready(&b.sched, ())
        } else if b.has_room() {
            log::debug!("{}: {} placed into {}", b.sched.now(), item, b.name);
            b.admit(item);
            b.emit_level();
            Wait::ready(&b.sched, ())
        } else {
            let (wait, trigger) = Wait::new(&b.sched);
            b.pending_puts.push_back(PendingPut { item, trigger });
            wait
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

    pub fn capacity(&self) -> Option<usize> {
        self.inner.borrow().capacity
    }

    /// Current number of stored items.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the stored items, oldest first.
    pub fn part_ids(&self) -> Vec<PartId> {
        self.inner.borrow().items.iter().map(Part::id).collect()
    }

    /// Number of suspended getters.
    pub fn waiting_gets(&self) -> usize {
        self.inner.borrow().pending_gets.len()
    }

    /// Number of suspended putters.
    pub fn waiting_puts(&self) -> usize {
        self.inner.borrow().pending_puts.len()
    }
}
