//! The pool and its grant token.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use pl_core::{FlowError, FlowResult, Sink, TokenId};
use pl_kernel::{SimHandle, Trigger, Wait};

/// Proof of a granted pool slot.
///
/// A token is minted once per grant and never reused; releasing it twice is
/// [`FlowError::DoubleRelease`].  Dropping an unreleased token leaks the slot
/// for the rest of the run, so a warning is logged.
#[derive(Debug)]
pub struct Token {
    id: TokenId,
    released: bool,
}

impl Token {
    pub fn id(&self) -> TokenId {
        self.id
    }
}

impl Drop for Token {
    fn drop(&mut self) {
        if !self.released {
            log::warn!("{} dropped without release; its slot is lost", self.id);
        }
    }
}

struct PoolInner {
    name: String,
    capacity: usize,
    held: usize,
    waiters: VecDeque<Trigger<Token>>,
    next_token: u64,
    sched: SimHandle,
    sink: Sink,
}

impl PoolInner {
    fn mint(&mut self) -> Token {
        let id = TokenId(self.next_token);
        self.next_token += 1;
        Token {
            id,
            released: false,
        }
    }

    fn emit_granted(&self) {
        let at = self.sched.now();
        let held = self.held;
        self.sink.emit(|s| s.token_granted(at, &self.name, held));
    }
}

/// A fixed-capacity counting semaphore over simulated time.
///
/// Grants are strictly FIFO: a releasing caller hands its slot to the oldest
/// waiter before any new `request` can claim it.
#[derive(Clone)]
pub struct ResourcePool {
    inner: Rc<RefCell<PoolInner>>,
}

impl std::fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ResourcePool")
            .field("name", &inner.name)
            .field("capacity", &inner.capacity)
            .field("held", &inner.held)
            .finish_non_exhaustive()
    }
}

impl ResourcePool {
    /// A pool named `name` with `capacity` slots, all free.
    ///
    /// Fails with `Config` if `capacity` is zero.
    pub fn new(
        sched: SimHandle,
        sink: Sink,
        name: impl Into<String>,
        capacity: usize,
    ) -> FlowResult<Self> {
        let name = name.into();
        if capacity == 0 {
            return Err(FlowError::Config(format!(
                "pool {name:?}: capacity must be >= 1"
            )));
        }
        Ok(Self {
            inner: Rc::new(RefCell::new(PoolInner {
                name,
                capacity,
                held: 0,
                waiters: VecDeque::new(),
                next_token: 0,
                sched,
                sink,
            })),
        })
    }

    /// Claim a slot, suspending until one is free.  Resolves to the grant
    /// token, which must eventually be passed back to [`release`][Self::release].
    pub fn request(&self) -> Wait<Token> {
        let mut p = self.inner.borrow_mut();
        if p.held < p.capacity {
            p.held += 1;
            let token = p.mint();
            log::debug!("{}: {} granted by {}", p.sched.now(), token.id, p.name);
            p.emit_granted();
            Wait::ready(&p.sched, token)
        } else {
            let (wait, trigger) = Wait::new(&p.sched);
            p.waiters.push_back(trigger);
            wait
        }
    }

    /// Return a slot.  If a request is waiting, the slot is re-granted to the
    /// oldest waiter at the current simulated time.
    pub fn release(&self, token: &mut Token) -> FlowResult<()> {
        if token.released {
            return Err(FlowError::DoubleRelease);
        }
        token.released = true;
        let mut p = self.inner.borrow_mut();
        p.held = p.held.saturating_sub(1);
        log::debug!("{}: {} released to {}", p.sched.now(), token.id, p.name);
        let at = p.sched.now();
        let held = p.held;
        p.sink.emit(|s| s.token_released(at, &p.name, held));
        if let Some(waiter) = p.waiters.pop_front() {
            p.held += 1;
            let next = p.mint();
            p.emit_granted();
            waiter.fire(next);
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn capacity(&self) -> usize {
        self.inner.borrow().capacity
    }

    /// Slots currently granted.
    pub fn held(&self) -> usize {
        self.inner.borrow().held
    }

    /// Requests currently suspended.
    pub fn waiting(&self) -> usize {
        self.inner.borrow().waiters.len()
    }
}
