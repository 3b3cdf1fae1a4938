//! The station state machine.

use std::cell::Cell;
use std::rc::Rc;

use pl_batch::BatchStrategy;
use pl_core::{FlowError, FlowResult, ProcessSpec, RetryPolicy, SimTime, Sink, StationState};
use pl_kernel::{EventScheduler, ProcessHandle, SimHandle, join_all};
use pl_resource::ResourcePool;

/// Read-only view of a running station's current cycle phase.
///
/// Stays valid after the station itself has been consumed by
/// [`ProcessStation::spawn`].
#[derive(Clone)]
pub struct StationProbe {
    state: Rc<Cell<StationState>>,
}

impl StationProbe {
    pub fn state(&self) -> StationState {
        self.state.get()
    }
}

/// A perpetual processing cycle over one input and one output strategy.
///
/// Each pass: `Idle → AwaitingInput → AwaitingResource → Processing →
/// AwaitingOutput → Idle`.  An interruption or unexpected failure caught
/// mid-cycle is absorbed at this boundary: the station reports it through
/// the sink, pauses for the policy's backoff, and restarts from `Idle`.  No
/// rollback is attempted — inputs already consumed and tokens already held
/// are abandoned.  With `max_retries: None` the cycle runs until the
/// scheduler itself stops.
pub struct ProcessStation {
    name: String,
    processing_delay: SimTime,
    retry: RetryPolicy,
    pool: ResourcePool,
    input: BatchStrategy,
    output: BatchStrategy,
    sched: SimHandle,
    sink: Sink,
    state: Rc<Cell<StationState>>,
}

impl ProcessStation {
    /// Build from a validated spec.  The station owns a fresh pool with
    /// `spec.capacity` slots; `input` and `output` must already be bound.
    pub fn new(
        sched: SimHandle,
        sink: Sink,
        spec: &ProcessSpec,
        input: BatchStrategy,
        output: BatchStrategy,
    ) -> FlowResult<Self> {
        spec.validate()?;
        let pool = ResourcePool::new(
            sched.clone(),
            sink.clone(),
            format!("{}-pool", spec.name),
            spec.capacity,
        )?;
        Ok(Self {
            name: spec.name.clone(),
            processing_delay: spec.processing_delay,
            retry: spec.retry.clone(),
            pool,
            input,
            output,
            sched,
            sink,
            state: Rc::new(Cell::new(StationState::Idle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The station's resource pool, shared for inspection.
    pub fn pool(&self) -> ResourcePool {
        self.pool.clone()
    }

    /// A probe that keeps tracking the cycle phase after spawn.
    pub fn probe(&self) -> StationProbe {
        StationProbe {
            state: self.state.clone(),
        }
    }

    /// Consume the station and register its perpetual cycle with the
    /// scheduler.
    pub fn spawn(self, sched: &mut EventScheduler) -> ProcessHandle {
        sched.spawn(self.run())
    }

    async fn run(self) {
        let mut failures: u32 = 0;
        'cycles: loop {
            match self.cycle().await {
                Ok(()) => failures = 0,
                Err(err) => {
                    failures += 1;
                    self.note_failure(&err);
                    self.set_state(StationState::Idle);
                    if self.exhausted(failures) {
                        break;
                    }
                    // An interruption landing during the backoff itself is a
                    // further failure against the same consecutive count, and
                    // is reported the same way.
                    while let Err(err) = self.pause().await {
                        self.note_failure(&err);
                        failures += 1;
                        if self.exhausted(failures) {
                            break 'cycles;
                        }
                    }
                }
            }
        }
        let at = self.sched.now();
        log::error!("{at}: station {} stopped after {failures} consecutive failures", self.name);
        self.sink.emit(|s| s.station_stopped(at, &self.name, failures));
    }

    /// One full pass of the state machine.
    async fn cycle(&self) -> FlowResult<()> {
        self.set_state(StationState::AwaitingInput);
        let batch = self.input.get_batch(None).await?;

        self.set_state(StationState::AwaitingResource);
        let requests: Vec<_> = (0..batch.units()).map(|_| self.pool.request()).collect();
        let mut tokens = join_all(requests).await?;

        self.set_state(StationState::Processing);
        self.sched.timeout(self.processing_delay)?.await?;

        self.set_state(StationState::AwaitingOutput);
        self.output.put_batch(batch).await?;

        for token in &mut tokens {
            self.pool.release(token)?;
        }
        self.set_state(StationState::Idle);
        Ok(())
    }

    async fn pause(&self) -> FlowResult<()> {
        self.sched.timeout(self.retry.backoff)?.await
    }

    fn exhausted(&self, failures: u32) -> bool {
        self.retry.max_retries.is_some_and(|max| failures > max)
    }

    fn set_state(&self, state: StationState) {
        self.state.set(state);
        let at = self.sched.now();
        self.sink
            .emit(|s| s.station_state_changed(at, &self.name, state));
    }

    fn note_failure(&self, err: &FlowError) {
        let at = self.sched.now();
        match err {
            FlowError::Interrupted => {
                log::warn!("{at}: station {} interrupted, restarting", self.name);
                self.sink.emit(|s| s.interruption_caught(at, &self.name));
            }
            other => {
                log::error!("{at}: station {} cycle failed: {other}", self.name);
                let message = other.to_string();
                self.sink
                    .emit(|s| s.station_error(at, &self.name, &message));
            }
        }
    }
}
