//! The simulation facade.

use std::future::Future;

use pl_batch::BatchStrategy;
use pl_buffer::{ContainerBuffer, StoreBuffer};
use pl_core::{BufferSpec, FlowResult, Part, PartSpec, ProcessSpec, SimTime, Sink};
use pl_kernel::{EventScheduler, ProcessHandle, SimHandle};
use pl_station::{ProcessStation, StationProbe};

/// Owns the scheduler and the observability sink; every component built
/// through it is wired to both.
///
/// `run_until` is the sole run entry point.  The sink is optional and
/// write-only: its absence, and anything an attached sink does with the
/// notices, must not change simulation results.
pub struct Simulation {
    sched: EventScheduler,
    sink: Sink,
}

impl Simulation {
    /// A simulation with no sink attached.
    pub fn new() -> Self {
        Self::with_sink(Sink::none())
    }

    pub fn with_sink(sink: Sink) -> Self {
        Self {
            sched: EventScheduler::new(),
            sink,
        }
    }

    /// A cloneable handle for timeouts and spawning from inside processes.
    pub fn handle(&self) -> SimHandle {
        self.sched.handle()
    }

    pub fn now(&self) -> SimTime {
        self.sched.now()
    }

    // ── Component constructors ────────────────────────────────────────────

    pub fn store_buffer(&self, spec: &BufferSpec) -> FlowResult<StoreBuffer> {
        StoreBuffer::new(self.handle(), self.sink.clone(), spec)
    }

    pub fn container_buffer(&self, spec: &BufferSpec) -> FlowResult<ContainerBuffer> {
        ContainerBuffer::new(self.handle(), self.sink.clone(), spec)
    }

    pub fn part(&self, spec: PartSpec) -> FlowResult<Part> {
        Part::new(spec)
    }

    /// Build a station from bound strategies and set its perpetual cycle
    /// running.  Returns the process handle (for interruption) and a probe
    /// tracking the cycle phase.
    pub fn process_station(
        &mut self,
        spec: &ProcessSpec,
        input: BatchStrategy,
        output: BatchStrategy,
    ) -> FlowResult<(ProcessHandle, StationProbe)> {
        let station = ProcessStation::new(self.handle(), self.sink.clone(), spec, input, output)?;
        let probe = station.probe();
        let process = station.spawn(&mut self.sched);
        Ok((process, probe))
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Register a cooperative process.
    pub fn spawn(&mut self, fut: impl Future<Output = ()> + 'static) -> ProcessHandle {
        self.sched.spawn(fut)
    }

    /// Deliver a cancellation to `process` at its next resumption.
    pub fn interrupt(&self, process: &ProcessHandle) {
        self.sched.interrupt(process);
    }

    pub fn is_active(&self, process: &ProcessHandle) -> bool {
        self.sched.is_active(process)
    }

    /// Advance simulated time, executing every wake due at or before
    /// `limit`; afterwards the clock reads exactly `limit`.
    pub fn run_until(&mut self, limit: SimTime) -> FlowResult<()> {
        log::debug!("{}: running until {limit}", self.now());
        self.sched.run_until(limit)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
