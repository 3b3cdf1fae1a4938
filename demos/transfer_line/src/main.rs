//! A small transfer line: a producer feeds parts into a bounded staging
//! buffer every half time unit, a machining station moves them onward in
//! batches of ten, and a monitor samples buffer levels every three units.
//!
//! Run with `RUST_LOG=info` (or `debug` for per-item buffer traffic).

use anyhow::Result;
use pl_sim::{
    BatchStrategy, BufferSpec, LocationId, PartId, PartSpec, ProcessSpec, SimSink, SimTime,
    Simulation, Sink, StationState, StoreBatch,
};

const PARTS: u64 = 25;
const ARRIVAL_GAP: f64 = 0.5;
const BATCH: usize = 10;
const HORIZON: f64 = 20.0;

/// Forwards sink notices to the log facade.
struct LogSink;

impl SimSink for LogSink {
    fn buffer_level_changed(&mut self, at: SimTime, buffer: LocationId, level: f64) {
        log::debug!("{at}: buffer {buffer} level {level}");
    }

    fn batch_completed(&mut self, at: SimTime, buffer: LocationId, units: usize) {
        log::info!("{at}: batch of {units} through buffer {buffer}");
    }

    fn station_state_changed(&mut self, at: SimTime, station: &str, state: StationState) {
        log::info!("{at}: {station} -> {state}");
    }

    fn interruption_caught(&mut self, at: SimTime, station: &str) {
        log::warn!("{at}: {station} interrupted, restarting");
    }

    fn station_error(&mut self, at: SimTime, station: &str, message: &str) {
        log::error!("{at}: {station} failed: {message}");
    }

    fn station_stopped(&mut self, at: SimTime, station: &str, failures: u32) {
        log::error!("{at}: {station} stopped after {failures} consecutive failures");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut sim = Simulation::with_sink(Sink::new(LogSink));
    let staging = sim.store_buffer(
        &BufferSpec::new(LocationId(0), "staging").with_capacity(BATCH as f64),
    )?;
    let finished = sim.store_buffer(&BufferSpec::new(LocationId(1), "finished"))?;

    // Producer: one part every half unit.
    let parts: Vec<_> = (0..PARTS)
        .map(|n| sim.part(PartSpec::new(PartId(n), format!("part-{n}"))))
        .collect::<Result<_, _>>()?;
    {
        let staging = staging.clone();
        let h = sim.handle();
        sim.spawn(async move {
            for part in parts {
                if staging.put(part).await.is_err() {
                    return;
                }
                let Ok(gap) = h.timeout(SimTime(ARRIVAL_GAP)) else {
                    return;
                };
                if gap.await.is_err() {
                    return;
                }
            }
        });
    }

    sim.process_station(
        &ProcessSpec::new("machining", BATCH, SimTime(1.0)),
        BatchStrategy::from(StoreBatch::bound(staging.clone(), BATCH)?),
        BatchStrategy::from(StoreBatch::bound(finished.clone(), BATCH)?),
    )?;

    // Monitor: sample the line every three units.
    {
        let (staging, finished) = (staging.clone(), finished.clone());
        let h = sim.handle();
        sim.spawn(async move {
            loop {
                log::info!(
                    "{}: staging={} finished={}",
                    h.now(),
                    staging.len(),
                    finished.len()
                );
                match h.timeout(SimTime(3.0)) {
                    Ok(t) => {
                        if t.await.is_err() {
                            return;
                        }
                    }
                    Err(_) => return,
                }
            }
        });
    }

    sim.run_until(SimTime(HORIZON))?;

    println!(
        "t={HORIZON}: {} finished, {} staged, {} drained into a pending batch",
        finished.len(),
        staging.len(),
        PARTS as usize - finished.len() - staging.len()
    );
    Ok(())
}
