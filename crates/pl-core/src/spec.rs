//! Validated specification records.
//!
//! These are the hand-off format from the external configuration collaborator
//! to the core: plain data, checked once by `validate()` before any component
//! is built from them.  A failed validation aborts the constructing call with
//! [`FlowError::Config`] and no partial mutation.

use rustc_hash::FxHashMap;

use crate::{FlowError, FlowResult, LocationId, PartId, SimTime};

/// Key/value metadata attached to buffers and parts.  Opaque to the core.
pub type Metadata = FxHashMap<String, String>;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 50;

fn validate_name(name: &str) -> FlowResult<()> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(FlowError::Config(format!(
            "name {name:?} must be {NAME_MIN}..={NAME_MAX} characters"
        )));
    }
    Ok(())
}

// ── BufferSpec ────────────────────────────────────────────────────────────────

/// Specification for a store or container buffer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferSpec {
    pub id: LocationId,
    pub name: String,
    /// Upper bound on size/level.  `None` means unbounded.
    pub capacity: Option<f64>,
    /// Starting level.  Meaningful for container buffers only; store buffers
    /// must start empty.
    pub initial_level: f64,
    pub metadata: Metadata,
}

impl BufferSpec {
    /// A spec with the given id and name, unbounded, starting empty.
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            capacity: None,
            initial_level: 0.0,
            metadata: Metadata::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_initial_level(mut self, level: f64) -> Self {
        self.initial_level = level;
        self
    }

    pub fn validate(&self) -> FlowResult<()> {
        validate_name(&self.name)?;
        if let Some(cap) = self.capacity {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(FlowError::Config(format!(
                    "buffer {:?}: capacity must be finite and > 0, got {cap}",
                    self.name
                )));
            }
            if self.initial_level > cap {
                return Err(FlowError::Config(format!(
                    "buffer {:?}: initial level {} exceeds capacity {cap}",
                    self.name, self.initial_level
                )));
            }
        }
        if !self.initial_level.is_finite() || self.initial_level < 0.0 {
            return Err(FlowError::Config(format!(
                "buffer {:?}: initial level must be finite and >= 0, got {}",
                self.name, self.initial_level
            )));
        }
        Ok(())
    }
}

// ── PartSpec ──────────────────────────────────────────────────────────────────

/// Specification for a part.  Produced by the external part generator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartSpec {
    pub id: PartId,
    pub name: String,
    /// Locations already visited before the part enters the simulation.
    /// Usually empty.
    pub path: Vec<LocationId>,
    pub metadata: Metadata,
}

impl PartSpec {
    pub fn new(id: PartId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    pub fn validate(&self) -> FlowResult<()> {
        validate_name(&self.name)
    }
}

// ── ProcessSpec ───────────────────────────────────────────────────────────────

/// Restart policy for a process station's perpetual cycle.
///
/// The default is retry forever with a fixed one-unit pause.  That keeps a
/// misconfigured station visible in the sink stream instead of silently
/// dead, but production setups should set an explicit limit.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Simulated pause between a caught failure and the cycle restart.
    pub backoff: SimTime,
    /// Stop the station after this many *consecutive* failures.  `None`
    /// retries forever.
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: SimTime(1.0),
            max_retries: None,
        }
    }
}

/// Specification for a process station.
///
/// The input and output batch strategies are passed to the station
/// constructor as resolved values rather than stored here by reference.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessSpec {
    pub name: String,
    /// Maximum concurrent units under processing (the station's pool size).
    pub capacity: usize,
    /// Simulated duration of one processing step.  May be zero.
    pub processing_delay: SimTime,
    pub retry: RetryPolicy,
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, capacity: usize, processing_delay: SimTime) -> Self {
        Self {
            name: name.into(),
            capacity,
            processing_delay,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn validate(&self) -> FlowResult<()> {
        validate_name(&self.name)?;
        if self.capacity == 0 {
            return Err(FlowError::Config(format!(
                "station {:?}: capacity must be >= 1",
                self.name
            )));
        }
        if !self.processing_delay.is_valid_delay() {
            return Err(FlowError::Config(format!(
                "station {:?}: processing delay must be finite and >= 0, got {}",
                self.name, self.processing_delay.0
            )));
        }
        if !self.retry.backoff.is_valid_delay() {
            return Err(FlowError::Config(format!(
                "station {:?}: retry backoff must be finite and >= 0, got {}",
                self.name, self.retry.backoff.0
            )));
        }
        Ok(())
    }
}
