//! The closed strategy surface stations program against.

use pl_core::{FlowError, FlowResult};

use crate::{Batch, ContainerBatch, StoreBatch};

/// The two known batch-transfer policies.
///
/// Kept closed: the capability set is exactly `{get_batch, put_batch}`, and
/// a new policy (an assembly variant, an all-or-nothing reserving variant)
/// would be a third arm here rather than an open trait.
#[derive(Clone)]
pub enum BatchStrategy {
    Store(StoreBatch),
    Container(ContainerBatch),
}

/// A count handed to a store strategy must be a whole number of items.
fn integral(count: f64) -> FlowResult<usize> {
    if !count.is_finite() || count <= 0.0 || count.fract() != 0.0 {
        return Err(FlowError::InvalidQuantity(count));
    }
    Ok(count as usize)
}

impl BatchStrategy {
    /// Pull one batch from the bound buffer.  `count` overrides the
    /// strategy's default batch size; for the store variant it must be
    /// integral.
    pub async fn get_batch(&self, count: Option<f64>) -> FlowResult<Batch> {
        match self {
            BatchStrategy::Store(s) => {
                let count = count.map(integral).transpose()?;
                Ok(Batch::Parts(s.get_batch(count).await?))
            }
            BatchStrategy::Container(c) => Ok(Batch::Quantity(c.get_batch(count).await?)),
        }
    }

    /// Push one batch into the bound buffer.
    pub async fn put_batch(&self, batch: Batch) -> FlowResult<()> {
        match self {
            BatchStrategy::Store(s) => s.put_batch(batch).await,
            BatchStrategy::Container(c) => c.put_batch(batch).await,
        }
    }
}

impl From<StoreBatch> for BatchStrategy {
    fn from(s: StoreBatch) -> Self {
        BatchStrategy::Store(s)
    }
}

impl From<ContainerBatch> for BatchStrategy {
    fn from(c: ContainerBatch) -> Self {
        BatchStrategy::Container(c)
    }
}
