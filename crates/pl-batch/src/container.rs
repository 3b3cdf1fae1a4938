//! Batch transfers against a container buffer.

use pl_buffer::ContainerBuffer;
use pl_core::{FlowError, FlowResult};

use crate::Batch;

/// Moves quantities in batches through one [`ContainerBuffer`].
///
/// The underlying buffer operation is already atomic in the requested
/// quantity, so no join barrier is needed and there is no partial-drain
/// hazard.
#[derive(Clone)]
pub struct ContainerBatch {
    buffer: Option<ContainerBuffer>,
    batch_size: f64,
}

fn validate_size(q: f64) -> FlowResult<()> {
    if !q.is_finite() || q <= 0.0 {
        return Err(FlowError::InvalidQuantity(q));
    }
    Ok(())
}

impl ContainerBatch {
    /// A strategy bound to `buffer` with the given default batch quantity.
    pub fn bound(buffer: ContainerBuffer, batch_size: f64) -> FlowResult<Self> {
        validate_size(batch_size)?;
        Ok(Self {
            buffer: Some(buffer),
            batch_size,
        })
    }

    /// A strategy with no buffer yet; must be [`bind`][Self::bind]ed before use.
    pub fn unbound(batch_size: f64) -> FlowResult<Self> {
        validate_size(batch_size)?;
        Ok(Self {
            buffer: None,
            batch_size,
        })
    }

    /// Attach the buffer.  Strategies bind exactly once; rebinding is a
    /// `Config` error.
    pub fn bind(&mut self, buffer: ContainerBuffer) -> FlowResult<()> {
        if self.buffer.is_some() {
            return Err(FlowError::Config(
                "container strategy is already bound to a buffer".into(),
            ));
        }
        self.buffer = Some(buffer);
        Ok(())
    }

    fn buffer(&self) -> FlowResult<&ContainerBuffer> {
        self.buffer.as_ref().ok_or(FlowError::UnboundBuffer)
    }

    pub fn batch_size(&self) -> f64 {
        self.batch_size
    }

    /// Take `amount` (default: the batch quantity) in one atomic step.
    pub async fn get_batch(&self, amount: Option<f64>) -> FlowResult<f64> {
        let buf = self.buffer()?;
        let amount = amount.unwrap_or(self.batch_size);
        let taken = buf.get(amount)?.await?;
        buf.note_batch(taken.ceil() as usize);
        Ok(taken)
    }

    /// Deposit the batch in one atomic step.  A parts batch reduces to its
    /// length; a quantity is used directly.  An empty batch completes
    /// immediately without touching the buffer.
    pub async fn put_batch(&self, batch: impl Into<Batch>) -> FlowResult<()> {
        let buf = self.buffer()?;
        let amount = match batch.into() {
            Batch::Quantity(q) => q,
            Batch::Parts(items) => items.len() as f64,
        };
        if amount == 0.0 {
            return Ok(());
        }
        buf.put(amount)?.await?;
        buf.note_batch(amount.ceil() as usize);
        Ok(())
    }
}
