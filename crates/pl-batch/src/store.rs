//! Batch transfers against a store buffer.

use pl_buffer::StoreBuffer;
use pl_core::{FlowError, FlowResult, Part};
use pl_kernel::join_all;

use crate::Batch;

/// Moves discrete parts in batches through one [`StoreBuffer`].
///
/// Each batch issues its single-item operations concurrently and suspends on
/// a join barrier until every one has resolved.  The barrier is not atomic:
/// each sub-`get` removes its item as soon as it individually resolves, so a
/// partially satisfied batch has already drained items from the buffer.  If
/// the calling process is cancelled while the join is outstanding, those
/// items are stranded with no caller — they are not returned to the buffer.
#[derive(Clone)]
pub struct StoreBatch {
    buffer: Option<StoreBuffer>,
    batch_size: usize,
}

fn validate_size(n: usize) -> FlowResult<()> {
    if n == 0 {
        return Err(FlowError::InvalidQuantity(0.0));
    }
    Ok(())
}

impl StoreBatch {
    /// A strategy bound to `buffer` with the given default batch size.
    pub fn bound(buffer: StoreBuffer, batch_size: usize) -> FlowResult<Self> {
        validate_size(batch_size)?;
        Ok(Self {
            buffer: Some(buffer),
            batch_size,
        })
    }

    /// A strategy with no buffer yet; must be [`bind`][Self::bind]ed before use.
    pub fn unbound(batch_size: usize) -> FlowResult<Self> {
        validate_size(batch_size)?;
        Ok(Self {
            buffer: None,
            batch_size,
        })
    }

    /// Attach the buffer.  Strategies bind exactly once; rebinding is a
    /// `Config` error.
    pub fn bind(&mut self, buffer: StoreBuffer) -> FlowResult<()> {
        if self.buffer.is_some() {
            return Err(FlowError::Config(
                "store strategy is already bound to a buffer".into(),
            ));
        }
        self.buffer = Some(buffer);
        Ok(())
    }

    fn buffer(&self) -> FlowResult<&StoreBuffer> {
        self.buffer.as_ref().ok_or(FlowError::UnboundBuffer)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Take `count` parts (default: the batch size), in issue order.
    ///
    /// All `count` gets are issued before the barrier is awaited, so they
    /// claim positions in the buffer's pending-get list back to back.
    pub async fn get_batch(&self, count: Option<usize>) -> FlowResult<Vec<Part>> {
        let buf = self.buffer()?;
        let count = count.unwrap_or(self.batch_size);
        validate_size(count)?;
        let waits: Vec<_> = (0..count).map(|_| buf.get()).collect();
        let parts = join_all(waits).await?;
        log::debug!("batch of {} taken from {}", parts.len(), buf.name());
        buf.note_batch(parts.len());
        Ok(parts)
    }

    /// Store every part of the batch, one `put` per item, joined the same
    /// way as [`get_batch`][Self::get_batch].  An empty batch completes
    /// immediately without touching the buffer.
    pub async fn put_batch(&self, batch: impl Into<Batch>) -> FlowResult<()> {
        let buf = self.buffer()?;
        let items = match batch.into() {
            Batch::Parts(items) => items,
            Batch::Quantity(q) => {
                return Err(FlowError::Config(format!(
                    "store strategy cannot put a bare quantity ({q})"
                )));
            }
        };
        if items.is_empty() {
            return Ok(());
        }
        let units = items.len();
        let waits: Vec<_> = items.into_iter().map(|item| buf.put(item)).collect();
        join_all(waits).await?;
        log::debug!("batch of {units} placed into {}", buf.name());
        buf.note_batch(units);
        Ok(())
    }
}
