//! The value a batch operation moves: discrete parts or a bare quantity.

use pl_core::Part;

/// What a batch transfer carries.
///
/// Store strategies produce and consume [`Batch::Parts`]; container
/// strategies work in [`Batch::Quantity`].  Either kind can be handed to a
/// container strategy (a parts batch reduces to its length); a store
/// strategy cannot absorb a bare quantity.
#[derive(Debug)]
pub enum Batch {
    Parts(Vec<Part>),
    Quantity(f64),
}

impl Batch {
    /// The number of discrete units in the batch.  A fractional quantity
    /// counts as a full unit.
    pub fn units(&self) -> usize {
        match self {
            Batch::Parts(items) => items.len(),
            Batch::Quantity(q) => q.ceil() as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units() == 0
    }
}

impl From<Part> for Batch {
    fn from(part: Part) -> Self {
        Batch::Parts(vec![part])
    }
}

impl From<Vec<Part>> for Batch {
    fn from(items: Vec<Part>) -> Self {
        Batch::Parts(items)
    }
}

impl From<f64> for Batch {
    fn from(quantity: f64) -> Self {
        Batch::Quantity(quantity)
    }
}
