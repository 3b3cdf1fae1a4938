//! The unit of work flowing through buffers and stations.

use std::fmt;

use crate::spec::Metadata;
use crate::{FlowResult, LocationId, PartId, PartSpec};

/// A discrete part.
///
/// Immutable after construction except for [`visit`][Part::visit], which
/// appends to the path.  Path appends are owned by whichever component
/// currently holds the part — buffers record an arrival when a part is
/// admitted.  The core never destroys a part; it is simply moved out to the
/// caller that consumed it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    id: PartId,
    name: String,
    path: Vec<LocationId>,
    metadata: Metadata,
}

impl Part {
    /// Build a part from a validated spec.
    pub fn new(spec: PartSpec) -> FlowResult<Self> {
        spec.validate()?;
        Ok(Self {
            id: spec.id,
            name: spec.name,
            path: spec.path,
            metadata: spec.metadata,
        })
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered sequence of locations visited, oldest first.  Append-only,
    /// never reordered.
    pub fn path(&self) -> &[LocationId] {
        &self.path
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Record arrival at a location.  Called by the component admitting the
    /// part; not intended for user code.
    pub fn visit(&mut self, location: LocationId) {
        self.path.push(location);
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
