//! Entity handles
//!
//! An [`Entity`] names a scene slot together with the generation that slot
//! had when the handle was issued. Despawning bumps the slot's generation,
//! so a stale handle never resolves to whatever reuses the slot later.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Handle to a scene entity
///
/// Ordered by slot first, so entities spawned earlier sort first until
/// slots start being recycled.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    slot: u32,
    generation: u32,
}

impl Entity {
    #[inline]
    pub(crate) const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Storage slot in the owning scene
    #[inline]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// How many times the slot had been vacated when this handle was issued
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.slot)?;
        if self.generation > 0 {
            write!(f, "/{}", self.generation)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self)
    }
}
