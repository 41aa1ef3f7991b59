//! Error types for scene operations

use crate::entity::Entity;
use thiserror::Error;

/// Scene graph errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Entity is dead or has no transform
    #[error("Entity not found: {entity}")]
    EntityNotFound {
        /// Missing entity
        entity: Entity,
    },

    /// Parenting would create a cycle
    #[error("Parenting {child} under {parent} would create a cycle")]
    CycleDetected {
        /// Child entity
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
