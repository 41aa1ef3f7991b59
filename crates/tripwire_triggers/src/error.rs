//! Error types for the trigger system

use thiserror::Error;
use tripwire_ecs::Entity;

/// Trigger system errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    /// Malformed argument, e.g. a mask outside `0..=255`
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity has no registered trigger volume
    #[error("Entity {0} has no registered trigger volume")]
    UnregisteredEntity(Entity),
}

/// Result type for trigger operations
pub type Result<T> = std::result::Result<T, TriggerError>;
