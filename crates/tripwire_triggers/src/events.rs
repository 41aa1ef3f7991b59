//! Trigger events and callbacks

use serde::{Deserialize, Serialize};
use tripwire_ecs::Entity;

use crate::system::TriggerSystem;

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEventKind {
    /// Partner started overlapping the subject
    Enter,
    /// Partner stopped overlapping the subject, or one of them was removed
    Exit,
}

/// A dispatched trigger transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub kind: TriggerEventKind,
    /// Volume whose collision set changed
    pub subject: Entity,
    /// Entity that entered or left it
    pub partner: Entity,
}

impl TriggerEvent {
    pub fn enter(subject: Entity, partner: Entity) -> Self {
        Self {
            kind: TriggerEventKind::Enter,
            subject,
            partner,
        }
    }

    pub fn exit(subject: Entity, partner: Entity) -> Self {
        Self {
            kind: TriggerEventKind::Exit,
            subject,
            partner,
        }
    }

    #[inline]
    pub fn is_enter(&self) -> bool {
        self.kind == TriggerEventKind::Enter
    }

    #[inline]
    pub fn is_exit(&self) -> bool {
        self.kind == TriggerEventKind::Exit
    }
}

/// Enter/exit callback, called with the partner entity.
///
/// Callbacks get the system itself so they can change registry state
/// (remove, disable, re-mask) while events are being dispatched.
pub type TriggerCallback<W> = Box<dyn FnMut(&mut TriggerSystem<W>, Entity)>;
