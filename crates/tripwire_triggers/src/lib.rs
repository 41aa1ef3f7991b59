//! # tripwire_triggers - Layer-Filtered Trigger Volumes
//!
//! Tracks which trigger volumes overlap which others, tick by tick, and
//! reports each transition exactly once through enter/exit callbacks.
//!
//! # Features
//!
//! - Box and sphere areas anchored in an entity's local space
//! - Eight-bit layer and triggered-by masks
//! - Edge-triggered enter/exit events with a snapshot dispatch phase
//! - One-time triggers and automatic reaping of destroyed entities
//! - A built-in observer volume on the player layer
//! - Optional debug shapes for a renderer
//!
//! # Example
//!
//! ```ignore
//! use tripwire_ecs::Scene;
//! use tripwire_math::Vec3;
//! use tripwire_triggers::prelude::*;
//!
//! let mut triggers = TriggerSystem::new(Scene::new());
//! let door = triggers.world_mut().spawn_at(Vec3::new(0.0, 0.0, 4.0));
//!
//! triggers.add_trigger(door, TriggerVolume::new(LAYER_2, PLAYER_LAYER_ID)?);
//! triggers.set_on_enter(door, |_, who| log::info!("{} reached the door", who))?;
//!
//! triggers.update();
//! ```

pub mod area;
pub mod config;
pub mod debug;
pub mod error;
pub mod events;
pub mod layers;
pub mod resolver;
pub mod system;
pub mod tracker;
pub mod volume;
pub mod world;

pub mod prelude {
    pub use crate::area::TriggerArea;
    pub use crate::config::TriggerConfig;
    pub use crate::debug::{DebugColor, DebugShape, DebugShapeKind};
    pub use crate::error::{Result, TriggerError};
    pub use crate::events::{TriggerCallback, TriggerEvent, TriggerEventKind};
    pub use crate::layers::{
        IntoMask, ALL_LAYERS, LAYER_1, LAYER_2, LAYER_3, LAYER_4, LAYER_5, LAYER_6, LAYER_7,
        LAYER_8, NO_LAYERS, PLAYER_LAYER_ID,
    };
    pub use crate::resolver::resolve_world_positions;
    pub use crate::system::TriggerSystem;
    pub use crate::volume::TriggerVolume;
    pub use crate::world::{DebugRenderer, EntityStore, PoseSource, TriggerWorld};
}

pub use prelude::*;
