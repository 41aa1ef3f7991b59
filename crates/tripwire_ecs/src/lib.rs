//! # tripwire_ecs - Entities, Scene Graph and Tick Schedule
//!
//! - Generational [`Entity`] handles that go stale once despawned
//! - A reference [`Scene`]: entity store with parent/child transforms and
//!   on-demand world pose resolution
//! - A priority-ordered per-tick [`Schedule`]
//!
//! ## Example
//!
//! ```ignore
//! use tripwire_ecs::prelude::*;
//! use tripwire_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let parent = scene.spawn_at(Vec3::new(10.0, 0.0, 0.0));
//! let child = scene.spawn_at(Vec3::new(5.0, 0.0, 0.0));
//! scene.set_parent(child, Some(parent))?;
//!
//! assert_eq!(scene.world_position(child), Vec3::new(15.0, 0.0, 0.0));
//! ```

pub mod entity;
pub mod error;
pub mod scene;
pub mod schedule;

pub mod prelude {
    pub use crate::entity::Entity;
    pub use crate::error::{Result, SceneError};
    pub use crate::scene::{LocalTransform, Scene};
    pub use crate::schedule::{priority, Schedule, SystemFn};
}

pub use prelude::*;
