//! # tripwire_math - Spatial Math for Trigger Volumes
//!
//! Small, allocation-free math primitives: vectors, rotations, poses and
//! the box/sphere overlap tests used by the trigger tracker.

pub mod bounds;
pub mod intersect;
pub mod pose;
pub mod quaternion;
pub mod vector;

pub use bounds::*;
pub use intersect::*;
pub use pose::*;
pub use quaternion::*;
pub use vector::*;

pub mod prelude {
    pub use crate::bounds::{Sphere, AABB};
    pub use crate::intersect::{aabb_aabb, aabb_sphere, sphere_sphere};
    pub use crate::pose::Pose;
    pub use crate::quaternion::Quat;
    pub use crate::vector::Vec3;
}
