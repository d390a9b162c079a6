//! World module - the mesh being drawn and the scene it starts from
//!
//! - Cuboid with fixed topology and in-place rotation
//! - RON scene files describing camera, light and canvas setup

mod geometry;
mod scene;

pub use geometry::*;
pub use scene::*;
