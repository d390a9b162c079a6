//! Cell-grid software rasterizer
//!
//! Features:
//! - Orthographic and perspective projection onto an 80x40 grid
//! - Wireframe, screen-space backface culling and flat shading
//! - Double-buffered output with per-cell change tracking

mod math;
mod types;
mod camera;
mod render;

pub use math::*;
pub use types::*;
pub use camera::*;
pub use render::*;

/// Grid dimensions in cells
pub const WIDTH: usize = 80;
pub const HEIGHT: usize = 40;
