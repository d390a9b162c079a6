//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::Vec3;

/// Discrete shade code stored in every canvas cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing drawn
    #[default]
    Empty = 0,
    /// Lines, outlines and the brightest shading bucket
    Bright = 1,
    /// Middle shading bucket
    Mid = 2,
    /// Darkest shading bucket
    Dark = 3,
}

impl Cell {
    /// Two-column glyph used by text sinks
    pub fn glyph(self) -> &'static str {
        match self {
            Cell::Empty => "  ",
            Cell::Bright => "■ ",
            Cell::Mid => "∷ ",
            Cell::Dark => "〼 ",
        }
    }

    /// Gray level used by pixel sinks and screenshots
    pub fn luma(self) -> u8 {
        match self {
            Cell::Empty => 16,
            Cell::Bright => 235,
            Cell::Mid => 150,
            Cell::Dark => 80,
        }
    }
}

/// Bucket a diffuse intensity into a shade code.
///
/// Negative intensities clamp to zero. Thresholds are strict: 0.7 is `Mid`,
/// 0.3 is `Dark`.
pub fn shade_for_intensity(intensity: f32) -> Cell {
    let i = intensity.max(0.0);
    if i > 0.7 {
        Cell::Bright
    } else if i > 0.3 {
        Cell::Mid
    } else {
        Cell::Dark
    }
}

/// Draw strategy selected per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Wireframe,
    BackfaceCull,
    Shading,
}

impl RenderMode {
    pub fn label(&self) -> &'static str {
        match self {
            RenderMode::Wireframe => "Wireframe",
            RenderMode::BackfaceCull => "Backface culling",
            RenderMode::Shading => "Flat shading",
        }
    }
}

/// Which projected vertex set the frame uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    Orthographic,
    Perspective,
}

impl Projection {
    pub fn toggled(self) -> Self {
        match self {
            Projection::Orthographic => Projection::Perspective,
            Projection::Perspective => Projection::Orthographic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Projection::Orthographic => "Orthographic",
            Projection::Perspective => "Perspective",
        }
    }
}

/// Perspective frustum parameters (fov in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    pub const fn new(fov: f32, near: f32, far: f32) -> Self {
        Self { fov, near, far }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterSettings {
    /// Frustum for mesh vertices in perspective mode
    pub geometry_frustum: Frustum,
    /// Frustum for the light indicator in perspective mode
    pub indicator_frustum: Frustum,
    /// Arrowhead wing length in cells
    pub arrow_length: f32,
    /// Arrowhead wing angle in degrees
    pub arrow_angle: f32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            geometry_frustum: Frustum::new(25.0, 0.1, 100.0),
            indicator_frustum: Frustum::new(25.0, 1.5, 40.0),
            arrow_length: 3.0,
            arrow_angle: 30.0,
        }
    }
}

/// A vertex after projection onto the canvas, at sub-cell precision.
/// Rasterizers truncate toward zero when they pick cells.
///
/// `None` means the vertex fell outside the canvas (or produced a non-finite
/// coordinate) and any primitive touching it must be skipped.
pub type ScreenVertex = Option<Vec3>;

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Line segments handed to the line rasterizer
    pub lines: usize,
    /// Triangles handed to the fill rasterizer
    pub triangles: usize,
    /// Cells whose value differed from the previously shown frame
    pub cells_updated: usize,
}
