//! Camera, light and the render context that owns them
//!
//! Orientation is never accumulated into the basis vectors. Every rotation
//! stores angles and re-derives right/up/look in closed form, so there is no
//! drift to correct.

use super::math::{deg_to_rad, Mat4, Vec3};
use super::types::Projection;

/// Camera state
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,

    // Cumulative orientation in degrees
    pub angle_x: f32,
    pub angle_y: f32,
    /// Stored for completeness; the basis formulas do not use it.
    pub angle_z: f32,

    // Derived basis vectors
    pub right: Vec3,
    pub up: Vec3,
    pub look: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            look: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Overwrite the cumulative angles and rebuild the basis
    pub fn set_orientation(&mut self, angle_x: f32, angle_y: f32, angle_z: f32) {
        self.angle_x = angle_x;
        self.angle_y = angle_y;
        self.angle_z = angle_z;
        self.update_basis();
    }

    /// Add to the cumulative angles and rebuild the basis
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.angle_x += dx;
        self.angle_y += dy;
        self.angle_z += dz;
        self.update_basis();
    }

    /// Pitch lives only in `up`, yaw only in `right`, `look` mixes both.
    /// The result is orthonormal only when one of the two angles is zero.
    pub fn update_basis(&mut self) {
        let (sin_x, cos_x) = deg_to_rad(self.angle_x).sin_cos();
        let (sin_y, cos_y) = deg_to_rad(self.angle_y).sin_cos();

        self.right = Vec3::new(cos_y, 0.0, -sin_y);
        self.up = Vec3::new(0.0, cos_x, -sin_x);
        self.look = Vec3::new(sin_y, sin_x, cos_x * cos_y);
    }

    /// Basis vectors as rows; translation column is the negated raw position
    /// (not projected onto the basis).
    pub fn view_matrix(&self) -> Mat4 {
        let mut view = Mat4::IDENTITY;
        for (row, axis) in [self.right, self.up, self.look].into_iter().enumerate() {
            view.m[row][0] = axis.x;
            view.m[row][1] = axis.y;
            view.m[row][2] = axis.z;
        }
        view.m[0][3] = -self.position.x;
        view.m[1][3] = -self.position.y;
        view.m[2][3] = -self.position.z;
        view
    }

    /// World to view space
    pub fn view_transform(&self, p: Vec3) -> Vec3 {
        self.view_matrix().transform_point(p)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 100.0))
    }
}

/// Directional light plus the two endpoints of its on-screen indicator
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Unit vector
    pub direction: Vec3,
    /// Reference point the indicator is centered on
    pub center: Vec3,
    /// Indicator length in world units
    pub length: f32,
    pub start: Vec3,
    pub end: Vec3,
}

impl Light {
    pub fn new(direction: Vec3, center: Vec3, length: f32) -> Self {
        let mut light = Self {
            direction: direction.normalize(),
            center,
            length,
            start: center,
            end: center,
        };
        light.update_endpoints();
        light
    }

    /// Incremental rotation about world Y, then world X. `dz` is accepted and
    /// ignored, matching the camera.
    pub fn rotate(&mut self, dx: f32, dy: f32, _dz: f32) {
        let mut dir = self.direction;

        if dy != 0.0 {
            let (sin, cos) = deg_to_rad(dy).sin_cos();
            let (x, z) = (dir.x, dir.z);
            dir.x = x * cos + z * sin;
            dir.z = -x * sin + z * cos;
        }

        if dx != 0.0 {
            let (sin, cos) = deg_to_rad(dx).sin_cos();
            let (y, z) = (dir.y, dir.z);
            dir.y = y * cos + z * sin;
            dir.z = -y * sin + z * cos;
        }

        self.direction = dir.normalize();
        self.update_endpoints();
    }

    fn update_endpoints(&mut self) {
        let half = self.direction.scale(self.length / 2.0);
        self.start = self.center - half;
        self.end = self.center + half;
    }

    /// (pitch, yaw) of the direction in degrees, as shown in the HUD
    pub fn angles(&self) -> (f32, f32) {
        let d = self.direction;
        (d.y.atan2(d.z).to_degrees(), d.x.atan2(d.z).to_degrees())
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -0.7, -0.6), Vec3::new(15.0, -15.0, 0.0), 10.0)
    }
}

/// Everything the rasterizer reads besides the mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    pub camera: Camera,
    pub light: Light,
    pub projection: Projection,
}

impl RenderContext {
    pub fn new(camera: Camera, light: Light, projection: Projection) -> Self {
        Self { camera, light, projection }
    }

    pub fn toggle_projection(&mut self) {
        self.projection = self.projection.toggled();
    }
}
