//! Vector and matrix math for the grid rasterizer
//!
//! Everything here is a plain value type. Matrices are row-major and
//! points are treated as column vectors (`m * p`).

use std::ops::{Add, Sub};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    /// Fixed view direction used by the screen-space facing test
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// Only meaningful for a nonzero vector; a zero vector comes back as zero
    /// instead of NaN.
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/// Degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// 4x4 row-major matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const ZERO: Mat4 = Mat4 { m: [[0.0; 4]; 4] };
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Multiply-and-add with the first three rows (w assumed to be 1, no divide)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3 {
            x: p.x * m[0][0] + p.y * m[0][1] + p.z * m[0][2] + m[0][3],
            y: p.x * m[1][0] + p.y * m[1][1] + p.z * m[1][2] + m[1][3],
            z: p.x * m[2][0] + p.y * m[2][1] + p.z * m[2][2] + m[2][3],
        }
    }

    /// Full homogeneous transform, returns (x, y, z, w)
    pub fn transform_homogeneous(&self, p: Vec3) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, value) in self.m.iter().zip(out.iter_mut()) {
            *value = p.x * row[0] + p.y * row[1] + p.z * row[2] + row[3];
        }
        out
    }
}

/// Perspective projection matrix, `fov` in degrees.
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let tan_half_fov = deg_to_rad(fov * 0.5).tan();
    let z_range = near - far;

    let mut proj = Mat4::ZERO;
    proj.m[0][0] = 1.0 / (tan_half_fov * aspect);
    proj.m[1][1] = 1.0 / tan_half_fov;
    proj.m[2][2] = (-near - far) / z_range;
    proj.m[2][3] = 2.0 * far * near / z_range;
    proj.m[3][2] = 1.0;
    proj
}

/// Project a view-space point through `proj` and divide by w.
///
/// A |w| below `f32::EPSILON` is replaced by `f32::EPSILON`. A negative w has
/// only its sign flipped; x/y/z keep theirs.
pub fn project_point(p: Vec3, proj: &Mat4) -> Vec3 {
    let [x, y, z, mut w] = proj.transform_homogeneous(p);

    if w.abs() < f32::EPSILON {
        w = f32::EPSILON;
    } else if w < 0.0 {
        w = -w;
    }

    Vec3::new(x / w, y / w, z / w)
}

/// Barycentric weights of (px, py) relative to the triangle (v1, v2, v3),
/// using only x and y. Returns (-1, -1, -1) for a degenerate triangle.
pub fn barycentric(px: f32, py: f32, v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    let d = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);

    if d.abs() < 0.0001 {
        return Vec3::new(-1.0, -1.0, -1.0);
    }

    let u = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) / d;
    let v = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) / d;
    let w = 1.0 - u - v;

    Vec3::new(u, v, w)
}

/// Inside test with all three weights non-negative (edges count as inside)
pub fn point_in_triangle(px: f32, py: f32, v1: Vec3, v2: Vec3, v3: Vec3) -> bool {
    let bc = barycentric(px, py, v1, v2, v3);
    bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0
}

/// Rotate a 2D direction by `angle` radians
pub fn rotate_2d(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (cos * x - sin * y, sin * x + cos * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_barycentric_inside() {
        let v1 = Vec3::new(0.0, 0.0, 0.0);
        let v2 = Vec3::new(10.0, 0.0, 0.0);
        let v3 = Vec3::new(5.0, 10.0, 0.0);
        assert!(point_in_triangle(5.0, 3.0, v1, v2, v3));
        assert!(!point_in_triangle(0.0, 10.0, v1, v2, v3));
    }

    #[test]
    fn test_barycentric_vertices_are_inside() {
        let v1 = Vec3::new(2.0, 2.0, 0.0);
        let v2 = Vec3::new(8.0, 2.0, 0.0);
        let v3 = Vec3::new(2.0, 8.0, 0.0);
        assert!(point_in_triangle(2.0, 2.0, v1, v2, v3));
        assert!(point_in_triangle(8.0, 2.0, v1, v2, v3));
        assert!(point_in_triangle(5.0, 5.0, v1, v2, v3));
    }

    #[test]
    fn test_degenerate_triangle_is_empty() {
        let v = Vec3::new(3.0, 3.0, 0.0);
        assert!(!point_in_triangle(3.0, 3.0, v, v, v));
    }

    #[test]
    fn test_perspective_matrix_entries() {
        let proj = perspective(90.0, 2.0, 1.0, 3.0);
        assert!((proj.m[0][0] - 0.5).abs() < 1e-5);
        assert!((proj.m[1][1] - 1.0).abs() < 1e-5);
        assert!((proj.m[2][2] - 2.0).abs() < 1e-5);
        assert!((proj.m[2][3] + 3.0).abs() < 1e-5);
        assert_eq!(proj.m[3][2], 1.0);
        assert_eq!(proj.m[3][3], 0.0);
        assert_eq!(proj.m[0][1], 0.0);
    }

    #[test]
    fn test_project_point_zero_w_uses_epsilon() {
        let proj = perspective(25.0, 2.0, 0.1, 100.0);
        let p = project_point(Vec3::new(0.0, 0.0, 0.0), &proj);
        assert!(p.is_finite());
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_project_point_negative_w_flips_only_w() {
        let proj = perspective(90.0, 1.0, 0.1, 100.0);
        let front = project_point(Vec3::new(1.0, 1.0, 10.0), &proj);
        let behind = project_point(Vec3::new(1.0, 1.0, -10.0), &proj);
        // Same |w|, x and y keep their sign
        assert!((front.x - behind.x).abs() < 1e-5);
        assert!((front.y - behind.y).abs() < 1e-5);
        assert!(behind.x > 0.0);
    }

    #[test]
    fn test_transform_point_applies_translation_column() {
        let mut m = Mat4::IDENTITY;
        m.m[2][3] = -100.0;
        let p = m.transform_point(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::new(1.0, 2.0, -97.0));
    }

    #[test]
    fn test_rotate_2d_quarter_turn() {
        let (x, y) = rotate_2d(1.0, 0.0, std::f32::consts::FRAC_PI_2);
        assert!(x.abs() < 1e-5);
        assert!((y - 1.0).abs() < 1e-5);
    }

    fn component() -> impl Strategy<Value = f32> {
        -1000.0f32..1000.0
    }

    fn nonzero_vec() -> impl Strategy<Value = Vec3> {
        (component(), component(), component())
            .prop_map(|(x, y, z)| Vec3::new(x, y, z))
            .prop_filter("nonzero length", |v| v.len() > 1e-3)
    }

    proptest! {
        #[test]
        fn normalize_gives_unit_length(v in nonzero_vec()) {
            prop_assert!((v.normalize().len() - 1.0).abs() < 1e-5);
        }

        #[test]
        fn cross_is_perpendicular(a in nonzero_vec(), b in nonzero_vec()) {
            let (a, b) = (a.normalize(), b.normalize());
            let c = a.cross(b);
            prop_assert!(c.dot(a).abs() < 1e-4);
            prop_assert!(c.dot(b).abs() < 1e-4);
        }

        #[test]
        fn projection_never_yields_nan(x in component(), y in component(), z in component()) {
            let proj = perspective(25.0, 2.0, 0.1, 100.0);
            let p = project_point(Vec3::new(x, y, z), &proj);
            prop_assert!(!p.x.is_nan() && !p.y.is_nan() && !p.z.is_nan());
        }
    }
}
