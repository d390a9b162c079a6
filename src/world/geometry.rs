//! Cuboid mesh with fixed topology
//!
//! Pure data with a single mutation: rigid rotation about the mesh's own
//! center. Edges, triangles and faces never change; vertex positions and face
//! normals are rewritten in place.

use crate::rasterizer::{deg_to_rad, Vec3};

pub const VERTEX_COUNT: usize = 8;
pub const FACE_COUNT: usize = 6;

/// The 12 undirected edges (bottom ring, top ring, verticals)
pub const EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Two triangles per face, faces in order front, right, back, left, top, bottom.
/// Triangle `2 * f` is the one the normal of face `f` is derived from.
pub const TRIANGLES: [[usize; 3]; 12] = [
    [0, 4, 1], [1, 4, 5],
    [1, 5, 2], [2, 5, 6],
    [2, 6, 3], [3, 6, 7],
    [3, 7, 0], [0, 7, 4],
    [4, 7, 5], [5, 7, 6],
    [0, 1, 3], [1, 2, 3],
];

/// An axis-aligned cube of edge `size` with one corner at the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    pub size: u32,
    /// Bottom face then top face; each front-left, front-right, back-right, back-left
    pub vertices: [Vec3; VERTEX_COUNT],
    pub normals: [Vec3; FACE_COUNT],
}

impl Cuboid {
    pub fn new(size: u32) -> Self {
        let s = size as f32;
        let vertices = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(s, 0.0, 0.0),
            Vec3::new(s, 0.0, s),
            Vec3::new(0.0, 0.0, s),
            Vec3::new(0.0, s, 0.0),
            Vec3::new(s, s, 0.0),
            Vec3::new(s, s, s),
            Vec3::new(0.0, s, s),
        ];

        let mut cuboid = Self {
            size,
            vertices,
            normals: [Vec3::ZERO; FACE_COUNT],
        };
        cuboid.recalculate_normals();
        cuboid
    }

    /// Triangles of face `face` (0..6)
    pub fn face_triangles(face: usize) -> [[usize; 3]; 2] {
        [TRIANGLES[face * 2], TRIANGLES[face * 2 + 1]]
    }

    /// The six vertex slots (with repeats) making up a face
    pub fn face_slots(face: usize) -> [usize; 6] {
        let [a, b] = Self::face_triangles(face);
        [a[0], a[1], a[2], b[0], b[1], b[2]]
    }

    /// Re-derive every face normal from the current vertex positions
    pub fn recalculate_normals(&mut self) {
        for face in 0..FACE_COUNT {
            let [i0, i1, i2] = TRIANGLES[face * 2];
            let v0 = self.vertices[i0];
            let edge1 = self.vertices[i1] - v0;
            let edge2 = self.vertices[i2] - v0;
            self.normals[face] = edge1.cross(edge2).normalize();
        }
    }

    /// Centroid of the eight vertices
    pub fn center(&self) -> Vec3 {
        let sum = self.vertices.iter().fold(Vec3::ZERO, |acc, v| acc + *v);
        sum.scale(1.0 / VERTEX_COUNT as f32)
    }

    /// Rotate about the center by `angle_y` around the vertical axis, then by
    /// `angle_x` around the horizontal axis. Angles are deltas in degrees.
    pub fn rotate(&mut self, angle_x: f32, angle_y: f32) {
        let (sin_x, cos_x) = deg_to_rad(angle_x).sin_cos();
        let (sin_y, cos_y) = deg_to_rad(angle_y).sin_cos();
        let center = self.center();

        for v in self.vertices.iter_mut() {
            let p = *v - center;

            let new_x = p.x * cos_y - p.z * sin_y;
            let z = p.x * sin_y + p.z * cos_y;

            let new_y = p.y * cos_x - z * sin_x;
            let new_z = p.y * sin_x + z * cos_x;

            *v = Vec3::new(new_x, new_y, new_z) + center;
        }

        self.recalculate_normals();
    }

    /// True when both positions occur more than once among the slots of one
    /// face, i.e. the segment is the diagonal splitting that face.
    pub fn is_face_diagonal(&self, a: Vec3, b: Vec3) -> bool {
        (0..FACE_COUNT).any(|face| {
            let slots = Self::face_slots(face);
            let count = |p: Vec3| slots.iter().filter(|&&i| self.vertices[i] == p).count();
            count(a) > 1 && count(b) > 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: Vec3, b: Vec3, tol: f32) {
        assert!(
            (a - b).len() < tol,
            "expected {:?} to be within {} of {:?}",
            a,
            tol,
            b
        );
    }

    #[test]
    fn test_new_cube_normals_point_outward() {
        let cube = Cuboid::new(15);
        let center = cube.center();
        for face in 0..FACE_COUNT {
            let [i0, _, _] = TRIANGLES[face * 2];
            let to_face = cube.vertices[i0] - center;
            assert!((cube.normals[face].len() - 1.0).abs() < 1e-5);
            // Consistent winding: all normals share a side relative to the center
            let side = cube.normals[face].dot(to_face).signum();
            let first = cube.normals[0].dot(cube.vertices[0] - center).signum();
            assert_eq!(side, first, "face {} winding differs", face);
        }
    }

    #[test]
    fn test_front_face_normal() {
        let cube = Cuboid::new(10);
        // (v4 - v0) x (v1 - v0) = (0,1,0) x (1,0,0)
        assert_close(cube.normals[0], Vec3::new(0.0, 0.0, -1.0), 1e-5);
    }

    #[test]
    fn test_every_edge_belongs_to_some_triangle() {
        for &(a, b) in EDGES.iter() {
            let found = TRIANGLES
                .iter()
                .any(|t| t.contains(&a) && t.contains(&b));
            assert!(found, "edge ({}, {}) not in any triangle", a, b);
        }
    }

    #[test]
    fn test_face_diagonals_detected() {
        let cube = Cuboid::new(15);
        let v = cube.vertices;
        // Front face is split along 4-1
        assert!(cube.is_face_diagonal(v[4], v[1]));
        assert!(cube.is_face_diagonal(v[1], v[4]));
        // Silhouette edges are not diagonals
        for &(a, b) in EDGES.iter() {
            assert!(!cube.is_face_diagonal(v[a], v[b]), "edge ({}, {})", a, b);
        }
    }

    #[test]
    fn test_each_face_has_exactly_one_diagonal() {
        let cube = Cuboid::new(5);
        for face in 0..FACE_COUNT {
            let [t0, t1] = Cuboid::face_triangles(face);
            let shared: Vec<usize> = t0.iter().copied().filter(|i| t1.contains(i)).collect();
            assert_eq!(shared.len(), 2, "face {}", face);
            assert!(cube.is_face_diagonal(cube.vertices[shared[0]], cube.vertices[shared[1]]));
        }
    }

    #[test]
    fn test_rotate_keeps_center_and_size() {
        let mut cube = Cuboid::new(15);
        let center = cube.center();
        cube.rotate(30.0, 45.0);
        assert_close(cube.center(), center, 1e-3);
        let edge = cube.vertices[1] - cube.vertices[0];
        assert!((edge.len() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_recomputes_normals() {
        let mut cube = Cuboid::new(15);
        cube.rotate(0.0, 90.0);
        let mut fresh = cube.clone();
        fresh.recalculate_normals();
        for face in 0..FACE_COUNT {
            assert_close(cube.normals[face], fresh.normals[face], 1e-6);
        }
        // The front normal turned a quarter around the vertical axis
        assert!(cube.normals[0].z.abs() < 1e-5);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let mut cube = Cuboid::new(15);
        let original = cube.clone();
        for _ in 0..36 {
            cube.rotate(10.0, 0.0);
        }
        for i in 0..VERTEX_COUNT {
            assert_close(cube.vertices[i], original.vertices[i], 1e-2);
        }
    }

    proptest! {
        #[test]
        fn rotation_about_one_axis_is_reversible(ax in -180.0f32..180.0, ay in -180.0f32..180.0) {
            let original = Cuboid::new(15);

            let mut cube = original.clone();
            cube.rotate(ax, 0.0);
            cube.rotate(-ax, 0.0);
            cube.rotate(0.0, ay);
            cube.rotate(0.0, -ay);

            for i in 0..VERTEX_COUNT {
                prop_assert!((cube.vertices[i] - original.vertices[i]).len() < 1e-3);
            }
        }

        #[test]
        fn combined_rotation_undone_in_reverse_order(ax in -180.0f32..180.0, ay in -180.0f32..180.0) {
            let original = Cuboid::new(15);

            let mut cube = original.clone();
            cube.rotate(ax, ay);
            cube.rotate(-ax, 0.0);
            cube.rotate(0.0, -ay);

            for i in 0..VERTEX_COUNT {
                prop_assert!((cube.vertices[i] - original.vertices[i]).len() < 1e-3);
            }
        }
    }
}
