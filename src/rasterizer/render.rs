//! Frame composition onto the cell grid
//!
//! Per frame: clear the back buffer, project the mesh, run one draw strategy,
//! then diff back against front and hand the result to a display sink.

use super::camera::{Camera, RenderContext};
use super::math::{deg_to_rad, perspective, point_in_triangle, project_point, rotate_2d, Mat4, Vec3};
use super::types::{
    shade_for_intensity, Cell, FrameStats, Frustum, Projection, RasterSettings, RenderMode,
    ScreenVertex,
};
use crate::world::{Cuboid, EDGES, FACE_COUNT, TRIANGLES, VERTEX_COUNT};

/// Receives the flushed frame, one cell at a time in row-major order
pub trait DisplaySink {
    /// Establish the drawing origin before any cell of the frame arrives
    fn begin_frame(&mut self, _width: usize, _height: usize) {}

    /// `changed` is false when `cell` equals what the previous frame showed.
    /// Unchanged cells are still delivered so row-redrawing sinks stay simple.
    fn paint(&mut self, row: usize, col: usize, cell: Cell, changed: bool);

    fn end_frame(&mut self) {}
}

/// Double-buffered cell grid plus the rasterization routines that draw into it
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub mode: RenderMode,
    pub settings: RasterSettings,
    /// Being drawn
    back: Vec<Cell>,
    /// Last flushed
    front: Vec<Cell>,
    stats: FrameStats,
}

impl Canvas {
    pub fn with_settings(width: usize, height: usize, settings: RasterSettings) -> Self {
        Self {
            width,
            height,
            mode: RenderMode::default(),
            settings,
            back: vec![Cell::Empty; width * height],
            front: vec![Cell::Empty; width * height],
            stats: FrameStats::default(),
        }
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Last flushed frame, row-major
    pub fn front(&self) -> &[Cell] {
        &self.front
    }

    pub fn clear(&mut self) {
        self.back.fill(Cell::Empty);
        self.stats = FrameStats::default();
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if self.in_bounds(x, y) {
            let idx = y as usize * self.width + x as usize;
            self.back[idx] = cell;
        }
    }

    /// Compose one frame into the back buffer and flush it to `sink`
    pub fn render(&mut self, cube: &Cuboid, ctx: &RenderContext, sink: &mut dyn DisplaySink) -> FrameStats {
        let mut stats = self.compose(cube, ctx);
        stats.cells_updated = self.flush(sink);
        stats
    }

    /// Draw the frame into the back buffer without flushing it
    pub fn compose(&mut self, cube: &Cuboid, ctx: &RenderContext) -> FrameStats {
        self.clear();

        let points = self.project_vertices(cube, &ctx.camera, ctx.projection);

        match self.mode {
            RenderMode::Wireframe => self.draw_wireframe(&points),
            RenderMode::BackfaceCull => self.draw_backface_cull(cube, &points),
            RenderMode::Shading => self.draw_shading(cube, ctx, &points),
        }

        self.stats
    }

    /// Emit every cell, copying changed ones into the front buffer.
    /// Returns the number of cells that changed.
    pub fn flush(&mut self, sink: &mut dyn DisplaySink) -> usize {
        sink.begin_frame(self.width, self.height);

        let mut updated = 0;
        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row * self.width + col;
                let changed = self.back[idx] != self.front[idx];
                if changed {
                    self.front[idx] = self.back[idx];
                    updated += 1;
                }
                sink.paint(row, col, self.front[idx], changed);
            }
        }

        sink.end_frame();
        updated
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    /// Both projections are computed for every vertex; `projection` picks
    /// which set is returned.
    pub fn project_vertices(&self, cube: &Cuboid, camera: &Camera, projection: Projection) -> [ScreenVertex; VERTEX_COUNT] {
        let proj = self.projection_matrix(self.settings.geometry_frustum);
        let half_size = (cube.size / 2) as f32;

        let mut ortho = [None; VERTEX_COUNT];
        let mut persp = [None; VERTEX_COUNT];

        for (i, v) in cube.vertices.iter().enumerate() {
            let cam = camera.view_transform(*v);
            ortho[i] = self.project_orthographic(cam, half_size);
            persp[i] = self.project_perspective(cam, &proj);
        }

        match projection {
            Projection::Orthographic => ortho,
            Projection::Perspective => persp,
        }
    }

    pub fn projection_matrix(&self, frustum: Frustum) -> Mat4 {
        let aspect = self.width as f32 / self.height as f32;
        perspective(frustum.fov, aspect, frustum.near, frustum.far)
    }

    /// Camera-space x/y shifted to the canvas center, less half the mesh size.
    /// z is carried through unchanged.
    pub fn project_orthographic(&self, cam: Vec3, half_size: f32) -> ScreenVertex {
        let x = cam.x + (self.width / 2) as f32 - half_size;
        let y = cam.y + (self.height / 2) as f32 - half_size;

        if !self.covers(x, y) {
            return None;
        }
        Some(Vec3::new(x, y, cam.z))
    }

    /// Projection plus divide, NDC mapped around the canvas center with Y
    /// flipped, clamped onto the canvas.
    pub fn project_perspective(&self, cam: Vec3, proj: &Mat4) -> ScreenVertex {
        let ndc = project_point(cam, proj);
        let (x, y) = self.ndc_to_screen(ndc);

        if x.is_nan() || y.is_nan() {
            return None;
        }

        let x = x.clamp(0.0, self.width.saturating_sub(1) as f32);
        let y = y.clamp(0.0, self.height.saturating_sub(1) as f32);
        if !self.covers(x, y) {
            return None;
        }
        Some(Vec3::new(x, y, ndc.z))
    }

    /// Whether a sub-cell position truncates to a cell on the canvas
    fn covers(&self, x: f32, y: f32) -> bool {
        x.is_finite() && y.is_finite() && self.in_bounds(x.trunc() as i32, y.trunc() as i32)
    }

    fn ndc_to_screen(&self, ndc: Vec3) -> (f32, f32) {
        let center_x = self.width as f32 / 2.0;
        let center_y = self.height as f32 / 2.0;
        (center_x + ndc.x * center_x, center_y - ndc.y * center_y)
    }

    // ------------------------------------------------------------------
    // Draw strategies
    // ------------------------------------------------------------------

    fn draw_wireframe(&mut self, points: &[ScreenVertex; VERTEX_COUNT]) {
        for &(a, b) in EDGES.iter() {
            if let (Some(p0), Some(p1)) = (points[a], points[b]) {
                self.draw_line(p0, p1);
            }
        }
    }

    fn draw_backface_cull(&mut self, cube: &Cuboid, points: &[ScreenVertex; VERTEX_COUNT]) {
        for tri in TRIANGLES.iter() {
            let (Some(p0), Some(p1), Some(p2)) = (points[tri[0]], points[tri[1]], points[tri[2]]) else {
                continue;
            };

            let screen_normal = (p1 - p0).cross(p2 - p0);
            if screen_normal.dot(Vec3::FORWARD) >= 0.0 {
                continue;
            }

            let corners = [(tri[0], p0), (tri[1], p1), (tri[2], p2)];
            for k in 0..3 {
                let (ia, pa) = corners[k];
                let (ib, pb) = corners[(k + 1) % 3];
                if !cube.is_face_diagonal(cube.vertices[ia], cube.vertices[ib]) {
                    self.draw_line(pa, pb);
                }
            }
        }
    }

    fn draw_shading(&mut self, cube: &Cuboid, ctx: &RenderContext, points: &[ScreenVertex; VERTEX_COUNT]) {
        self.draw_light_indicator(ctx);

        for face in 0..FACE_COUNT {
            let normal = cube.normals[face];
            let toward_look = normal.dot(ctx.camera.look);

            // Projected winding differs between the two paths, so the facing
            // sign flips with the projection.
            let facing = match ctx.projection {
                Projection::Orthographic => toward_look < 0.0,
                Projection::Perspective => toward_look > 0.0,
            };
            if !facing {
                continue;
            }

            let shade = shade_for_intensity(normal.dot(ctx.light.direction));
            for tri in Cuboid::face_triangles(face) {
                if let (Some(p0), Some(p1), Some(p2)) = (points[tri[0]], points[tri[1]], points[tri[2]]) {
                    self.fill_triangle(p0, p1, p2, shade);
                }
            }
        }
    }

    /// Light direction shown as a line with an arrowhead at its start point,
    /// projected the same way as the mesh (without the mesh-size offset).
    fn draw_light_indicator(&mut self, ctx: &RenderContext) {
        let start = ctx.camera.view_transform(ctx.light.start);
        let end = ctx.camera.view_transform(ctx.light.end);

        let (start, end) = match ctx.projection {
            Projection::Orthographic => {
                let offset = Vec3::new((self.width / 2) as f32, (self.height / 2) as f32, 0.0);
                (start + offset, end + offset)
            }
            Projection::Perspective => {
                let proj = self.projection_matrix(self.settings.indicator_frustum);
                let to_screen = |p: Vec3| {
                    let ndc = project_point(p, &proj);
                    let (x, y) = self.ndc_to_screen(ndc);
                    Vec3::new(x, y, ndc.z)
                };
                (to_screen(start), to_screen(end))
            }
        };

        self.draw_line(start, end);
        self.draw_arrowhead(start, end);
    }

    /// Two wings at `tip`, pointing back along `tail -> tip` rotated by
    /// +/- the configured angle.
    fn draw_arrowhead(&mut self, tip: Vec3, tail: Vec3) {
        let dx = tip.x - tail.x;
        let dy = tip.y - tail.y;
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() || len <= 0.0 {
            return;
        }

        let (ux, uy) = (dx / len, dy / len);
        let size = self.settings.arrow_length;
        let angle = deg_to_rad(self.settings.arrow_angle);

        for a in [angle, -angle] {
            let (rx, ry) = rotate_2d(ux, uy, a);
            let wing = Vec3::new(tip.x - size * rx, tip.y - size * ry, tip.z);
            self.draw_line(tip, wing);
        }
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Draw a line between two screen points using Bresenham's algorithm.
    /// Coordinates are truncated toward zero.
    pub fn draw_line(&mut self, from: Vec3, to: Vec3) {
        self.stats.lines += 1;

        let Some((x0, y0, x1, y1)) = self.line_endpoints(from, to) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_cell(x, y, Cell::Bright);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > dy {
                err += dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Integer endpoints for the line walk. Endpoints inside a guard band
    /// around the canvas are used as-is; anything further out is clipped to
    /// the canvas first so the walk stays bounded.
    fn line_endpoints(&self, from: Vec3, to: Vec3) -> Option<(i32, i32, i32, i32)> {
        let coords = [from.x, from.y, to.x, to.y];
        if coords.iter().any(|c| !c.is_finite()) {
            return None;
        }

        let guard = 4.0 * (self.width + self.height) as f32;
        if coords.iter().all(|c| c.abs() <= guard) {
            return Some((from.x as i32, from.y as i32, to.x as i32, to.y as i32));
        }

        // One cell of slack on every side absorbs rounding at the clip edge;
        // cells outside the canvas are dropped by set_cell anyway.
        let max_x = self.width as f64;
        let max_y = self.height as f64;
        let (x0, y0, x1, y1) = clip_segment(
            (from.x as f64, from.y as f64),
            (to.x as f64, to.y as f64),
            (-1.0, -1.0),
            (max_x, max_y),
        )?;
        Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32))
    }

    /// Fill a triangle by scanning its bounding box with a barycentric
    /// inside test. Vertices are snapped to their cells first. No depth
    /// test; later fills overwrite earlier ones.
    pub fn fill_triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, cell: Cell) {
        self.stats.triangles += 1;

        let [v0, v1, v2] = [v0, v1, v2].map(|v| Vec3::new(v.x.trunc(), v.y.trunc(), v.z));

        let min_x = v0.x.min(v1.x).min(v2.x).max(0.0);
        let max_x = v0.x.max(v1.x).max(v2.x).min(self.width.saturating_sub(1) as f32);
        let min_y = v0.y.min(v1.y).min(v2.y).max(0.0);
        let max_y = v0.y.max(v1.y).max(v2.y).min(self.height.saturating_sub(1) as f32);
        if !(min_x <= max_x && min_y <= max_y) {
            return;
        }

        for y in (min_y as i32)..=(max_y as i32) {
            for x in (min_x as i32)..=(max_x as i32) {
                if point_in_triangle(x as f32, y as f32, v0, v1, v2) {
                    self.set_cell(x, y, cell);
                }
            }
        }
    }
}

/// Liang-Barsky clip of the segment `a -> b` against the rectangle `min..=max`
fn clip_segment(a: (f64, f64), b: (f64, f64), min: (f64, f64), max: (f64, f64)) -> Option<(f64, f64, f64, f64)> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-dx, a.0 - min.0), (dx, max.0 - a.0), (-dy, a.1 - min.1), (dy, max.1 - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((a.0 + t0 * dx, a.1 + t0 * dy, a.0 + t1 * dx, a.1 + t1 * dy))
}
