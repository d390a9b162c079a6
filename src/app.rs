//! Session state and command dispatch
//!
//! The mesh, the render context and the canvas live here and are only
//! touched between frames. Every input becomes a `Command`; `Session::apply`
//! is the single place that mutates state.

use crate::rasterizer::{Canvas, DisplaySink, FrameStats, RenderContext, RenderMode};
use crate::world::{Cuboid, Scene};

/// Everything an input source can ask for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Rotate the mesh about its center (degrees)
    RotateMesh { dx: f32, dy: f32 },
    /// Add to the camera's cumulative angles (degrees)
    RotateCamera { dx: f32, dy: f32, dz: f32 },
    /// Rotate the light direction (degrees)
    RotateLight { dx: f32, dy: f32, dz: f32 },
    ToggleProjection,
    SetRenderMode(RenderMode),
    /// Write the displayed canvas to an image file
    Screenshot,
    Quit,
}

/// One running renderer: mesh, camera, light and canvas
pub struct Session {
    pub cube: Cuboid,
    pub ctx: RenderContext,
    pub canvas: Canvas,
}

impl Session {
    pub fn new(cube: Cuboid, ctx: RenderContext, canvas: Canvas) -> Self {
        Self { cube, ctx, canvas }
    }

    pub fn from_scene(scene: &Scene) -> Self {
        Self::new(scene.cuboid(), scene.context(), scene.canvas())
    }

    /// Apply a command. Returns true when the frame needs redrawing.
    ///
    /// `Screenshot` and `Quit` act outside the session and leave it untouched.
    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::RotateMesh { dx, dy } => {
                self.cube.rotate(dx, dy);
                true
            }
            Command::RotateCamera { dx, dy, dz } => {
                self.ctx.camera.rotate(dx, dy, dz);
                true
            }
            Command::RotateLight { dx, dy, dz } => {
                self.ctx.light.rotate(dx, dy, dz);
                true
            }
            Command::ToggleProjection => {
                self.ctx.toggle_projection();
                true
            }
            Command::SetRenderMode(mode) => {
                let changed = self.canvas.mode != mode;
                self.canvas.set_mode(mode);
                changed
            }
            Command::Screenshot | Command::Quit => false,
        }
    }

    /// Compose and flush one frame
    pub fn render(&mut self, sink: &mut dyn DisplaySink) -> FrameStats {
        self.canvas.render(&self.cube, &self.ctx, sink)
    }

    /// Light angles in degrees for the HUD
    pub fn light_angles(&self) -> (f32, f32) {
        self.ctx.light.angles()
    }

    pub fn mode(&self) -> RenderMode {
        self.canvas.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Cell, Projection};

    /// Counts cells that are not empty
    #[derive(Default)]
    struct InkSink {
        ink: usize,
    }

    impl DisplaySink for InkSink {
        fn begin_frame(&mut self, _width: usize, _height: usize) {
            self.ink = 0;
        }

        fn paint(&mut self, _row: usize, _col: usize, cell: Cell, _changed: bool) {
            if cell != Cell::Empty {
                self.ink += 1;
            }
        }
    }

    fn session() -> Session {
        Session::from_scene(&Scene::default())
    }

    #[test]
    fn test_startup_frame_draws_wireframe() {
        let mut s = session();
        let mut sink = InkSink::default();
        let stats = s.render(&mut sink);
        assert_eq!(stats.lines, 12);
        assert!(sink.ink > 0);
        assert_eq!(stats.cells_updated, sink.ink);
    }

    #[test]
    fn test_rotate_mesh_moves_vertices() {
        let mut s = session();
        let before = s.cube.vertices;
        assert!(s.apply(Command::RotateMesh { dx: 0.0, dy: 10.0 }));
        assert_ne!(before, s.cube.vertices);
    }

    #[test]
    fn test_rotate_camera_accumulates() {
        let mut s = session();
        s.apply(Command::RotateCamera { dx: 0.0, dy: 10.0, dz: 0.0 });
        s.apply(Command::RotateCamera { dx: -10.0, dy: 0.0, dz: 0.0 });
        assert_eq!(s.ctx.camera.angle_x, 20.0);
        assert_eq!(s.ctx.camera.angle_y, 30.0);
    }

    #[test]
    fn test_rotate_light_changes_angles() {
        let mut s = session();
        let before = s.light_angles();
        assert!(s.apply(Command::RotateLight { dx: -10.0, dy: 0.0, dz: 0.0 }));
        assert_ne!(before, s.light_angles());
    }

    #[test]
    fn test_toggle_projection_twice_restores() {
        let mut s = session();
        s.apply(Command::ToggleProjection);
        assert_eq!(s.ctx.projection, Projection::Perspective);
        s.apply(Command::ToggleProjection);
        assert_eq!(s.ctx.projection, Projection::Orthographic);
    }

    #[test]
    fn test_selecting_current_mode_needs_no_redraw() {
        let mut s = session();
        assert!(!s.apply(Command::SetRenderMode(RenderMode::Wireframe)));
        assert!(s.apply(Command::SetRenderMode(RenderMode::Shading)));
        assert_eq!(s.mode(), RenderMode::Shading);
    }

    #[test]
    fn test_outer_commands_leave_state_alone() {
        let mut s = session();
        let cube = s.cube.clone();
        let ctx = s.ctx.clone();
        assert!(!s.apply(Command::Screenshot));
        assert!(!s.apply(Command::Quit));
        assert_eq!(s.cube, cube);
        assert_eq!(s.ctx, ctx);
    }

    #[test]
    fn test_unchanged_state_flushes_nothing() {
        let mut s = session();
        let mut sink = InkSink::default();
        s.render(&mut sink);
        let again = s.render(&mut sink);
        assert_eq!(again.cells_updated, 0);
    }
}
