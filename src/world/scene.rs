//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. Every
//! field has a default, so a scene file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Cuboid;
use crate::rasterizer::{
    Camera, Canvas, Light, Projection, RasterSettings, RenderContext, RenderMode, Vec3, HEIGHT, WIDTH,
};

/// Error type for scene loading
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid scene: {0}")]
    Validation(String),
}

/// Starting state for a session plus the rasterizer constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Cube edge length in world units
    pub cube_size: u32,
    pub camera_position: Vec3,
    /// Absolute camera orientation (x, y, z) in degrees
    pub camera_angles: Vec3,
    pub projection: Projection,
    pub render_mode: RenderMode,
    pub raster: RasterSettings,
    /// Normalized on load
    pub light_direction: Vec3,
    pub light_center: Vec3,
    pub light_length: f32,
    /// Degrees applied per rotate command
    pub step: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            canvas_width: WIDTH,
            canvas_height: HEIGHT,
            cube_size: 15,
            camera_position: Vec3::new(0.0, 0.0, 100.0),
            camera_angles: Vec3::new(30.0, 20.0, 20.0),
            projection: Projection::Orthographic,
            render_mode: RenderMode::Wireframe,
            raster: RasterSettings::default(),
            light_direction: Vec3::new(0.0, -0.7, -0.6),
            light_center: Vec3::new(15.0, -15.0, 0.0),
            light_length: 10.0,
            step: 10.0,
        }
    }
}

impl Scene {
    /// Reject values the rasterizer cannot work with
    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |msg: &str| Err(SceneError::Validation(msg.to_string()));

        if self.canvas_width == 0 || self.canvas_height == 0 {
            return invalid("canvas dimensions must be nonzero");
        }
        if self.cube_size == 0 {
            return invalid("cube size must be positive");
        }
        for (name, frustum) in [
            ("geometry", self.raster.geometry_frustum),
            ("indicator", self.raster.indicator_frustum),
        ] {
            if !(frustum.near < frustum.far) {
                return Err(SceneError::Validation(format!("{} frustum near must be below far", name)));
            }
            if !(frustum.fov > 0.0 && frustum.fov < 180.0) {
                return Err(SceneError::Validation(format!("{} frustum fov must be in (0, 180)", name)));
            }
        }
        if !self.light_direction.is_finite() || self.light_direction.len() == 0.0 {
            return invalid("light direction must be a nonzero vector");
        }
        Ok(())
    }

    pub fn cuboid(&self) -> Cuboid {
        Cuboid::new(self.cube_size)
    }

    pub fn canvas(&self) -> Canvas {
        let mut canvas = Canvas::with_settings(self.canvas_width, self.canvas_height, self.raster);
        canvas.set_mode(self.render_mode);
        canvas
    }

    pub fn context(&self) -> RenderContext {
        let mut camera = Camera::new(self.camera_position);
        let a = self.camera_angles;
        camera.set_orientation(a.x, a.y, a.z);

        let light = Light::new(self.light_direction, self.light_center, self.light_length);
        RenderContext::new(camera, light, self.projection)
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    let scene: Scene = ron::from_str(s)?;
    scene.validate()?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Frustum;

    #[test]
    fn test_default_scene_is_valid() {
        let scene = Scene::default();
        assert!(scene.validate().is_ok());
        assert_eq!((scene.canvas_width, scene.canvas_height), (80, 40));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let scene = load_scene_from_str("(cube_size: 9, projection: Perspective)").unwrap();
        assert_eq!(scene.cube_size, 9);
        assert_eq!(scene.projection, Projection::Perspective);
        assert_eq!(scene.step, 10.0);
        assert_eq!(scene.raster, RasterSettings::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let mut scene = Scene::default();
        scene.render_mode = RenderMode::Shading;
        scene.camera_angles = Vec3::new(0.0, 45.0, 0.0);
        scene.raster.arrow_angle = 20.0;

        let path = std::env::temp_dir().join(format!("grid-renderer-scene-{}.ron", std::process::id()));
        save_scene(&scene, &path).unwrap();
        let loaded = load_scene(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_scene("/nonexistent/dir/scene.ron").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = load_scene_from_str("(cube_size: ").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_validation_failures() {
        let cases: Vec<Box<dyn Fn(&mut Scene)>> = vec![
            Box::new(|s: &mut Scene| s.canvas_width = 0),
            Box::new(|s: &mut Scene| s.cube_size = 0),
            Box::new(|s: &mut Scene| s.raster.geometry_frustum = Frustum::new(25.0, 100.0, 0.1)),
            Box::new(|s: &mut Scene| s.raster.indicator_frustum = Frustum::new(180.0, 1.5, 40.0)),
            Box::new(|s: &mut Scene| s.light_direction = Vec3::ZERO),
        ];
        for (i, mutate) in cases.iter().enumerate() {
            let mut scene = Scene::default();
            mutate(&mut scene);
            assert!(
                matches!(scene.validate(), Err(SceneError::Validation(_))),
                "case {} should fail validation",
                i
            );
        }
    }

    #[test]
    fn test_context_matches_startup_values() {
        let ctx = Scene::default().context();
        assert_eq!(ctx.camera.angle_x, 30.0);
        assert_eq!(ctx.camera.angle_y, 20.0);
        assert_eq!(ctx.camera.angle_z, 20.0);
        assert!((ctx.light.direction.len() - 1.0).abs() < 1e-5);
        assert_eq!(ctx.projection, Projection::Orthographic);
    }
}
