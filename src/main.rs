//! Grid Renderer: a cuboid drawn by a software rasterizer onto a cell grid
//!
//! - Orthographic and perspective projection
//! - Wireframe, backface culling and flat shading
//! - Keyboard-driven rotation of the mesh, camera and light

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod world;
mod ui;
mod app;

use std::path::Path;

use macroquad::prelude::*;
use app::{Command, Session};
use ui::{poll_commands, save_png, screenshot_path, PixelSink, TextSink, HELP};
use world::{load_scene, save_scene, Scene};

/// Scene file picked up from the working directory
const SCENE_FILE: &str = "scene.ron";

/// Window pixels per cell
const CELL_PX: usize = 10;

/// Width reserved for the HUD column
const HUD_WIDTH: f32 = 320.0;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Grid Renderer v{}", VERSION),
        window_width: (rasterizer::WIDTH * CELL_PX) as i32 + HUD_WIDTH as i32,
        window_height: (rasterizer::HEIGHT * CELL_PX) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

fn startup_scene() -> Scene {
    let path = Path::new(SCENE_FILE);

    // `--save-scene` writes the built-in scene out as a starting point
    if std::env::args().any(|a| a == "--save-scene") {
        match save_scene(&Scene::default(), path) {
            Ok(()) => log::info!("Wrote built-in scene to {}", path.display()),
            Err(e) => log::error!("Failed to write {}: {}", path.display(), e),
        }
    }

    if !path.exists() {
        log::info!("No {} found, using built-in scene", SCENE_FILE);
        return Scene::default();
    }

    match load_scene(path) {
        Ok(scene) => {
            log::info!("Loaded scene from {}", path.display());
            scene
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}, using built-in scene", path.display(), e);
            Scene::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let _ = env_logger::try_init();

    let scene = startup_scene();
    let step = scene.step;
    let mut session = Session::from_scene(&scene);
    let mut sink = PixelSink::new(CELL_PX);

    log::info!(
        "=== Grid Renderer === {}x{} cells, cube size {}",
        session.canvas.width,
        session.canvas.height,
        session.cube.size
    );

    let mut texture: Option<Texture2D> = None;
    let mut needs_redraw = true;

    'running: loop {
        for cmd in poll_commands(step) {
            match cmd {
                Command::Quit => break 'running,
                Command::Screenshot => save_screenshot(&session),
                _ => needs_redraw |= session.apply(cmd),
            }
        }

        if needs_redraw {
            let stats = session.render(&mut sink);
            log::debug!(
                "frame: {} lines, {} triangles, {} cells updated",
                stats.lines,
                stats.triangles,
                stats.cells_updated
            );
            if log::log_enabled!(log::Level::Trace) {
                let mut text = TextSink::default();
                session.canvas.flush(&mut text);
                log::trace!("\n{}", text.text());
            }
            if sink.dirty || texture.is_none() {
                let tex = Texture2D::from_rgba8(sink.pixel_width() as u16, sink.pixel_height() as u16, &sink.pixels);
                tex.set_filter(FilterMode::Nearest);
                texture = Some(tex);
            }
            needs_redraw = false;
        }

        clear_background(Color::from_rgba(30, 30, 35, 255));

        let grid_w = (screen_width() - HUD_WIDTH).max(1.0);
        let grid_h = screen_height();
        if let Some(tex) = &texture {
            draw_texture_ex(
                tex,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(Vec2::new(grid_w, grid_h)),
                    ..Default::default()
                },
            );
        }

        draw_hud(&session, grid_w + 12.0);

        next_frame().await;
    }

    log::info!("Exiting");
}

fn draw_hud(session: &Session, x: f32) {
    let text_color = Color::from_rgba(200, 200, 200, 255);
    let dim_color = Color::from_rgba(140, 140, 140, 255);
    let mut y = 24.0;

    for line in HELP {
        draw_text(line, x, y, 16.0, dim_color);
        y += 18.0;
    }
    y += 12.0;

    let (pitch, yaw) = session.light_angles();
    let dir = session.ctx.light.direction;
    let lines = [
        format!("Projection: {}", session.ctx.projection.label()),
        format!("Mode: {}", session.mode().label()),
        format!("Light angles: ({:.1}, {:.1})", pitch, yaw),
        format!("Light dir: ({:.2}, {:.2}, {:.2})", dir.x, dir.y, dir.z),
        format!(
            "Camera: ({:.0}, {:.0}, {:.0})",
            session.ctx.camera.angle_x, session.ctx.camera.angle_y, session.ctx.camera.angle_z
        ),
    ];
    for line in &lines {
        draw_text(line, x, y, 16.0, text_color);
        y += 18.0;
    }
}

fn save_screenshot(session: &Session) {
    let path = screenshot_path();
    let canvas = &session.canvas;
    match save_png(&path, canvas.front(), canvas.width, canvas.height, CELL_PX as u32) {
        Ok(()) => log::info!("Screenshot saved to {}", path.display()),
        Err(e) => log::error!("Screenshot failed: {}", e),
    }
}
