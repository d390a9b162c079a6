//! Keyboard handling
//!
//! Maps key presses to session commands

use crate::app::Command;
use crate::rasterizer::RenderMode;
use macroquad::prelude::*;

/// Every key that maps to a command, in polling order
pub const BOUND_KEYS: [KeyCode; 18] = [
    KeyCode::Right,
    KeyCode::Left,
    KeyCode::Down,
    KeyCode::Up,
    KeyCode::A,
    KeyCode::D,
    KeyCode::S,
    KeyCode::W,
    KeyCode::I,
    KeyCode::K,
    KeyCode::J,
    KeyCode::L,
    KeyCode::X,
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::P,
    KeyCode::Escape,
];

/// Help lines for the HUD
pub const HELP: [&str; 6] = [
    "Arrows: rotate cube",
    "A/D S/W: rotate camera",
    "I/K J/L: rotate light",
    "X: toggle projection",
    "1/2/3: wireframe / backface / shading",
    "P: screenshot   Esc: quit",
];

/// Command for a single key, `step` degrees per rotation
pub fn command_for_key(key: KeyCode, step: f32) -> Option<Command> {
    let cmd = match key {
        KeyCode::Right => Command::RotateMesh { dx: 0.0, dy: step },
        KeyCode::Left => Command::RotateMesh { dx: 0.0, dy: -step },
        KeyCode::Down => Command::RotateMesh { dx: step, dy: 0.0 },
        KeyCode::Up => Command::RotateMesh { dx: -step, dy: 0.0 },

        KeyCode::A => Command::RotateCamera { dx: 0.0, dy: step, dz: 0.0 },
        KeyCode::D => Command::RotateCamera { dx: 0.0, dy: -step, dz: 0.0 },
        KeyCode::S => Command::RotateCamera { dx: step, dy: 0.0, dz: 0.0 },
        KeyCode::W => Command::RotateCamera { dx: -step, dy: 0.0, dz: 0.0 },

        KeyCode::I => Command::RotateLight { dx: -step, dy: 0.0, dz: 0.0 },
        KeyCode::K => Command::RotateLight { dx: step, dy: 0.0, dz: 0.0 },
        KeyCode::J => Command::RotateLight { dx: 0.0, dy: -step, dz: 0.0 },
        KeyCode::L => Command::RotateLight { dx: 0.0, dy: step, dz: 0.0 },

        KeyCode::X => Command::ToggleProjection,
        KeyCode::Key1 => Command::SetRenderMode(RenderMode::Wireframe),
        KeyCode::Key2 => Command::SetRenderMode(RenderMode::BackfaceCull),
        KeyCode::Key3 => Command::SetRenderMode(RenderMode::Shading),
        KeyCode::P => Command::Screenshot,
        KeyCode::Escape => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Commands for every bound key pressed this frame
pub fn poll_commands(step: f32) -> Vec<Command> {
    BOUND_KEYS
        .iter()
        .filter(|&&key| is_key_pressed(key))
        .filter_map(|&key| command_for_key(key, step))
        .collect()
}
