//! PNG export of the displayed canvas

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{GrayImage, Luma};

use crate::rasterizer::Cell;

/// Error type for screenshot operations
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid canvas: {width}x{height} with {cells} cells")]
    InvalidCanvas { width: usize, height: usize, cells: usize },
}

/// Grayscale image of `cells`, each cell a `cell_px` square block
pub fn canvas_image(cells: &[Cell], width: usize, height: usize, cell_px: u32) -> Result<GrayImage, ScreenshotError> {
    if width == 0 || height == 0 || cells.len() != width * height {
        return Err(ScreenshotError::InvalidCanvas { width, height, cells: cells.len() });
    }

    let cell_px = cell_px.max(1);
    let img = GrayImage::from_fn(width as u32 * cell_px, height as u32 * cell_px, |x, y| {
        let col = (x / cell_px) as usize;
        let row = (y / cell_px) as usize;
        Luma([cells[row * width + col].luma()])
    });
    Ok(img)
}

/// Write the canvas to `path` as PNG
pub fn save_png<P: AsRef<Path>>(
    path: P,
    cells: &[Cell],
    width: usize,
    height: usize,
    cell_px: u32,
) -> Result<(), ScreenshotError> {
    let img = canvas_image(cells, width, height, cell_px)?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Timestamped file name in the working directory
pub fn screenshot_path() -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    PathBuf::from(format!("screenshot-{}.png", secs))
}
