//! Display sinks for flushed frames
//!
//! `PixelSink` fills an RGBA buffer the window uploads as a texture.
//! `TextSink` rebuilds the frame as rows of glyphs.

use crate::rasterizer::{Cell, DisplaySink};

/// Square block of gray pixels per cell
pub struct PixelSink {
    pub cell_px: usize,
    pub width: usize,
    pub height: usize,
    /// RGBA, row-major, `width * cell_px` by `height * cell_px`
    pub pixels: Vec<u8>,
    /// Set when the last frame changed at least one cell
    pub dirty: bool,
    repaint_all: bool,
}

impl PixelSink {
    pub fn new(cell_px: usize) -> Self {
        Self {
            cell_px: cell_px.max(1),
            width: 0,
            height: 0,
            pixels: Vec::new(),
            dirty: false,
            repaint_all: false,
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width * self.cell_px
    }

    pub fn pixel_height(&self) -> usize {
        self.height * self.cell_px
    }
}

impl DisplaySink for PixelSink {
    fn begin_frame(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; self.pixel_width() * self.pixel_height() * 4];
            self.repaint_all = true;
        }
        self.dirty = false;
    }

    fn paint(&mut self, row: usize, col: usize, cell: Cell, changed: bool) {
        if !changed && !self.repaint_all {
            return;
        }
        self.dirty = true;

        let luma = cell.luma();
        let stride = self.pixel_width();
        for py in row * self.cell_px..(row + 1) * self.cell_px {
            let start = (py * stride + col * self.cell_px) * 4;
            for px in self.pixels[start..start + self.cell_px * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&[luma, luma, luma, 255]);
            }
        }
    }

    fn end_frame(&mut self) {
        self.repaint_all = false;
    }
}

/// Glyph rows, two columns per cell
#[derive(Debug, Default)]
pub struct TextSink {
    pub rows: Vec<String>,
}

impl TextSink {
    pub fn text(&self) -> String {
        self.rows.join("\n")
    }
}

impl DisplaySink for TextSink {
    fn begin_frame(&mut self, _width: usize, height: usize) {
        self.rows = vec![String::new(); height];
    }

    fn paint(&mut self, row: usize, _col: usize, cell: Cell, _changed: bool) {
        if let Some(line) = self.rows.get_mut(row) {
            line.push_str(cell.glyph());
        }
    }
}
