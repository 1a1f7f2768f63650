use std::ops::Range;

use super::{Rgb, Surface};

/// An in-memory RGB image. Shapes are filled by testing pixel centres, with
/// no anti-aliasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Self {
        PixelSurface {
            width,
            height,
            pixels: vec![Rgb(0, 0, 0); width * height],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Colour at a fractional position inside grid cell `(col, row)`, where
    /// `(0.0, 0.0)` is the cell's top-left corner and `(1.0, 1.0)` its
    /// bottom-right.
    pub fn sample_cell(
        &self,
        col: i32,
        row: i32,
        cell_size: f32,
        fx: f32,
        fy: f32,
    ) -> Option<Rgb> {
        let x = (col as f32 + fx) * cell_size;
        let y = (row as f32 + fy) * cell_size;
        if x < 0.0 || y < 0.0 {
            return None;
        }
        self.pixel(x as usize, y as usize)
    }

    fn fill_where(
        &mut self,
        xs: Range<usize>,
        ys: Range<usize>,
        color: Rgb,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        for py in ys {
            for px in xs.clone() {
                if inside(px as f32 + 0.5, py as f32 + 0.5) {
                    self.pixels[py * self.width + px] = color;
                }
            }
        }
    }
}

/// Pixel indices whose centres may fall in `[lo, hi]`, clipped to `limit`.
fn span(lo: f32, hi: f32, limit: usize) -> Range<usize> {
    let start = lo.floor().max(0.0) as usize;
    let end = (hi.ceil().max(0.0) as usize).min(limit);
    start.min(end)..end
}

impl Surface for PixelSurface {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let xs = span(x, x + w, self.width);
        let ys = span(y, y + h, self.height);
        self.fill_where(xs, ys, color, |px, py| {
            px >= x && px <= x + w && py >= y && py <= y + h
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        // Hairlines still cover the pixels they pass between.
        let reach = (width / 2.0).max(0.5);
        let xs = span(from.0.min(to.0) - reach, from.0.max(to.0) + reach, self.width);
        let ys = span(from.1.min(to.1) - reach, from.1.max(to.1) + reach, self.height);
        self.fill_where(xs, ys, color, |px, py| {
            distance_to_segment((px, py), from, to) <= reach
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        let xs = span(cx - radius, cx + radius, self.width);
        let ys = span(cy - radius, cy + radius, self.height);
        self.fill_where(xs, ys, color, |px, py| {
            let (dx, dy) = (px - cx, py - cy);
            dx * dx + dy * dy <= radius * radius
        });
    }

    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgb) {
        let radius = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let xs = span(x, x + w, self.width);
        let ys = span(y, y + h, self.height);
        self.fill_where(xs, ys, color, |px, py| {
            if px < x || px > x + w || py < y || py > y + h {
                return false;
            }
            // Distance to the rectangle shrunk by the corner radius.
            let nx = px.clamp(x + radius, x + w - radius);
            let ny = py.clamp(y + radius, y + h - radius);
            let (dx, dy) = (px - nx, py - ny);
            dx * dx + dy * dy <= radius * radius
        });
    }
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * abx, a.1 + t * aby);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
