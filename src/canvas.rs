//! Raster drawing surface presented as half-block terminal cells.
//!
//! A canvas of logical size `w × h` keeps `w·dpr × h·dpr` device pixels.
//! All drawing calls take logical coordinates. Presenting box-averages each
//! `dpr × dpr` block back to one logical pixel and packs two logical pixels
//! per terminal cell (`▀`: foreground is the upper pixel, background the
//! lower). Text lives on a separate layer, one cell per character.

use crate::colors::Rgb;
use crate::geo::{Point, SurfaceSize};
use crate::terminal::Terminal;
use crate::visibility::Rect;
use std::collections::HashMap;

const HALF_BLOCK: char = '▀';

/// Operation counters for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub fills: usize,
    pub strokes: usize,
    pub texts: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    size: SurfaceSize,
    dpr: u32,
    pixels: Vec<Rgb>,
    texts: Vec<TextRun>,
    stats: DrawStats,
}

impl Canvas {
    pub fn new(size: SurfaceSize, dpr: u32) -> Self {
        let mut canvas = Self {
            size,
            dpr: dpr.max(1),
            pixels: Vec::new(),
            texts: Vec::new(),
            stats: DrawStats::default(),
        };
        canvas.resize(size, dpr);
        canvas
    }

    /// Reallocate the backing buffer for `size × dpr` and clear it.
    pub fn resize(&mut self, size: SurfaceSize, dpr: u32) {
        self.size = size;
        self.dpr = dpr.max(1);
        let len = self.device_width() * self.device_height();
        self.pixels.clear();
        self.pixels.resize(len, Rgb::default());
        self.begin_frame();
    }

    /// Forget the previous frame's text and counters.
    pub fn begin_frame(&mut self) {
        self.texts.clear();
        self.stats = DrawStats::default();
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width_px as f64
    }

    pub fn height(&self) -> f64 {
        self.size.height_px as f64
    }

    pub fn device_width(&self) -> usize {
        self.size.width_px as usize * self.dpr as usize
    }

    pub fn device_height(&self) -> usize {
        self.size.height_px as usize * self.dpr as usize
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// All text on the canvas, one run per line.
    #[cfg(test)]
    pub fn text_content(&self) -> String {
        self.texts.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    /// Average color of the device pixels behind logical pixel `(x, y)`.
    pub fn logical_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.size.width_px || y >= self.size.height_px {
            return None;
        }
        let d = self.dpr as usize;
        let dw = self.device_width();
        let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
        for dy in 0..d {
            let row = (y as usize * d + dy) * dw;
            for dx in 0..d {
                let p = self.pixels[row + x as usize * d + dx];
                r += p.r as u32;
                g += p.g as u32;
                b += p.b as u32;
            }
        }
        let n = (d * d) as u32;
        Some(Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8))
    }

    pub fn fill(&mut self, color: Rgb) {
        self.stats.fills += 1;
        self.pixels.fill(color);
    }

    pub fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        self.stats.fills += 1;
        let (dw, dh) = (self.device_width(), self.device_height());
        let span = (dh.max(2) - 1) as f64;
        for y in 0..dh {
            let color = top.lerp(bottom, y as f64 / span);
            self.pixels[y * dw..(y + 1) * dw].fill(color);
        }
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb, alpha: f64) {
        self.stats.fills += 1;
        let s = self.dpr as f64;
        let x0 = (x * s).round().max(0.0) as usize;
        let y0 = (y * s).round().max(0.0) as usize;
        let x1 = (((x + w) * s).round().max(0.0) as usize).min(self.device_width());
        let y1 = (((y + h) * s).round().max(0.0) as usize).min(self.device_height());
        for dy in y0..y1 {
            for dx in x0..x1 {
                self.blend(dx, dy, color, alpha);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb, alpha: f64) {
        self.stats.fills += 1;
        let s = self.dpr as f64;
        self.stamp_disc(center.x * s, center.y * s, radius * s, color, alpha);
    }

    pub fn stroke_line(&mut self, a: Point, b: Point, width: f64, color: Rgb) {
        self.stroke_line_gradient(a, b, width, color, color);
    }

    /// Straight segment whose color runs from `from` at `a` to `to` at `b`.
    pub fn stroke_line_gradient(&mut self, a: Point, b: Point, width: f64, from: Rgb, to: Rgb) {
        self.stats.strokes += 1;
        self.trace_segment(a, b, width, from, to);
    }

    pub fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgb) {
        if points.len() < 2 {
            return;
        }
        self.stats.strokes += 1;
        for pair in points.windows(2) {
            self.trace_segment(pair[0], pair[1], width, color, color);
        }
    }

    /// Arc from `start` (radians, 0 = east, clockwise on screen) through `sweep`.
    pub fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, sweep: f64, width: f64, color: Rgb) {
        self.stats.strokes += 1;
        let s = self.dpr as f64;
        let steps = ((sweep.abs() * radius * s * 2.0).ceil() as usize).max(1);
        let half = (width * s / 2.0).max(0.5);
        for i in 0..=steps {
            let angle = start + sweep * i as f64 / steps as f64;
            let x = (center.x + radius * angle.cos()) * s;
            let y = (center.y + radius * angle.sin()) * s;
            self.stamp_disc(x, y, half, color, 1.0);
        }
    }

    pub fn fill_text(&mut self, x: f64, y: f64, text: &str, color: Rgb) {
        if text.is_empty() {
            return;
        }
        self.stats.texts += 1;
        self.texts.push(TextRun {
            x: x.round() as i32,
            y: y.round() as i32,
            text: text.to_string(),
            color,
        });
    }

    pub fn fill_text_centered(&mut self, y: f64, text: &str, color: Rgb) {
        let x = (self.width() - text.chars().count() as f64) / 2.0;
        self.fill_text(x.max(0.0).floor(), y, text, color);
    }

    /// Copy the canvas into `term` with its top-left cell at `origin`,
    /// writing only cells inside `clip`.
    pub fn present(&self, term: &mut Terminal, origin_x: i32, origin_y: i32, clip: Rect) {
        let cols = self.size.width_px as i32;
        let rows = (self.size.height_px as i32 + 1) / 2;

        let mut glyphs: HashMap<(i32, i32), (char, Rgb)> = HashMap::new();
        for run in &self.texts {
            let cy = run.y.div_euclid(2);
            for (i, ch) in run.text.chars().enumerate() {
                let cx = run.x + i as i32;
                if cx >= 0 && cx < cols && cy >= 0 && cy < rows {
                    glyphs.insert((cx, cy), (ch, run.color));
                }
            }
        }

        for cy in 0..rows {
            let ty = origin_y + cy;
            if ty < clip.y || ty >= clip.y + clip.height as i32 {
                continue;
            }
            for cx in 0..cols {
                let tx = origin_x + cx;
                if tx < clip.x || tx >= clip.x + clip.width as i32 {
                    continue;
                }
                let top = self.logical_pixel(cx as u32, (cy * 2) as u32).unwrap_or_default();
                let bottom = self.logical_pixel(cx as u32, (cy * 2 + 1) as u32).unwrap_or(top);
                match glyphs.get(&(cx, cy)) {
                    Some(&(ch, color)) => {
                        term.set_bg(tx, ty, ch, color.to_term(), top.lerp(bottom, 0.5).to_term());
                    }
                    None => term.set_bg(tx, ty, HALF_BLOCK, top.to_term(), bottom.to_term()),
                }
            }
        }
    }

    fn trace_segment(&mut self, a: Point, b: Point, width: f64, from: Rgb, to: Rgb) {
        let s = self.dpr as f64;
        let (ax, ay, bx, by) = (a.x * s, a.y * s, b.x * s, b.y * s);
        let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        let steps = ((len * 2.0).ceil() as usize).max(1);
        let half = (width * s / 2.0).max(0.5);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let color = from.lerp(to, t);
            self.stamp_disc(ax + (bx - ax) * t, ay + (by - ay) * t, half, color, 1.0);
        }
    }

    /// Blend a disc in device coordinates. Discs smaller than a pixel still
    /// cover the pixel under their center.
    fn stamp_disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64) {
        let (dw, dh) = (self.device_width() as i64, self.device_height() as i64);
        if dw == 0 || dh == 0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i64;
        let x1 = (cx + radius).ceil() as i64;
        let y0 = (cy - radius).floor() as i64;
        let y1 = (cy + radius).ceil() as i64;
        let mut hit = false;
        for py in y0.max(0)..y1.min(dh) {
            for px in x0.max(0)..x1.min(dw) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px as usize, py as usize, color, alpha);
                    hit = true;
                }
            }
        }
        if !hit {
            let (px, py) = (cx.floor() as i64, cy.floor() as i64);
            if px >= 0 && px < dw && py >= 0 && py < dh {
                self.blend(px as usize, py as usize, color, alpha);
            }
        }
    }

    fn blend(&mut self, dx: usize, dy: usize, color: Rgb, alpha: f64) {
        let idx = dy * self.device_width() + dx;
        if let Some(p) = self.pixels.get_mut(idx) {
            *p = if alpha >= 1.0 { color } else { color.over(*p, alpha) };
        }
    }
}
