//! Minimal software canvas for the picture export.
//!
//! Maps the scene's projected coordinates onto a pixel buffer and draws
//! polylines, dashes and circles directly. The vertical half-range of the
//! canvas equals the scene extent; the horizontal range follows from the
//! aspect ratio.

use image::{Rgba, RgbaImage};

pub struct Canvas {
    image: RgbaImage,
    /// Pixels per projected unit.
    scale: f64,
    cx: f64,
    cy: f64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, extent: f64, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255])),
            scale: height as f64 / 2.0 / extent,
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Convert a projected-unit length to pixels.
    pub fn to_px_len(&self, len: f64) -> f64 {
        len * self.scale
    }

    fn to_px(&self, p: [f64; 2]) -> (f64, f64) {
        (self.cx + p[0] * self.scale, self.cy - p[1] * self.scale)
    }

    fn plot(&mut self, x: f64, y: f64, color: Rgba<u8>) {
        let (w, h) = self.image.dimensions();
        let (xi, yi) = (x.round() as i64, y.round() as i64);
        if xi >= 0 && yi >= 0 && (xi as u32) < w && (yi as u32) < h {
            self.image.put_pixel(xi as u32, yi as u32, color);
        }
    }

    /// True when both endpoints fall on the same outside half-plane; such a
    /// segment cannot cross the canvas.
    fn trivially_outside(&self, a: (f64, f64), b: (f64, f64)) -> bool {
        let (w, h) = self.image.dimensions();
        let (w, h) = (w as f64, h as f64);
        (a.0 < 0.0 && b.0 < 0.0)
            || (a.1 < 0.0 && b.1 < 0.0)
            || (a.0 >= w && b.0 >= w)
            || (a.1 >= h && b.1 >= h)
    }

    pub fn line(&mut self, from: [f64; 2], to: [f64; 2], color: [u8; 3]) {
        let a = self.to_px(from);
        let b = self.to_px(to);
        if self.trivially_outside(a, b) {
            return;
        }
        let px = Rgba([color[0], color[1], color[2], 255]);
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0);
        // Off-screen endpoints can stretch a segment; sampling stays bounded
        // and plot() rejects anything outside the buffer.
        let steps = steps.min(4096.0) as usize;
        for k in 0..=steps {
            let t = k as f64 / steps as f64;
            self.plot(a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t, px);
        }
    }

    pub fn polyline(&mut self, points: &[[f64; 2]], color: [u8; 3]) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
    }

    /// Polyline with a segment-count dash pattern: `on` drawn, `off` skipped.
    pub fn dashed_polyline(&mut self, points: &[[f64; 2]], color: [u8; 3], on: usize, off: usize) {
        let period = on + off;
        for (i, pair) in points.windows(2).enumerate() {
            if i % period < on {
                self.line(pair[0], pair[1], color);
            }
        }
    }

    /// Circle outline with a pixel radius, centered on a projected point.
    pub fn circle(&mut self, center: [f64; 2], radius_px: f64, color: [u8; 3]) {
        let (cx, cy) = self.to_px(center);
        let px = Rgba([color[0], color[1], color[2], 255]);
        let steps = (2.0 * std::f64::consts::PI * radius_px).ceil().max(12.0) as usize;
        for k in 0..steps {
            let angle = 2.0 * std::f64::consts::PI * k as f64 / steps as f64;
            self.plot(cx + radius_px * angle.cos(), cy - radius_px * angle.sin(), px);
        }
    }

    /// Filled disc with a pixel radius.
    pub fn disc(&mut self, center: [f64; 2], radius_px: f64, color: [u8; 3]) {
        let (cx, cy) = self.to_px(center);
        let px = Rgba([color[0], color[1], color[2], 255]);
        let r = radius_px.max(1.0);
        let span = r.ceil() as i64;
        for dy in -span..=span {
            let dyf = dy as f64;
            if dyf.abs() > r {
                continue;
            }
            let half = (r * r - dyf * dyf).sqrt();
            let row = cy + dyf;
            let mut x = cx - half;
            while x <= cx + half {
                self.plot(x, row, px);
                x += 1.0;
            }
        }
    }
}
