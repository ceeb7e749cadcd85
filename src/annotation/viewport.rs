//! Pan and zoom between canvas pixels and image pixels.
//!
//! Screen space has `y` pointing down from the canvas top-left. Image space
//! has `y` pointing up from the raster's bottom-left, so the transform
//! flips the vertical axis.

use super::shape::Point;
use crate::config::ViewerConfig;

/// Pan/zoom state over a raster of fixed size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen pixels per image pixel
    pub zoom: f64,
    /// Screen position of the image origin
    pub offset_x: f64,
    pub offset_y: f64,
    pub image_width: f64,
    pub image_height: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    /// Identity view; `min_zoom`/`max_zoom` are powers of two
    pub fn new(image_width: f64, image_height: f64, min_zoom: i32, max_zoom: i32) -> Self {
        let min_zoom = 2f64.powi(min_zoom);
        let max_zoom = 2f64.powi(max_zoom).max(min_zoom);
        Self {
            zoom: 1.0f64.clamp(min_zoom, max_zoom),
            offset_x: 0.0,
            offset_y: image_height,
            image_width,
            image_height,
            min_zoom,
            max_zoom,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.width, config.height, config.min_zoom, config.max_zoom)
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Scale and center the whole image inside the canvas
    pub fn fit(&mut self, canvas_width: f64, canvas_height: f64) {
        if self.image_width <= 0.0 || self.image_height <= 0.0 {
            return;
        }
        let zoom = (canvas_width / self.image_width).min(canvas_height / self.image_height);
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.offset_x = (canvas_width - self.image_width * self.zoom) / 2.0;
        self.offset_y = (canvas_height + self.image_height * self.zoom) / 2.0;
    }

    /// Multiply the zoom by `factor` keeping the image point under `cursor` fixed
    pub fn zoom_at(&mut self, cursor_x: f64, cursor_y: f64, factor: f64) {
        let anchor = self.screen_to_image(cursor_x, cursor_y);
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        self.offset_x = cursor_x - anchor.x * self.zoom;
        self.offset_y = cursor_y + anchor.y * self.zoom;
    }

    /// Move the image by a screen-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn screen_to_image(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.offset_x) / self.zoom,
            (self.offset_y - screen_y) / self.zoom,
        )
    }

    pub fn image_to_screen(&self, p: &Point) -> (f64, f64) {
        (
            self.offset_x + p.x * self.zoom,
            self.offset_y - p.y * self.zoom,
        )
    }

    /// Image-space length of `pixels` screen pixels
    pub fn screen_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_origin_is_bottom_left() {
        let vp = Viewport::new(100.0, 50.0, -4, 4);
        let bottom_left = vp.screen_to_image(0.0, 50.0);
        assert!(approx_eq(bottom_left.x, 0.0));
        assert!(approx_eq(bottom_left.y, 0.0));

        let top_right = vp.screen_to_image(100.0, 0.0);
        assert!(approx_eq(top_right.x, 100.0));
        assert!(approx_eq(top_right.y, 50.0));
    }

    #[test]
    fn test_round_trip() {
        let mut vp = Viewport::new(2000.0, 2000.0, -4, 4);
        vp.fit(800.0, 600.0);
        vp.pan_by(13.0, -7.0);
        let p = Point::new(123.5, 987.25);
        let (sx, sy) = vp.image_to_screen(&p);
        let back = vp.screen_to_image(sx, sy);
        assert!(approx_eq(back.x, p.x));
        assert!(approx_eq(back.y, p.y));
    }

    #[test]
    fn test_fit_centers_image() {
        let mut vp = Viewport::new(2000.0, 1000.0, -4, 4);
        vp.fit(400.0, 400.0);
        assert!(approx_eq(vp.zoom, 0.2));

        let (left, bottom) = vp.image_to_screen(&Point::new(0.0, 0.0));
        let (right, top) = vp.image_to_screen(&Point::new(2000.0, 1000.0));
        assert!(approx_eq(left, 0.0));
        assert!(approx_eq(right, 400.0));
        assert!(approx_eq(top, 100.0));
        assert!(approx_eq(bottom, 300.0));
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point() {
        let mut vp = Viewport::new(2000.0, 2000.0, -4, 4);
        vp.fit(500.0, 500.0);
        let before = vp.screen_to_image(120.0, 340.0);

        vp.zoom_at(120.0, 340.0, 2.0);
        let after = vp.screen_to_image(120.0, 340.0);

        assert!(approx_eq(before.x, after.x));
        assert!(approx_eq(before.y, after.y));
        assert!(approx_eq(vp.zoom, 0.5));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::new(100.0, 100.0, -1, 2);
        for _ in 0..10 {
            vp.zoom_at(0.0, 0.0, 2.0);
        }
        assert!(approx_eq(vp.zoom, 4.0));
        for _ in 0..10 {
            vp.zoom_at(0.0, 0.0, 0.5);
        }
        assert!(approx_eq(vp.zoom, 0.5));
        assert_eq!(vp.zoom_limits(), (0.5, 4.0));
    }

    #[test]
    fn test_fit_respects_min_zoom() {
        let mut vp = Viewport::from_config(&ViewerConfig::default());
        vp.fit(10.0, 10.0);
        assert!(approx_eq(vp.zoom, 1.0 / 16.0));
    }

    #[test]
    fn test_screen_distance_scales_with_zoom() {
        let mut vp = Viewport::new(100.0, 100.0, -4, 4);
        vp.zoom_at(0.0, 0.0, 4.0);
        assert!(approx_eq(vp.screen_distance(8.0), 2.0));
    }
}
