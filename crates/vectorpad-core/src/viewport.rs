//! Viewport module for pan/zoom of the SVG view box.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport maps the client area (screen pixels) onto the surface's view box.
///
/// Panning moves the view box, zooming rescales it around a fixed screen
/// point. The view box keeps the client aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Visible window in surface coordinates.
    pub view_box: Rect,
    /// Client size in screen pixels.
    pub client: Size,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Viewport {
    /// Create a viewport showing the surface at 100% from the origin.
    pub fn new(client: Size) -> Self {
        Self {
            view_box: Rect::from_origin_size(Point::ZERO, client),
            client,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }

    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Current zoom level (screen pixels per surface unit).
    pub fn zoom(&self) -> f64 {
        if self.view_box.width() <= 0.0 {
            return 1.0;
        }
        self.client.width / self.view_box.width()
    }

    /// Get the affine transform from surface to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom()) * Affine::translate(-self.view_box.origin().to_vec2())
    }

    /// Convert a screen point to surface coordinates.
    pub fn screen_to_surface(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    /// Convert a surface point to screen coordinates.
    pub fn surface_to_screen(&self, surface_point: Point) -> Point {
        self.transform() * surface_point
    }

    /// Follow the pointer by a screen delta: the content moves with the
    /// pointer, so the view box moves the opposite way.
    pub fn pan(&mut self, screen_delta: Vec2) {
        let delta = screen_delta / self.zoom();
        self.view_box = self.view_box - delta;
    }

    /// Zoom, keeping the given screen point fixed.
    /// Returns false when the zoom is already at its limit.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let zoom = self.zoom();
        let new_zoom = (zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - zoom).abs() < f64::EPSILON {
            return false;
        }

        let anchor = self.screen_to_surface(screen_point);
        let size = Size::new(self.client.width / new_zoom, self.client.height / new_zoom);
        let origin = Point::new(
            anchor.x - screen_point.x / new_zoom,
            anchor.y - screen_point.y / new_zoom,
        );
        self.view_box = Rect::from_origin_size(origin, size);
        true
    }

    /// Client area changed; keep the origin and zoom.
    pub fn resize(&mut self, client: Size) {
        let zoom = self.zoom();
        self.client = client;
        self.view_box = Rect::from_origin_size(
            self.view_box.origin(),
            Size::new(client.width / zoom, client.height / zoom),
        );
    }

    /// Reset to 100% at the origin.
    pub fn reset(&mut self) {
        self.view_box = Rect::from_origin_size(Point::ZERO, self.client);
    }

    /// Fit the view box to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded = Size::new(
            (self.client.width - padding * 2.0).max(1.0),
            (self.client.height - padding * 2.0).max(1.0),
        );
        let zoom = (padded.width / bounds.width())
            .min(padded.height / bounds.height())
            .clamp(self.min_zoom, self.max_zoom);

        let size = Size::new(self.client.width / zoom, self.client.height / zoom);
        let center = bounds.center();
        self.view_box = Rect::from_center_size(center, size);
    }
}
