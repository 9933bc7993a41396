//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle. Width and height are non-negative at rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Selection rectangle rather than a drawing.
    #[serde(default)]
    pub marquee: bool,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            marquee: false,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(Point::new(min_x, min_y), width, height)
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Position of a handle, clockwise from the top-left corner:
    /// 0 TL, 1 top-mid, 2 TR, 3 right-mid, 4 BR, 5 bottom-mid, 6 BL, 7 left-mid.
    pub fn handle_position(&self, index: usize) -> Point {
        let Point { x, y } = self.position;
        let (w, h) = (self.width, self.height);
        match index % 8 {
            0 => Point::new(x, y),
            1 => Point::new(x + w / 2.0, y),
            2 => Point::new(x + w, y),
            3 => Point::new(x + w, y + h / 2.0),
            4 => Point::new(x + w, y + h),
            5 => Point::new(x + w / 2.0, y + h),
            6 => Point::new(x, y + h),
            _ => Point::new(x, y + h / 2.0),
        }
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // The fill is always painted (possibly fully transparent), so the
        // interior counts as a hit.
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
