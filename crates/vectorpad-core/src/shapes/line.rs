//! Line shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::point_to_segment_dist;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point (handle 0).
    pub start: Point,
    /// End point (handle 1).
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    /// Endpoint by handle index; anything past 0 is the end point.
    pub fn endpoint(&self, index: usize) -> Point {
        if index == 0 { self.start } else { self.end }
    }

    pub fn set_endpoint(&mut self, index: usize, point: Point) {
        if index == 0 {
            self.start = point;
        } else {
            self.end = point;
        }
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end)
            <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_creation() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!((line.start.x).abs() < f64::EPSILON);
        assert!((line.end.x - 100.0).abs() < f64::EPSILON);
        assert_eq!(line.endpoint(0), line.start);
        assert_eq!(line.endpoint(1), line.end);
    }

    #[test]
    fn test_hit_test() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 0.0), 0.0));
        assert!(line.hit_test(Point::new(50.0, 4.0), 3.0));
        assert!(!line.hit_test(Point::new(50.0, 10.0), 3.0));
    }

    #[test]
    fn test_bounds_any_direction() {
        let line = Line::new(Point::new(100.0, 50.0), Point::new(0.0, 0.0));
        let bounds = line.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_endpoint() {
        let mut line = Line::new(Point::ZERO, Point::ZERO);
        line.set_endpoint(1, Point::new(7.0, 8.0));
        assert_eq!(line.end, Point::new(7.0, 8.0));
        assert_eq!(line.start, Point::ZERO);
    }
}
