//! Pure geometry helpers shared by the mutator and the state machine.

use kurbo::{Point, Rect, Vec2};

/// Handle index a rectangle should be dragged by right after it was drawn
/// with a non-negative width and height (bottom-right corner).
pub const DEFAULT_RECT_HANDLE: usize = 4;

/// A rectangle with non-negative extent, plus the handle that keeps tracking
/// the pointer when the rectangle was spanned "backwards".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Handle position index under the moving corner.
    pub default_handle: usize,
}

impl NormalizedRect {
    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Normalize a possibly negative `(x, y, width, height)` rectangle.
///
/// Both extents negative selects handle 0 (top-left), a negative width alone
/// selects 6 (bottom-left), a negative height alone selects 2 (top-right) and
/// anything else selects 4 (bottom-right).
pub fn normalize_rect(x: f64, y: f64, width: f64, height: f64) -> NormalizedRect {
    let default_handle = match (width < 0.0, height < 0.0) {
        (true, true) => 0,
        (true, false) => 6,
        (false, true) => 2,
        (false, false) => DEFAULT_RECT_HANDLE,
    };

    NormalizedRect {
        x: if width < 0.0 { x + width } else { x },
        y: if height < 0.0 { y + height } else { y },
        width: width.abs(),
        height: height.abs(),
        default_handle,
    }
}

/// Normalized rectangle spanned by a drag from `from` to `to`.
pub fn span(from: Point, to: Point) -> NormalizedRect {
    normalize_rect(from.x, from.y, to.x - from.x, to.y - from.y)
}

/// Whether `p` lies inside the axis-aligned rectangle spanned by `a` and `b`.
/// Borders are inclusive and the order of `a` and `b` does not matter.
pub fn point_in_rect_spanned_by(a: Point, b: Point, p: Point) -> bool {
    let r = span(a, b);
    p.x >= r.x && p.x <= r.x + r.width && p.y >= r.y && p.y <= r.y + r.height
}

/// Build the function `x -> y` along the segment `a -> b`.
///
/// The function is only defined for `x` in `[min(a.x, b.x), max(a.x, b.x)]`.
/// A vertical segment has no single `y` per `x`; its function returns `x`
/// itself when called with exactly `a.x` and `None` otherwise.
pub fn line_function(a: Point, b: Point) -> impl Fn(f64) -> Option<f64> {
    let lo = a.x.min(b.x);
    let hi = a.x.max(b.x);
    let run = b.x - a.x;

    move |x: f64| {
        if run.abs() < f64::EPSILON {
            return ((x - a.x).abs() < f64::EPSILON).then_some(x);
        }
        if x < lo || x > hi {
            return None;
        }
        Some(a.y + (b.y - a.y) * (x - a.x) / run)
    }
}

/// Distance from a point to the segment `a -> b`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Axis-aligned bounds of a point list, `None` when empty.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p)),
    )
}

/// Shift every point by `delta`.
pub fn offset_points(points: &mut [Point], delta: Vec2) {
    for p in points {
        *p += delta;
    }
}

/// Parse an SVG `points` attribute (`"x,y x,y ..."`, commas or whitespace
/// as separators). A trailing unpaired coordinate or a non-numeric token
/// drops that pair.
pub fn parse_points(attr: &str) -> Vec<Point> {
    let numbers: Vec<Option<f64>> = attr
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.parse::<f64>().ok())
        .collect();

    numbers
        .chunks_exact(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        })
        .collect()
}

/// Format points as an SVG `points` attribute.
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_positive_rect() {
        let r = normalize_rect(10.0, 20.0, 30.0, 40.0);
        assert!((r.x - 10.0).abs() < f64::EPSILON);
        assert!((r.y - 20.0).abs() < f64::EPSILON);
        assert!((r.width - 30.0).abs() < f64::EPSILON);
        assert!((r.height - 40.0).abs() < f64::EPSILON);
        assert_eq!(r.default_handle, 4);
    }

    #[test]
    fn test_normalize_both_negative() {
        let r = normalize_rect(50.0, 50.0, -20.0, -30.0);
        assert!((r.x - 30.0).abs() < f64::EPSILON);
        assert!((r.y - 20.0).abs() < f64::EPSILON);
        assert!((r.width - 20.0).abs() < f64::EPSILON);
        assert!((r.height - 30.0).abs() < f64::EPSILON);
        assert_eq!(r.default_handle, 0);
    }

    #[test]
    fn test_normalize_single_axis_handles() {
        assert_eq!(normalize_rect(0.0, 0.0, -5.0, 5.0).default_handle, 6);
        assert_eq!(normalize_rect(0.0, 0.0, 5.0, -5.0).default_handle, 2);
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize_rect(12.0, -4.0, -7.5, -3.0);
        let twice = normalize_rect(once.x, once.y, once.width, once.height);
        assert!((once.x - twice.x).abs() < f64::EPSILON);
        assert!((once.y - twice.y).abs() < f64::EPSILON);
        assert!((once.width - twice.width).abs() < f64::EPSILON);
        assert!((once.height - twice.height).abs() < f64::EPSILON);
        assert_eq!(twice.default_handle, 4);
    }

    #[test]
    fn test_point_in_rect_inclusive_and_order_free() {
        let a = Point::new(10.0, 10.0);
        let b = Point::new(0.0, 0.0);
        assert!(point_in_rect_spanned_by(a, b, Point::new(5.0, 5.0)));
        assert!(point_in_rect_spanned_by(a, b, Point::new(10.0, 0.0)));
        assert!(point_in_rect_spanned_by(b, a, Point::new(0.0, 10.0)));
        assert!(!point_in_rect_spanned_by(a, b, Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_line_function_domain() {
        let f = line_function(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(f(5.0), Some(10.0));
        assert_eq!(f(0.0), Some(0.0));
        assert_eq!(f(10.0), Some(20.0));
        assert_eq!(f(-1.0), None);
        assert_eq!(f(10.5), None);
    }

    #[test]
    fn test_line_function_reversed_segment() {
        let f = line_function(Point::new(10.0, 0.0), Point::new(0.0, 10.0));
        assert_eq!(f(2.0), Some(8.0));
    }

    #[test]
    fn test_line_function_vertical() {
        let f = line_function(Point::new(3.0, 0.0), Point::new(3.0, 10.0));
        assert_eq!(f(3.0), Some(3.0));
        assert_eq!(f(3.5), None);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-10);
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-10);
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_points_bounds() {
        assert!(points_bounds(&[]).is_none());
        let b = points_bounds(&[Point::new(3.0, 1.0), Point::new(-2.0, 5.0)]).unwrap();
        assert_eq!(b, Rect::new(-2.0, 1.0, 3.0, 5.0));
    }

    #[test]
    fn test_parse_points() {
        let pts = parse_points("0,0 10,0  10.5,-3");
        assert_eq!(
            pts,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.5, -3.0)]
        );
        assert_eq!(parse_points("1,2 3"), vec![Point::new(1.0, 2.0)]);
        assert!(parse_points("").is_empty());
    }

    #[test]
    fn test_format_points() {
        let s = format_points(&[Point::new(1.0, 2.0), Point::new(3.5, 4.0)]);
        assert_eq!(s, "1,2 3.5,4");
        assert_eq!(parse_points(&s).len(), 2);
    }
}
