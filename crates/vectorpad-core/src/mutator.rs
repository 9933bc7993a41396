//! Geometry edits applied to shapes and their handles.

use crate::config::EditorConfig;
use crate::geometry::{NormalizedRect, line_function, point_in_rect_spanned_by};
use crate::handles::{CORNER_MAP, HandleManager, HandleRef, h_map, v_map};
use crate::shapes::{Line, Polygon, Rectangle, Shape};
use crate::surface::Surface;
use kurbo::{Point, Vec2};

/// Parameters for synthesizing a new shape from a drag or click.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOption {
    Line { start: Point, end: Point },
    Rect { rect: NormalizedRect, marquee: bool },
    Polygon { points: Vec<Point> },
}

/// Create a shape with a fresh id and the configured style.
///
/// Returns the shape and the handle index the pointer should keep dragging.
pub fn build_shape(option: DrawOption, config: &EditorConfig) -> (Shape, Option<usize>) {
    match option {
        DrawOption::Line { start, end } => {
            let mut line = Line::new(start, end);
            line.style = config.default_style.clone();
            (Shape::Line(line), Some(1))
        }
        DrawOption::Rect { rect, marquee } => {
            let mut shape = Rectangle::new(rect.origin(), rect.width, rect.height);
            shape.marquee = marquee;
            shape.style = if marquee {
                config.selection_style.clone()
            } else {
                config.default_style.clone()
            };
            (Shape::Rect(shape), Some(rect.default_handle))
        }
        DrawOption::Polygon { points } => {
            let default = points.len().checked_sub(1);
            let mut poly = Polygon::new(points);
            poly.style = config.default_style.clone();
            (Shape::Polygon(poly), default)
        }
    }
}

/// Move a shape as a whole.
///
/// Polygons are edited vertex by vertex and ignore whole-shape translation.
pub fn translate(shape: &mut Shape, delta: Vec2) {
    match shape {
        Shape::Line(line) => {
            line.start += delta;
            line.end += delta;
        }
        Shape::Rect(rect) => {
            rect.position += delta;
        }
        Shape::Polygon(poly) => {
            log::debug!("Ignoring translate of polygon {}", poly.id);
        }
    }
}

/// Drag `handle` of `shape` to `target`.
///
/// Returns the handle that is logically under the pointer afterwards, which
/// differs from `handle` when a rectangle flips through zero width or height.
/// The shape's handles are refreshed before returning.
pub fn resize_by_handle(
    shape: &mut Shape,
    handles: &mut HandleManager,
    handle: HandleRef,
    target: Point,
) -> HandleRef {
    let next = match shape {
        Shape::Line(line) => {
            line.set_endpoint(handle.index, target);
            handle
        }
        Shape::Rect(rect) => {
            let current = rect.handle_position(handle.index);
            let index = resize_rect(rect, handle.index, current, target);
            HandleRef::new(handle.owner, index)
        }
        Shape::Polygon(poly) => {
            handles.set_position(handle, target);
            poly.points = handles
                .of_owner(handle.owner)
                .into_iter()
                .map(|h| h.position)
                .collect();
            handle
        }
    };
    handles.refresh(shape);
    next
}

/// Resize a rectangle by one of its eight handles and return the handle index
/// that now sits under the pointer.
fn resize_rect(rect: &mut Rectangle, index: usize, current: Point, target: Point) -> usize {
    let (ox, oy, ow, oh) = (rect.position.x, rect.position.y, rect.width, rect.height);
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    let (mut x, mut y) = (ox, oy);
    let (mut fw, mut fh) = (ow, oh);

    match index {
        0 => {
            fw = ow - dx;
            fh = oh - dy;
            x = target.x;
            y = target.y;
        }
        1 => {
            fh = oh - dy;
            y = target.y;
        }
        2 => {
            fw = ow + dx;
            fh = oh - dy;
            y = target.y;
        }
        3 => fw = ow + dx,
        4 => {
            fw = ow + dx;
            fh = oh + dy;
        }
        5 => fh = oh + dy,
        6 => {
            fw = ow - dx;
            fh = oh + dy;
            x = target.x;
        }
        _ => {
            fw = ow - dx;
            x = target.x;
        }
    }

    let mut next = index;
    match (fw < 0.0, fh < 0.0) {
        (true, true) => {
            match index {
                0 => (x, y) = (ox + ow, oy + oh),
                2 => (x, y) = (ox + fw, oy + oh),
                4 => (x, y) = (ox + fw, oy + fh),
                6 => (x, y) = (ox + ow, oy + fh),
                _ => {}
            }
            next = CORNER_MAP[index % 8];
        }
        (true, false) => {
            match index {
                0 | 6 | 7 => x = ox + ow,
                2..=4 => x = ox + fw,
                _ => {}
            }
            next = v_map(index).unwrap_or(index);
        }
        (false, true) => {
            match index {
                0..=2 => y = oy + oh,
                4..=6 => y = oy + fh,
                _ => {}
            }
            next = h_map(index).unwrap_or(index);
        }
        (false, false) => {}
    }

    rect.position = Point::new(x, y);
    rect.width = fw.abs();
    rect.height = fh.abs();
    next
}

/// Deep copies of every shape currently carrying handles, one per owner in
/// first-seen order. Owners missing from the surface are skipped.
pub fn take_snapshot(handles: &HandleManager, surface: &dyn Surface) -> Vec<Shape> {
    handles
        .owners()
        .into_iter()
        .filter_map(|owner| {
            let shape = surface.shape(owner).cloned();
            if shape.is_none() {
                log::warn!("Handle owner {owner} is no longer on the surface");
            }
            shape
        })
        .collect()
}

/// Segment of a closed polygon nearest to `click`, measured vertically
/// along each edge.
///
/// Only edges whose bounding box contains the click are considered. Equal
/// distances resolve to the later segment. Returns `None` when no edge
/// lies within `tolerance`.
pub fn insertion_segment(points: &[Point], click: Point, tolerance: f64) -> Option<usize> {
    let n = points.len();
    let mut best: Option<(usize, f64)> = None;

    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        if !point_in_rect_spanned_by(a, b, click) {
            continue;
        }
        let Some(y) = line_function(a, b)(click.x) else {
            continue;
        };
        let distance = (y - click.y).abs();
        if best.is_none_or(|(_, d)| distance <= d) {
            best = Some((i, distance));
        }
    }

    match best {
        Some((index, distance)) if distance <= tolerance => Some(index),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::geometry::normalize_rect;

    fn rect_shape(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rect(Rectangle::new(Point::new(x, y), w, h))
    }

    fn as_rect(shape: &Shape) -> &Rectangle {
        match shape {
            Shape::Rect(r) => r,
            _ => panic!("expected rect"),
        }
    }

    #[test]
    fn test_translate_line_and_rect() {
        let mut line = Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 10.0)));
        translate(&mut line, Vec2::new(5.0, -5.0));
        match &line {
            Shape::Line(l) => {
                assert_eq!(l.start, Point::new(5.0, -5.0));
                assert_eq!(l.end, Point::new(15.0, 5.0));
            }
            _ => unreachable!(),
        }

        let mut rect = rect_shape(0.0, 0.0, 10.0, 10.0);
        translate(&mut rect, Vec2::new(3.0, 4.0));
        assert_eq!(as_rect(&rect).position, Point::new(3.0, 4.0));
        assert!((as_rect(&rect).width - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_translate_polygon_is_noop() {
        let mut poly = Shape::Polygon(Polygon::new(vec![Point::ZERO, Point::new(1.0, 1.0)]));
        let before = poly.clone();
        translate(&mut poly, Vec2::new(5.0, 5.0));
        assert_eq!(poly, before);
    }

    #[test]
    fn test_resize_line_endpoint() {
        let mut shape = Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 10.0)));
        let mut handles = HandleManager::new();
        handles.attach(&shape);
        let start = HandleRef::new(shape.id(), 0);
        let next = resize_by_handle(&mut shape, &mut handles, start, Point::new(-3.0, 2.0));
        assert_eq!(next, start);
        assert_eq!(handles.get(start).unwrap().position, Point::new(-3.0, 2.0));
    }

    #[test]
    fn test_resize_rect_without_flip() {
        let mut shape = rect_shape(10.0, 10.0, 50.0, 50.0);
        let mut handles = HandleManager::new();
        let br = handles.attach(&shape).unwrap();
        let next = resize_by_handle(&mut shape, &mut handles, br, Point::new(80.0, 70.0));
        assert_eq!(next.index, 4);
        let r = as_rect(&shape);
        assert_eq!(r.position, Point::new(10.0, 10.0));
        assert!((r.width - 70.0).abs() < f64::EPSILON);
        assert!((r.height - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_rect_flip_both_axes() {
        let mut shape = rect_shape(10.0, 10.0, 50.0, 50.0);
        let mut handles = HandleManager::new();
        let br = handles.attach(&shape).unwrap();
        let next = resize_by_handle(&mut shape, &mut handles, br, Point::new(0.0, 0.0));
        assert_eq!(next.index, 0);
        let r = as_rect(&shape);
        assert_eq!(r.position, Point::new(0.0, 0.0));
        assert!((r.width - 10.0).abs() < f64::EPSILON);
        assert!((r.height - 10.0).abs() < f64::EPSILON);
        assert_eq!(handles.get(next).unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_resize_rect_flip_width_only() {
        let mut shape = rect_shape(10.0, 10.0, 50.0, 50.0);
        let mut handles = HandleManager::new();
        handles.attach(&shape);
        let right = HandleRef::new(shape.id(), 3);
        let next = resize_by_handle(&mut shape, &mut handles, right, Point::new(0.0, 35.0));
        assert_eq!(next.index, 7);
        let r = as_rect(&shape);
        assert_eq!(r.position, Point::new(0.0, 10.0));
        assert!((r.width - 10.0).abs() < f64::EPSILON);
        assert!((r.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_rect_flip_height_only() {
        let mut shape = rect_shape(10.0, 10.0, 50.0, 50.0);
        let mut handles = HandleManager::new();
        handles.attach(&shape);
        let top = HandleRef::new(shape.id(), 1);
        let next = resize_by_handle(&mut shape, &mut handles, top, Point::new(35.0, 80.0));
        assert_eq!(next.index, 5);
        let r = as_rect(&shape);
        assert_eq!(r.position, Point::new(10.0, 60.0));
        assert!((r.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_polygon_vertex() {
        let mut shape = Shape::Polygon(Polygon::new(vec![
            Point::ZERO,
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]));
        let mut handles = HandleManager::new();
        handles.attach(&shape);
        let vertex = HandleRef::new(shape.id(), 1);
        resize_by_handle(&mut shape, &mut handles, vertex, Point::new(20.0, 5.0));
        assert_eq!(
            shape.as_polygon().unwrap().points,
            vec![Point::ZERO, Point::new(20.0, 5.0), Point::new(10.0, 10.0)]
        );
    }

    #[test]
    fn test_build_shape_styles() {
        let config = EditorConfig::default();
        let (marquee, default) = build_shape(
            DrawOption::Rect {
                rect: normalize_rect(0.0, 0.0, -10.0, 10.0),
                marquee: true,
            },
            &config,
        );
        assert_eq!(default, Some(6));
        assert!(marquee.is_marquee());
        assert_eq!(marquee.style(), &config.selection_style);

        let (line, default) = build_shape(
            DrawOption::Line {
                start: Point::ZERO,
                end: Point::new(1.0, 1.0),
            },
            &config,
        );
        assert_eq!(default, Some(1));
        assert_eq!(line.style(), &config.default_style);
    }

    #[test]
    fn test_build_shape_fresh_ids() {
        let config = EditorConfig::default();
        let option = DrawOption::Polygon {
            points: vec![Point::ZERO],
        };
        let (a, _) = build_shape(option.clone(), &config);
        let (b, _) = build_shape(option, &config);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_snapshot_dedups_owners() {
        let mut doc = Document::new();
        let mut handles = HandleManager::new();
        let a = rect_shape(0.0, 0.0, 10.0, 10.0);
        let b = rect_shape(20.0, 20.0, 10.0, 10.0);
        handles.attach(&a);
        handles.attach(&b);
        doc.insert_shape(a.clone());
        doc.insert_shape(b.clone());
        assert_eq!(handles.len(), 16);

        let snapshot = take_snapshot(&handles, &doc);
        assert_eq!(snapshot, vec![a, b]);
    }

    #[test]
    fn test_snapshot_skips_dangling_owner() {
        let doc = Document::new();
        let mut handles = HandleManager::new();
        handles.attach(&rect_shape(0.0, 0.0, 10.0, 10.0));
        assert!(take_snapshot(&handles, &doc).is_empty());
    }

    #[test]
    fn test_insertion_segment_nearest_edge() {
        let triangle = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
        ];
        assert_eq!(insertion_segment(&triangle, Point::new(5.0, 6.0), 2.0), Some(0));
        assert_eq!(insertion_segment(&triangle, Point::new(15.0, 4.0), 2.0), Some(1));
        assert_eq!(insertion_segment(&triangle, Point::new(5.0, 0.0), 2.0), Some(2));
    }

    #[test]
    fn test_insertion_segment_too_far() {
        let triangle = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
        ];
        assert_eq!(insertion_segment(&triangle, Point::new(5.0, 9.0), 2.0), None);
        assert_eq!(insertion_segment(&triangle, Point::new(30.0, 0.0), 2.0), None);
        assert_eq!(insertion_segment(&[], Point::ZERO, 2.0), None);
    }

    #[test]
    fn test_insertion_segment_tie_picks_last() {
        // Two coincident edges report the same distance.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(insertion_segment(&points, Point::new(5.0, 0.0), 2.0), Some(1));
    }
}
