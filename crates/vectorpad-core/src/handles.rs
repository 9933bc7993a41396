//! Handle definitions and the active handle set.

use crate::geometry::DEFAULT_RECT_HANDLE;
use crate::shapes::{Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Rect handle remap after both extents flipped (180° rotation).
pub const CORNER_MAP: [usize; 8] = [4, 5, 6, 7, 0, 1, 2, 3];

/// Rect handle remap after the width flipped (mirror across the vertical
/// axis). Handles 1 and 5 have no counterpart.
pub fn v_map(index: usize) -> Option<usize> {
    match index {
        0 => Some(2),
        2 => Some(0),
        3 => Some(7),
        7 => Some(3),
        4 => Some(6),
        6 => Some(4),
        _ => None,
    }
}

/// Rect handle remap after the height flipped (mirror across the horizontal
/// axis). Handles 3 and 7 have no counterpart.
pub fn h_map(index: usize) -> Option<usize> {
    match index {
        0 => Some(6),
        6 => Some(0),
        1 => Some(5),
        5 => Some(1),
        2 => Some(4),
        4 => Some(2),
        _ => None,
    }
}

/// Identity of a handle: its owner and position index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRef {
    pub owner: ShapeId,
    pub index: usize,
}

impl HandleRef {
    pub fn new(owner: ShapeId, index: usize) -> Self {
        Self { owner, index }
    }
}

/// A manipulation handle on a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    /// Shape this handle edits.
    pub owner: ShapeId,
    /// Role of the handle within its owner (endpoint, corner, vertex).
    pub index: usize,
    /// Position in surface coordinates.
    pub position: Point,
    /// Invisible but still hit-testable (marquee handles).
    pub hidden: bool,
}

impl Handle {
    pub fn handle_ref(&self) -> HandleRef {
        HandleRef::new(self.owner, self.index)
    }

    /// Check if a point is within the handle's hit area.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Position of handle `index` on `shape`.
///
/// Line: 0 start, 1 end. Rect: clockwise from the top-left corner.
/// Polygon: one per vertex.
pub fn handle_position(shape: &Shape, index: usize) -> Option<Point> {
    match shape {
        Shape::Line(line) => (index < 2).then(|| line.endpoint(index)),
        Shape::Rect(rect) => (index < 8).then(|| rect.handle_position(index)),
        Shape::Polygon(poly) => poly.points.get(index).copied(),
    }
}

/// Handle the pointer keeps dragging right after a shape is created.
pub fn default_handle(shape: &Shape) -> Option<usize> {
    match shape {
        Shape::Line(_) => Some(1),
        Shape::Rect(_) => Some(DEFAULT_RECT_HANDLE),
        Shape::Polygon(poly) => poly.points.len().checked_sub(1),
    }
}

/// Build the full handle set of a shape.
pub fn build_handles(shape: &Shape) -> Vec<Handle> {
    let count = match shape {
        Shape::Line(_) => 2,
        Shape::Rect(_) => 8,
        Shape::Polygon(poly) => poly.points.len(),
    };
    let hidden = shape.is_marquee();
    let owner = shape.id();

    (0..count)
        .filter_map(|index| {
            handle_position(shape, index).map(|position| Handle {
                owner,
                index,
                position,
                hidden,
            })
        })
        .collect()
}

/// The single set of live handles.
///
/// Every handle's owner exists on the surface and every position is derived
/// from the owner's current geometry. The manager records whether the set
/// changed since it was last published.
#[derive(Debug, Clone, Default)]
pub struct HandleManager {
    handles: Vec<Handle>,
    dirty: bool,
}

impl HandleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach handles for `shape` and return its default handle.
    pub fn attach(&mut self, shape: &Shape) -> Option<HandleRef> {
        self.handles.extend(build_handles(shape));
        self.dirty = true;
        default_handle(shape).map(|index| HandleRef::new(shape.id(), index))
    }

    /// Attach handles for `shape`, selecting `default` as the active handle.
    pub fn attach_with_default(&mut self, shape: &Shape, default: usize) -> HandleRef {
        self.handles.extend(build_handles(shape));
        self.dirty = true;
        HandleRef::new(shape.id(), default)
    }

    /// Recompute the handles of `shape` from its geometry.
    pub fn refresh(&mut self, shape: &Shape) {
        let id = shape.id();
        let fresh = build_handles(shape);
        let existing = self.handles.iter().filter(|h| h.owner == id).count();

        if existing == fresh.len() {
            for handle in self.handles.iter_mut().filter(|h| h.owner == id) {
                if let Some(position) = handle_position(shape, handle.index) {
                    handle.position = position;
                }
            }
        } else if existing > 0 {
            self.handles.retain(|h| h.owner != id);
            self.handles.extend(fresh);
        }
        self.dirty = true;
    }

    /// Remove the handles of one owner.
    pub fn detach(&mut self, owner: ShapeId) {
        let before = self.handles.len();
        self.handles.retain(|h| h.owner != owner);
        self.dirty |= before != self.handles.len();
    }

    /// Remove all handles.
    pub fn clear(&mut self) {
        if !self.handles.is_empty() {
            self.handles.clear();
            self.dirty = true;
        }
    }

    pub fn is_editing(&self, owner: ShapeId) -> bool {
        self.handles.iter().any(|h| h.owner == owner)
    }

    /// Distinct owners in first-seen order.
    pub fn owners(&self) -> Vec<ShapeId> {
        let mut owners: Vec<ShapeId> = Vec::new();
        for handle in &self.handles {
            if !owners.contains(&handle.owner) {
                owners.push(handle.owner);
            }
        }
        owners
    }

    pub fn get(&self, handle: HandleRef) -> Option<&Handle> {
        self.handles
            .iter()
            .find(|h| h.owner == handle.owner && h.index == handle.index)
    }

    pub fn set_position(&mut self, handle: HandleRef, position: Point) -> bool {
        match self
            .handles
            .iter_mut()
            .find(|h| h.owner == handle.owner && h.index == handle.index)
        {
            Some(h) => {
                h.position = position;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Handles of one owner, sorted by index.
    pub fn of_owner(&self, owner: ShapeId) -> Vec<&Handle> {
        let mut owned: Vec<&Handle> = self.handles.iter().filter(|h| h.owner == owner).collect();
        owned.sort_by_key(|h| h.index);
        owned
    }

    /// Nearest handle within `tolerance` of a point.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<HandleRef> {
        self.handles
            .iter()
            .filter(|h| h.hit_test(point, tolerance))
            .min_by(|a, b| {
                a.position
                    .distance(point)
                    .total_cmp(&b.position.distance(point))
            })
            .map(Handle::handle_ref)
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the set changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Polygon, Rectangle};

    #[test]
    fn test_maps_are_involutions() {
        for i in 0..8 {
            assert_eq!(CORNER_MAP[CORNER_MAP[i]], i);
            if let Some(j) = v_map(i) {
                assert_eq!(v_map(j), Some(i));
            }
            if let Some(j) = h_map(i) {
                assert_eq!(h_map(j), Some(i));
            }
        }
        assert_eq!(v_map(1), None);
        assert_eq!(h_map(3), None);
    }

    #[test]
    fn test_build_handles_counts() {
        let line = Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        let rect = Shape::Rect(Rectangle::new(Point::ZERO, 5.0, 5.0));
        let poly = Shape::Polygon(Polygon::new(vec![Point::ZERO, Point::new(1.0, 0.0)]));
        assert_eq!(build_handles(&line).len(), 2);
        assert_eq!(build_handles(&rect).len(), 8);
        assert_eq!(build_handles(&poly).len(), 2);
    }

    #[test]
    fn test_marquee_handles_hidden() {
        let mut rect = Rectangle::new(Point::ZERO, 5.0, 5.0);
        rect.marquee = true;
        let handles = build_handles(&Shape::Rect(rect));
        assert!(handles.iter().all(|h| h.hidden));
    }

    #[test]
    fn test_attach_returns_default_handle() {
        let mut manager = HandleManager::new();
        let line = Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        let rect = Shape::Rect(Rectangle::new(Point::ZERO, 5.0, 5.0));
        assert_eq!(manager.attach(&line), Some(HandleRef::new(line.id(), 1)));
        assert_eq!(manager.attach(&rect), Some(HandleRef::new(rect.id(), 4)));
        assert!(manager.take_dirty());
        assert!(!manager.take_dirty());
    }

    #[test]
    fn test_owners_dedup_first_seen() {
        let mut manager = HandleManager::new();
        let a = Shape::Rect(Rectangle::new(Point::ZERO, 5.0, 5.0));
        let b = Shape::Rect(Rectangle::new(Point::new(10.0, 10.0), 5.0, 5.0));
        manager.attach(&a);
        manager.attach(&b);
        assert_eq!(manager.len(), 16);
        assert_eq!(manager.owners(), vec![a.id(), b.id()]);
    }

    #[test]
    fn test_refresh_follows_geometry() {
        let mut manager = HandleManager::new();
        let mut line = Line::new(Point::ZERO, Point::new(5.0, 5.0));
        manager.attach(&Shape::Line(line.clone()));
        line.end = Point::new(20.0, 0.0);
        let shape = Shape::Line(line);
        manager.refresh(&shape);
        let end = manager.get(HandleRef::new(shape.id(), 1)).unwrap();
        assert_eq!(end.position, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_refresh_rebuilds_on_vertex_count_change() {
        let mut manager = HandleManager::new();
        let mut poly = Polygon::new(vec![Point::ZERO]);
        manager.attach(&Shape::Polygon(poly.clone()));
        poly.points.push(Point::new(4.0, 4.0));
        let shape = Shape::Polygon(poly);
        manager.refresh(&shape);
        assert_eq!(manager.of_owner(shape.id()).len(), 2);
    }

    #[test]
    fn test_refresh_ignores_unattached_shape() {
        let mut manager = HandleManager::new();
        let shape = Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        manager.refresh(&shape);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_hit_test_and_clear() {
        let mut manager = HandleManager::new();
        let rect = Shape::Rect(Rectangle::new(Point::ZERO, 10.0, 10.0));
        manager.attach(&rect);
        assert_eq!(
            manager.hit_test(Point::new(11.0, 11.0), 3.0),
            Some(HandleRef::new(rect.id(), 4))
        );
        assert!(manager.hit_test(Point::new(5.0, 5.0), 3.0).is_none());
        manager.clear();
        assert!(manager.is_empty());
        assert!(!manager.is_editing(rect.id()));
    }
}
