//! In-memory shape document.

use crate::handles::Handle;
use crate::shapes::{Shape, ShapeId};
use crate::surface::Surface;
use kurbo::Rect;
use std::collections::HashMap;

/// An in-memory surface holding shapes in z-order.
///
/// Used directly by headless hosts and tests, and as the backing store of
/// surfaces that mirror shapes into a display.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// All shapes in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    /// Last handle set published by the editor.
    handles: Vec<Handle>,
    /// Last view box published by the editor.
    view_box: Option<Rect>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes back to front.
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes_ordered()
            .map(|s| s.bounds())
            .reduce(|acc, b| acc.union(b))
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn view_box(&self) -> Option<Rect> {
        self.view_box
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

impl Surface for Document {
    fn insert_shape(&mut self, shape: Shape) {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_some() {
            self.z_order.retain(|&shape_id| shape_id != id);
        }
        self.z_order.push(id);
    }

    fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    fn shape_ids(&self) -> Vec<ShapeId> {
        self.z_order.clone()
    }

    fn handles_changed(&mut self, handles: &[Handle]) {
        self.handles = handles.to_vec();
    }

    fn view_changed(&mut self, view_box: Rect) {
        self.view_box = Some(view_box);
    }
}
