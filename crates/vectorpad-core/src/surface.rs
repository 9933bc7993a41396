//! The drawing surface the editor mutates.

use crate::handles::Handle;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};

/// Shape container the editor reads and writes.
///
/// Shapes are the single source of truth for geometry. Hosts that mirror
/// them elsewhere (for example into SVG elements) use the notification hooks,
/// which the editor calls after every mutation it performs.
pub trait Surface {
    /// Append a shape on top of the z-order.
    fn insert_shape(&mut self, shape: Shape);

    /// Remove a shape, returning it if present.
    fn remove_shape(&mut self, id: ShapeId) -> Option<Shape>;

    fn shape(&self, id: ShapeId) -> Option<&Shape>;

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape>;

    /// Shape ids back to front.
    fn shape_ids(&self) -> Vec<ShapeId>;

    fn contains(&self, id: ShapeId) -> bool {
        self.shape(id).is_some()
    }

    /// Shapes under a point, front to back.
    fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.shape_ids()
            .into_iter()
            .rev()
            .filter(|id| {
                self.shape(*id)
                    .is_some_and(|shape| shape.hit_test(point, tolerance))
            })
            .collect()
    }

    /// A shape's geometry changed in place.
    fn shape_updated(&mut self, _id: ShapeId) {}

    /// The active handle set changed.
    fn handles_changed(&mut self, _handles: &[Handle]) {}

    /// The visible window moved or was rescaled.
    fn view_changed(&mut self, _view_box: Rect) {}
}
